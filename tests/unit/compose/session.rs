use std::sync::Arc;

use super::*;

fn handle(bytes: &Arc<[u8]>) -> PreviewHandle {
    PreviewHandle::new(bytes.clone(), 1, 1)
}

#[test]
fn tickets_increase() {
    let mut s = PreviewSession::new();
    let a = s.begin();
    let b = s.begin();
    assert!(b > a);
    assert!(!s.is_current(a));
    assert!(s.is_current(b));
}

#[test]
fn stale_completion_is_released_and_ignored() {
    let bytes: Arc<[u8]> = Arc::from(vec![0u8; 4]);
    let mut s = PreviewSession::new();
    let old = s.begin();
    let new = s.begin();

    let shown_id = s.accept(new, handle(&bytes)).unwrap().id();
    assert!(s.accept(old, handle(&bytes)).is_none());
    assert_eq!(s.current().unwrap().id(), shown_id);
    assert_eq!(s.current_ticket(), Some(new));
    assert_eq!(s.discarded(), 1);
    // Only the shown handle still references the bytes.
    assert_eq!(Arc::strong_count(&bytes), 2);
}

#[test]
fn newer_result_replaces_and_releases_previous() {
    let first: Arc<[u8]> = Arc::from(vec![1u8]);
    let second: Arc<[u8]> = Arc::from(vec![2u8]);
    let mut s = PreviewSession::new();

    let t1 = s.begin();
    s.accept(t1, handle(&first)).unwrap();
    let t2 = s.begin();
    s.accept(t2, handle(&second)).unwrap();

    assert_eq!(Arc::strong_count(&first), 1);
    assert_eq!(s.current().unwrap().bytes(), &[2]);
}

#[test]
fn teardown_releases_and_invalidates_tickets() {
    let bytes: Arc<[u8]> = Arc::from(vec![0u8]);
    let mut s = PreviewSession::new();
    let t = s.begin();
    s.accept(t, handle(&bytes)).unwrap();
    let pending = s.begin();

    s.teardown();
    assert!(s.current().is_none());
    assert_eq!(Arc::strong_count(&bytes), 1);
    assert!(s.accept(pending, handle(&bytes)).is_none());
    assert_eq!(Arc::strong_count(&bytes), 1);
}
