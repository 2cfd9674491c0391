use crate::compose::preview::PreviewHandle;

/// Sequence number of one preview request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Raw sequence number.
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// Latest-request-wins bookkeeping for an interactive preview.
///
/// Every recomposite (caption toggled, color changed, new photo) calls [`begin`](Self::begin)
/// before starting work and [`accept`](Self::accept) when the work completes. Completions
/// for anything but the newest ticket are released on arrival, so a slow, stale composite
/// can never replace a newer one. Share across threads behind a `Mutex`.
#[derive(Debug, Default)]
pub struct PreviewSession {
    issued: u64,
    shown: Option<(Ticket, PreviewHandle)>,
    discarded: u64,
}

impl PreviewSession {
    /// Empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request; every earlier ticket becomes stale.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Whether `ticket` is the newest request.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    /// Offer a completed preview.
    ///
    /// Stale completions are released and `None` is returned. A current completion replaces
    /// (and releases) whatever was shown before.
    pub fn accept(
        &mut self,
        ticket: Ticket,
        preview: impl Into<PreviewHandle>,
    ) -> Option<&PreviewHandle> {
        let preview = preview.into();
        if !self.is_current(ticket) {
            tracing::trace!(
                ticket = ticket.0,
                latest = self.issued,
                "discarding stale preview"
            );
            self.discarded += 1;
            preview.release();
            return None;
        }
        if let Some((_, old)) = self.shown.replace((ticket, preview)) {
            old.release();
        }
        self.shown.as_ref().map(|(_, p)| p)
    }

    /// Currently displayed preview.
    pub fn current(&self) -> Option<&PreviewHandle> {
        self.shown.as_ref().map(|(_, p)| p)
    }

    /// Ticket of the currently displayed preview.
    pub fn current_ticket(&self) -> Option<Ticket> {
        self.shown.as_ref().map(|(t, _)| *t)
    }

    /// Number of completions dropped as stale.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Release the displayed preview; outstanding tickets become stale.
    pub fn teardown(&mut self) {
        self.issued += 1;
        if let Some((_, old)) = self.shown.take() {
            old.release();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/session.rs"]
mod tests;
