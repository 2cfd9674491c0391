use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::render::encode::OUTPUT_MIME;

static NEXT_PREVIEW_ID: AtomicU64 = AtomicU64::new(1);

/// Transient reference to composited bytes, for immediate display.
///
/// Shares the encoded buffer with [`Composited::bytes`](crate::Composited::bytes). The
/// caller owns the handle and must [`release`](Self::release) it (or drop it) once it is no
/// longer displayed; [`PreviewSession`](crate::PreviewSession) does this automatically for
/// superseded previews.
pub struct PreviewHandle {
    id: u64,
    width: u32,
    height: u32,
    bytes: Arc<[u8]>,
}

impl std::fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

impl PreviewHandle {
    pub(crate) fn new(bytes: Arc<[u8]>, width: u32, height: u32) -> Self {
        Self {
            id: NEXT_PREVIEW_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            bytes,
        }
    }

    /// Process-unique handle id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Opaque locator for UIs that address images by string.
    pub fn uri(&self) -> String {
        format!("preview:{}#{}", OUTPUT_MIME, self.id)
    }

    /// MIME type of [`bytes`](Self::bytes).
    pub fn mime(&self) -> &'static str {
        OUTPUT_MIME
    }

    /// Encoded image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Pixel dimensions of the encoded image.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Give up this handle's reference to the encoded bytes.
    pub fn release(self) {
        tracing::trace!(id = self.id, "preview released");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/preview.rs"]
mod tests;
