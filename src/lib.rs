//! photo-caption burns an activity caption (date, activity, location, time) onto a photo
//! before it is shrunk and uploaded.
//!
//! # Pipeline overview
//!
//! 1. **Shrink** (optional): [`shrink_for_upload`] limits the longest edge and byte size.
//! 2. **Plan**: [`CaptionPlan`] wraps the caption lines to the photo width and decides
//!    whether the block fits inside the photo or needs a strip appended below it.
//! 3. **Render**: [`Compositor::composite`] draws the backing band, a soft shadow and the
//!    text onto a fresh premultiplied RGBA8 canvas and encodes it as JPEG.
//! 4. **Preview / upload**: the caller shows the [`PreviewHandle`] (see
//!    [`PreviewSession`] for latest-request-wins bookkeeping) and hands the bytes to an
//!    [`Uploader`].
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No shared mutable state**: every composite call owns its text engine and surfaces.
//! - **Output width never changes**: the canvas only ever grows downward.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod caption;
mod compose;
mod foundation;
mod layout;
mod publish;
mod render;
mod text;

pub use assets::shrink::{ShrinkOpts, Shrunk, fit_within, shrink_for_upload};
pub use caption::fields::{CaptionFields, EMPTY_ACTIVITY};
pub use compose::compositor::{Composited, Compositor, CompositorOpts, JPEG_QUALITY_ENV};
pub use compose::preview::PreviewHandle;
pub use compose::session::{PreviewSession, Ticket};
pub use foundation::color::CaptionColor;
pub use foundation::error::{CaptionError, CaptionResult};
pub use layout::plan::{CaptionPlan, Placement};
pub use layout::style::{CaptionMetrics, CaptionStyle};
pub use layout::wrap::{TextMeasure, wrap_line, wrap_lines};
pub use publish::{
    DirectoryUploader, StoredPhoto, Uploader, activity_folder, normalize_folder,
};
pub use render::decode::{SourceImage, decode_source};
pub use render::encode::{OUTPUT_MIME, encode_jpeg};
pub use text::engine::{FontFace, TextEngine};
