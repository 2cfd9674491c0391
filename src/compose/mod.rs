pub(crate) mod compositor;
pub(crate) mod preview;
pub(crate) mod session;
