pub(crate) mod shrink;
