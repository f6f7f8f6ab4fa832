pub(crate) mod batch;
pub(crate) mod classify;
