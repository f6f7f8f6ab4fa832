pub(crate) mod icon;
