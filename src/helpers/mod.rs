//! Internal helpers for writing Office Open XML packages.
pub(crate) mod xml;
pub(crate) mod zip;
