//! Low-level reading helpers shared by the workbook readers.
pub(crate) mod reader;
pub(crate) mod xml;
pub(crate) mod zip;
