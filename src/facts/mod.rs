//! Facts parsers: raw device text in, normalized records out.
//!
//! Each platform has one parser per resource. Parsers are tolerant: an
//! attribute that cannot be read is left unset and a block that cannot be
//! attributed to a recognized interface is dropped, never an error. The
//! records they produce are the `have` side of every reconciliation.

pub mod ios;
pub mod vyos;
