//! Product identifiers and the reference dataset they key into.
//!
//! - [`Identifier`] pulls the `AA0000-000` code out of an image filename.
//! - [`Catalog`] loads the reference CSV into a lookup table of [`Record`]s.

pub mod error;
mod identifier;
mod reference;

pub use crate::identifier::{IDENTIFIER_LENGTH, Identifier};
pub use crate::reference::{Catalog, DuplicateRow, REQUIRED_COLUMNS, Record};
