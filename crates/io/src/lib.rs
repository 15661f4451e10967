// Tabular file I/O: load label columns, persist rendered matrices

pub mod csv;
pub mod error;

pub use crate::csv::{load, load_from_str, persist, read_file_as_utf8, read_rows, LoadOptions};
pub use error::IoError;
