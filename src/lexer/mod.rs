//! Streaming script tokenizer

mod scan;
pub mod sql;

pub use scan::{Pos, ScanError, Scanner, Splitter};
