//! Split SQL (and SQL-like) scripts into statements
#![warn(missing_docs)]

pub mod dialect;
mod error;
pub mod lexer;
mod params;
pub mod splitter;

pub use dialect::{Dialect, ParameterStyle, Quote, SplitterFlags, SplitterOptions};
pub use error::Error;
pub use fallible_iterator::FallibleIterator;
pub use params::{extract_query_parameters, replace_query_parameters, ParameterInfo};
pub use splitter::{
    split_query, QuerySplitter, RichItem, SpecialMarker, SplitItem, SplitQueryReader,
};
