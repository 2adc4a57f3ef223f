use std::error;
use std::fmt;
use std::io;

use crate::lexer::{Pos, ScanError};

/// Splitter errors
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// I/O Error
    Io(io::Error),
    /// Input is not valid UTF-8
    InvalidUtf8(Option<Pos>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(ref err) => err.fmt(f),
            Self::InvalidUtf8(Some(pos)) => write!(f, "invalid UTF-8 at {pos}"),
            Self::InvalidUtf8(None) => f.write_str("invalid UTF-8"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(ref err) => Some(err),
            Self::InvalidUtf8(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl ScanError for Error {
    fn position(&mut self, p: Pos) {
        match *self {
            Self::Io(_) => {}
            Self::InvalidUtf8(ref mut pos) => *pos = Some(p),
        }
    }
}
