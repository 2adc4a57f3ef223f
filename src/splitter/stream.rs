//! Split statements read from an `io::Read`
use std::collections::VecDeque;
use std::io::{self, Read};
use std::str;

use fallible_iterator::FallibleIterator;
use log::debug;

use super::{QuerySplitter, SplitItem};
use crate::dialect::SplitterOptions;
use crate::error::Error;
use crate::lexer::{Pos, ScanError};

const DEFAULT_BUF_SIZE: usize = 8 * 1024;

/// Statements of a script read incrementally.
///
/// The reader content must be UTF-8 encoded.
pub struct SplitQueryReader<'o, R: Read> {
    reader: R,
    splitter: QuerySplitter<'o>,
    /// read buffer
    buf: Vec<u8>,
    /// bytes read but not decoded yet (incomplete character)
    pending: Vec<u8>,
    ready: VecDeque<SplitItem>,
    /// position after the decoded input
    pos: Pos,
    eof: bool,
}

impl<'o, R: Read> SplitQueryReader<'o, R> {
    /// Split statements from `reader`
    pub fn new(reader: R, options: &'o SplitterOptions) -> SplitQueryReader<'o, R> {
        Self::with_capacity(DEFAULT_BUF_SIZE, reader, options)
    }

    /// Read `reader` by chunks of at most `capacity` bytes
    pub fn with_capacity(
        capacity: usize,
        reader: R,
        options: &'o SplitterOptions,
    ) -> SplitQueryReader<'o, R> {
        SplitQueryReader {
            reader,
            splitter: QuerySplitter::new(options),
            buf: vec![0; capacity.max(1)],
            pending: Vec::new(),
            ready: VecDeque::new(),
            pos: Pos::default(),
            eof: false,
        }
    }

    /// Underlying splitter
    pub fn splitter(&self) -> &QuerySplitter<'o> {
        &self.splitter
    }

    /// Unwrap the reader
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill(&mut self) -> Result<(), Error> {
        let n = loop {
            match self.reader.read(&mut self.buf) {
                Ok(n) => break n,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.eof = true;
                    return Err(e.into());
                }
            }
        };
        debug!(target: "splitter", "read {n} bytes");
        if n == 0 {
            self.eof = true;
            if !self.pending.is_empty() {
                return Err(self.invalid_utf8(0));
            }
            self.ready.extend(self.splitter.finish());
            return Ok(());
        }
        self.pending.extend_from_slice(&self.buf[..n]);
        let valid = match str::from_utf8(&self.pending) {
            Ok(text) => text.len(),
            // character split between two reads
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => {
                self.eof = true;
                return Err(self.invalid_utf8(e.valid_up_to()));
            }
        };
        let text = str::from_utf8(&self.pending[..valid]).map_err(|_| self.invalid_utf8(0))?;
        self.pos.advance(text);
        self.ready.extend(self.splitter.push(text));
        self.pending.drain(..valid);
        Ok(())
    }

    /// Error located after the first `valid` pending bytes
    fn invalid_utf8(&self, valid: usize) -> Error {
        let mut pos = self.pos;
        if let Ok(text) = str::from_utf8(&self.pending[..valid]) {
            pos.advance(text);
        }
        let mut err = Error::InvalidUtf8(None);
        err.position(pos);
        err
    }
}

impl<R: Read> FallibleIterator for SplitQueryReader<'_, R> {
    type Item = SplitItem;
    type Error = Error;

    fn next(&mut self) -> Result<Option<SplitItem>, Error> {
        loop {
            if let Some(item) = self.ready.pop_front() {
                return Ok(Some(item));
            }
            if self.eof {
                return Ok(None);
            }
            self.fill()?;
        }
    }
}
