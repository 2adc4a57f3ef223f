//! Adaptation/port of [Go scanner](http://tip.golang.org/pkg/bufio/#Scanner).

use log::debug;
use memchr::memrchr;

use std::error::Error;
use std::fmt;
use std::io;

/// Position in the input, 0-based, counted in characters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    /// characters since the beginning of the input
    pub offset: usize,
    /// line number (only `\n` starts a new line)
    pub line: usize,
    /// characters since the beginning of the line
    pub column: usize,
}

impl Pos {
    /// Move past `text`
    pub fn advance(&mut self, text: &str) {
        for ch in text.chars() {
            self.offset += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line: {}, column: {}", self.line, self.column)
    }
}

/// Error which can be located in the input
pub trait ScanError: Error + From<io::Error> + Sized {
    /// Update the position where the error occurs
    fn position(&mut self, pos: Pos);
}

/// Split function used to tokenize the input
pub trait Splitter {
    /// Token classification
    type TokenType;

    /// Recognize the token starting at byte `offset` of `input`.
    ///
    /// Returns the token type and the amount of bytes to consume (never 0 and
    /// never past the end of `input`).
    /// `None` means more data is needed: `input` may stop in the middle of
    /// the token and `eof` is false.
    ///
    /// The function is never called with `offset == input.len()`.
    /// Unless `eof` is set, `input` always ends with a line feed.
    fn split(&self, input: &str, offset: usize, eof: bool) -> Option<(Self::TokenType, usize)>;
}

/// Like a `BufReader` but with a growable buffer.
/// Successive calls to the `scan` method will step through the 'tokens'
/// of the input.
///
/// Input can be appended at any time: only complete lines are handed to the
/// splitter until end of input is signaled.
pub struct Scanner<S: Splitter> {
    /// Buffered input, already consumed bytes included
    input: String,
    /// byte offset of the next token in `input`
    offset: usize,
    /// position of the next token in the whole stream
    pos: Pos,
    /// The function to tokenize the input.
    splitter: S,
}

impl<S: Splitter> Scanner<S> {
    /// Scanner without any input yet
    pub fn new(splitter: S) -> Scanner<S> {
        Self::with_input(String::new(), splitter)
    }

    /// Scanner over `input`
    pub fn with_input(input: String, splitter: S) -> Scanner<S> {
        Scanner {
            input,
            offset: 0,
            pos: Pos::default(),
            splitter,
        }
    }

    /// Append `chunk` to the buffered input
    pub fn push_str(&mut self, chunk: &str) {
        self.input.push_str(chunk);
    }

    /// Buffered input
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Byte offset of the next token in `input`
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Position of the next token in the stream
    pub fn position(&self) -> Pos {
        self.pos
    }

    /// Input not consumed yet
    pub fn remaining(&self) -> &str {
        &self.input[self.offset..]
    }

    /// Split function
    pub fn splitter(&self) -> &S {
        &self.splitter
    }

    /// Mutable split function
    pub fn splitter_mut(&mut self) -> &mut S {
        &mut self.splitter
    }

    /// Input the splitter may look at: up to the last line feed, unless `eof`.
    pub fn window(&self, eof: bool) -> &str {
        if eof {
            return &self.input;
        }
        match memrchr(b'\n', self.input.as_bytes()) {
            Some(i) => &self.input[..=i],
            None => "",
        }
    }

    /// Recognize the next token without consuming it.
    /// Return `None` when the end of the (available) input is reached.
    pub fn peek(&self, eof: bool) -> Option<(S::TokenType, usize)> {
        let input = self.window(eof);
        if self.offset >= input.len() {
            return None;
        }
        let (token_type, amt) = self.splitter.split(input, self.offset, eof)?;
        debug_assert!(amt > 0 && self.offset + amt <= input.len());
        Some((token_type, amt))
    }

    /// Advance the Scanner to next token.
    /// Return the token text and its type.
    /// Return `None` when the end of the (available) input is reached.
    pub fn scan(&mut self, eof: bool) -> Option<(&str, S::TokenType)> {
        let (token_type, amt) = self.peek(eof)?;
        let start = self.offset;
        self.consume(amt);
        Some((&self.input[start..start + amt], token_type))
    }

    /// Consume `amt` bytes of the buffer.
    pub fn consume(&mut self, amt: usize) {
        debug!(target: "scanner", "consume({})", amt);
        debug_assert!(self.offset + amt <= self.input.len());
        let end = self.offset + amt;
        self.pos.advance(&self.input[self.offset..end]);
        self.offset = end;
    }

    /// Drop the first `amt` bytes of the buffer, which must be consumed already.
    pub fn discard(&mut self, amt: usize) {
        debug_assert!(amt <= self.offset);
        if amt == 0 {
            return;
        }
        debug!(target: "scanner", "discard({})", amt);
        self.input.drain(..amt);
        self.offset -= amt;
    }
}

impl<S: Splitter> fmt::Debug for Scanner<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("input", &self.input)
            .field("offset", &self.offset)
            .field("pos", &self.pos)
            .finish()
    }
}
