//! Statement splitter
//!
//! Drives the [`Tokenizer`] over the input and cuts statements at delimiters,
//! `DELIMITER` / `SET SQLTERMINATOR` directives, `GO` and `/` lines.
//! Input can be supplied all at once ([`split_query`]) or in chunks
//! ([`QuerySplitter::push`], [`SplitQueryReader`]).
use std::collections::vec_deque::Drain;
use std::collections::VecDeque;

use log::debug;
use memchr::memchr;

use crate::dialect::{SplitterFlags, SplitterOptions};
use crate::lexer::sql::{ScanState, TokenType, Tokenizer};
use crate::lexer::{Pos, Scanner, Splitter};

mod item;
mod stream;
#[cfg(test)]
mod test;

pub use item::{RichItem, SpecialMarker, SplitItem};
pub use stream::SplitQueryReader;

/// Split `sql` into statements
pub fn split_query(sql: &str, options: &SplitterOptions) -> Vec<SplitItem> {
    let mut splitter = QuerySplitter::new(options);
    splitter.scanner.push_str(sql);
    let items = splitter.finish().collect();
    items
}

/// Location in the buffered input
#[derive(Clone, Copy, Debug)]
struct Mark {
    /// byte offset in the scanner buffer
    index: usize,
    pos: Pos,
}

/// Statement being accumulated
#[derive(Clone, Copy, Debug)]
struct Command {
    start: Mark,
    /// start of the first non-whitespace token
    trim_start: Option<Mark>,
    /// end of the last non-whitespace token
    trim_end: Option<Mark>,
}

impl Command {
    fn new(start: Mark) -> Command {
        Command {
            start,
            trim_start: None,
            trim_end: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    Tokens,
    Lines,
    EmptyLines,
    NoSplit,
}

/// Incremental statement splitter.
///
/// Text is fed with [`push`](Self::push); statements are returned as soon as
/// their end is known. [`finish`](Self::finish) must be called once at the end
/// of the input to get the last statement.
///
/// A construct which may span lines (string, block comment, `$tag$` string)
/// holds back every following statement until it is closed or the input ends:
/// an unmatched `$$` delays all output up to `finish`, and each `push`
/// rescans the buffered text from it.
pub struct QuerySplitter<'o> {
    scanner: Scanner<Tokenizer<'o>>,
    strategy: Strategy,
    command: Command,
    output: VecDeque<SplitItem>,
}

impl<'o> QuerySplitter<'o> {
    /// Splitter in its initial state
    pub fn new(options: &'o SplitterOptions) -> QuerySplitter<'o> {
        let strategy = if options.is_enabled(SplitterFlags::NO_SPLIT) {
            Strategy::NoSplit
        } else if options.is_enabled(SplitterFlags::SPLIT_BY_LINES) {
            Strategy::Lines
        } else if options.is_enabled(SplitterFlags::SPLIT_BY_EMPTY_LINE) {
            Strategy::EmptyLines
        } else {
            Strategy::Tokens
        };
        QuerySplitter {
            scanner: Scanner::new(Tokenizer::new(options)),
            strategy,
            command: Command::new(Mark {
                index: 0,
                pos: Pos::default(),
            }),
            output: VecDeque::new(),
        }
    }

    /// Dialect options
    pub fn options(&self) -> &'o SplitterOptions {
        self.scanner.splitter().options()
    }

    /// Position of the first character not processed yet
    pub fn position(&self) -> Pos {
        self.scanner.position()
    }

    /// Feed `chunk`, return the statements completed by it
    pub fn push(&mut self, chunk: &str) -> Drain<'_, SplitItem> {
        self.scanner.push_str(chunk);
        self.run(false);
        self.compact();
        self.output.drain(..)
    }

    /// Signal the end of input, return the remaining statements
    pub fn finish(&mut self) -> Drain<'_, SplitItem> {
        self.run(true);
        let end = self.mark();
        self.flush(end, None);
        self.start_command();
        self.compact();
        self.output.drain(..)
    }

    fn run(&mut self, eof: bool) {
        match self.strategy {
            Strategy::Tokens => self.split_tokens(eof),
            Strategy::Lines => self.split_lines(eof, false),
            Strategy::EmptyLines => self.split_lines(eof, true),
            Strategy::NoSplit => {
                if eof {
                    let amt = self.scanner.remaining().len();
                    self.advance_text(amt);
                }
            }
        }
    }

    fn is_enabled(&self, flags: SplitterFlags) -> bool {
        self.options().is_enabled(flags)
    }

    fn state(&mut self) -> &mut ScanState {
        self.scanner.splitter_mut().state_mut()
    }

    fn mark(&self) -> Mark {
        Mark {
            index: self.scanner.offset(),
            pos: self.scanner.position(),
        }
    }

    fn split_tokens(&mut self, eof: bool) {
        let ignore_comments = self.is_enabled(SplitterFlags::IGNORE_COMMENTS);
        let adaptive = self.is_enabled(SplitterFlags::ADAPTIVE_GO_SPLIT);
        while let Some((token_type, amt)) = self.scanner.peek(eof) {
            match token_type {
                TokenType::Whitespace => self.advance(amt, false),
                TokenType::Eoln => {
                    self.advance(amt, false);
                    self.state().was_data_on_line = false;
                }
                TokenType::Data => {
                    let blank = self.scanner.remaining()[..amt]
                        .chars()
                        .all(char::is_whitespace);
                    self.advance(amt, !blank);
                    if !blank {
                        self.state().was_data_on_line = true;
                    }
                }
                TokenType::String | TokenType::Parameter => {
                    self.advance(amt, true);
                    self.state().was_data_on_line = true;
                }
                TokenType::Comment => {
                    self.advance(amt, !ignore_comments);
                    self.state().was_data_on_line = true;
                }
                TokenType::Delimiter => {
                    if self.is_enabled(SplitterFlags::PREVENT_SINGLE_LINE_SPLIT) {
                        match self.data_after_delimiter(amt, eof) {
                            // rest of the line not available yet
                            None => break,
                            Some(true) => {
                                self.advance(amt, true);
                                self.state().was_data_on_line = true;
                                continue;
                            }
                            Some(false) => {}
                        }
                    }
                    self.separator(amt);
                }
                TokenType::SetDelimiter(delimiter) => {
                    self.separator(amt);
                    debug!(target: "splitter", "delimiter: {delimiter}");
                    self.state().delimiter = Some(delimiter);
                }
                TokenType::SetSqlTerminator(terminator) => {
                    self.separator(amt);
                    debug!(target: "splitter", "terminator: {terminator:?}");
                    self.state().delimiter = terminator;
                }
                TokenType::GoDelimiter => {
                    self.separator(amt);
                    if adaptive {
                        self.state().delimiter = Some(";".to_owned());
                    }
                }
                TokenType::SlashDelimiter => self.separator(amt),
                TokenType::CreateRoutine => {
                    self.advance(amt, true);
                    let state = self.state();
                    state.was_data_on_line = true;
                    if adaptive {
                        state.delimiter = None;
                    }
                }
                TokenType::CopyFromStdin => {
                    self.advance(amt, true);
                    let state = self.state();
                    state.was_data_on_line = true;
                    state.copy_from_stdin_candidate = true;
                }
                TokenType::CopyFromStdinStart { keep } => {
                    self.advance(keep, true);
                    let end = self.mark();
                    self.flush(end, Some(SpecialMarker::CopyStdinStart));
                    self.advance(amt - keep, false);
                    self.start_command();
                    let state = self.state();
                    state.copy_from_stdin = true;
                    state.copy_from_stdin_candidate = false;
                    state.was_data_on_line = false;
                }
                TokenType::CopyFromStdinLine => {
                    self.emit_raw(amt, amt, SpecialMarker::CopyStdinLine);
                }
                TokenType::CopyFromStdinEnd { keep } => {
                    self.emit_raw(amt, keep, SpecialMarker::CopyStdinEnd);
                    let state = self.state();
                    state.copy_from_stdin = false;
                    state.was_data_on_line = false;
                }
                TokenType::Begin => {
                    self.advance(amt, true);
                    let state = self.state();
                    state.was_data_on_line = true;
                    state.begin_end_depth += 1;
                }
                TokenType::End => {
                    self.advance(amt, true);
                    let state = self.state();
                    state.was_data_on_line = true;
                    state.begin_end_depth = state.begin_end_depth.saturating_sub(1);
                }
            }
        }
    }

    /// Look for something else than whitespace, delimiters or comments between the
    /// delimiter and the end of its line.
    /// `None` if the end of the line is not available yet.
    fn data_after_delimiter(&self, amt: usize, eof: bool) -> Option<bool> {
        let ignore_comments = self.is_enabled(SplitterFlags::IGNORE_COMMENTS);
        let input = self.scanner.window(eof);
        let tokenizer = self.scanner.splitter();
        let mut offset = self.scanner.offset() + amt;
        while offset < input.len() {
            let (token_type, len) = tokenizer.split(input, offset, eof)?;
            match token_type {
                TokenType::Eoln => return Some(false),
                // empty statements
                TokenType::Whitespace | TokenType::Delimiter => {}
                TokenType::Comment => {
                    if !ignore_comments && input[offset..offset + len].contains('\n') {
                        return Some(true);
                    }
                }
                _ => return Some(true),
            }
            offset += len;
        }
        if eof {
            Some(false)
        } else {
            None
        }
    }

    fn split_lines(&mut self, eof: bool, by_empty_line: bool) {
        loop {
            let rest = self.scanner.remaining();
            if rest.is_empty() {
                break;
            }
            let Some(i) = memchr(b'\n', rest.as_bytes()) else {
                if eof {
                    let amt = rest.len();
                    self.advance_text(amt);
                }
                break;
            };
            let blank_line = rest[..i].trim().is_empty();
            self.advance_text(i);
            if by_empty_line && !blank_line {
                self.advance(1, false);
            } else {
                self.separator(1);
            }
        }
    }

    /// Consume `amt` bytes, updating trim marks
    fn advance(&mut self, amt: usize, content: bool) {
        if content && self.command.trim_start.is_none() {
            self.command.trim_start = Some(self.mark());
        }
        self.scanner.consume(amt);
        if content {
            self.command.trim_end = Some(self.mark());
        }
    }

    /// Consume `amt` bytes of text: leading and trailing whitespace excluded
    /// from the statement.
    fn advance_text(&mut self, amt: usize) {
        let text = &self.scanner.remaining()[..amt];
        let content = text.trim_start();
        let leading = amt - content.len();
        let len = content.trim_end().len();
        let trailing = content.len() - len;
        self.advance(leading, false);
        if len > 0 {
            self.advance(len, true);
        }
        self.advance(trailing, false);
    }

    /// End the current statement and skip its `amt` bytes separator
    fn separator(&mut self, amt: usize) {
        let end = self.mark();
        self.flush(end, None);
        self.advance(amt, false);
        self.start_command();
        self.state().copy_from_stdin_candidate = false;
    }

    /// Emit the current statement, if it is not blank
    fn flush(&mut self, end: Mark, marker: Option<SpecialMarker>) {
        let Command {
            start,
            trim_start: Some(trim_start),
            trim_end: Some(trim_end),
        } = self.command
        else {
            return;
        };
        let text = self.scanner.input()[trim_start.index..trim_end.index].to_owned();
        debug!(target: "splitter", "statement at {}: {:?}", trim_start.pos, text);
        self.command.trim_start = None;
        self.command.trim_end = None;
        self.emit(RichItem {
            text,
            start: start.pos,
            end: end.pos,
            trim_start: Some(trim_start.pos),
            trim_end: Some(trim_end.pos),
            special_marker: marker,
        });
    }

    /// Emit `keep` bytes of the next `amt` bytes as is
    fn emit_raw(&mut self, amt: usize, keep: usize, marker: SpecialMarker) {
        let start = self.mark();
        let text = self.scanner.remaining()[..keep].to_owned();
        self.scanner.consume(keep);
        let end = self.mark();
        self.scanner.consume(amt - keep);
        self.start_command();
        self.emit(RichItem {
            text,
            start: start.pos,
            end: end.pos,
            trim_start: Some(start.pos),
            trim_end: Some(end.pos),
            special_marker: Some(marker),
        });
    }

    fn emit(&mut self, item: RichItem) {
        let item = if self.is_enabled(SplitterFlags::RETURN_RICH_INFO) {
            SplitItem::Rich(item)
        } else {
            SplitItem::Text(item.text)
        };
        self.output.push_back(item);
    }

    fn start_command(&mut self) {
        self.command = Command::new(self.mark());
    }

    /// Drop buffered input preceding the current statement
    fn compact(&mut self) {
        let cut = self.command.start.index;
        if cut == 0 {
            return;
        }
        self.scanner.discard(cut);
        let command = &mut self.command;
        command.start.index -= cut;
        for mark in [&mut command.trim_start, &mut command.trim_end]
            .into_iter()
            .flatten()
        {
            mark.index -= cut;
        }
    }
}

impl std::fmt::Debug for QuerySplitter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySplitter")
            .field("scanner", &self.scanner)
            .field("state", self.scanner.splitter().state())
            .field("strategy", &self.strategy)
            .field("pending", &self.output.len())
            .finish()
    }
}
