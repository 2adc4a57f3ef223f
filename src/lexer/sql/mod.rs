//! Script tokenizer: recognizes the lexical units that matter for statement boundaries
use log::trace;
use memchr::{memchr, memmem};

use crate::dialect::{
    identifier_len, is_identifier_continue, keyword, Keyword, ParameterStyle, Quote,
    SplitterFlags, SplitterOptions,
};
use crate::lexer::scan::Splitter;


/// Token classification
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenType {
    /// String literal, quoted identifier or dollar-quoted string
    String,
    /// Active statement delimiter
    Delimiter,
    /// Space, tab or carriage return
    Whitespace,
    /// Line feed
    Eoln,
    /// Any other character
    Data,
    /// `DELIMITER xx` directive, with the new delimiter
    SetDelimiter(String),
    /// `SET SQLTERMINATOR` directive, with the new terminator (`None` for `OFF`)
    SetSqlTerminator(Option<String>),
    /// `GO` alone on its line
    GoDelimiter,
    /// `/` alone on its line
    SlashDelimiter,
    /// `CREATE PROCEDURE`, `ALTER FUNCTION`, ...
    CreateRoutine,
    /// `COPY` at the beginning of a line
    CopyFromStdin,
    /// `FROM stdin;` up to the end of the line.
    /// Only the first `keep` bytes belong to the statement.
    CopyFromStdinStart {
        /// length of `FROM stdin`
        keep: usize,
    },
    /// One line of `COPY` data, line feed included
    CopyFromStdinLine,
    /// `\.` line ending `COPY` data.
    /// Only the first `keep` bytes are reported.
    CopyFromStdinEnd {
        /// length of `\.`
        keep: usize,
    },
    /// Line or block comment
    Comment,
    /// `BEGIN` of a block
    Begin,
    /// `END` of a block
    End,
    /// Query parameter placeholder
    Parameter,
}

impl TokenType {
    /// Token terminates the current statement
    pub fn is_separator(&self) -> bool {
        matches!(
            self,
            TokenType::Delimiter
                | TokenType::SetDelimiter(_)
                | TokenType::SetSqlTerminator(_)
                | TokenType::GoDelimiter
                | TokenType::SlashDelimiter
        )
    }
}

/// Part of the tokenizer state updated by the statement splitter
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanState {
    /// Active statement delimiter (`None` when statements are not terminated)
    pub delimiter: Option<String>,
    /// Something else than whitespace has been seen on the current line
    pub was_data_on_line: bool,
    /// Inside `COPY ... FROM stdin;` data
    pub copy_from_stdin: bool,
    /// Current statement starts with `COPY`
    pub copy_from_stdin_candidate: bool,
    /// `BEGIN ... END` nesting level
    pub begin_end_depth: usize,
}

/// Tokenizer for one dialect
#[derive(Clone, Debug)]
pub struct Tokenizer<'o> {
    options: &'o SplitterOptions,
    state: ScanState,
}

impl<'o> Tokenizer<'o> {
    /// Tokenizer in its initial state
    pub fn new(options: &'o SplitterOptions) -> Tokenizer<'o> {
        Tokenizer {
            options,
            state: ScanState {
                delimiter: options.initial_delimiter().map(str::to_owned),
                ..ScanState::default()
            },
        }
    }

    /// Dialect options
    pub fn options(&self) -> &'o SplitterOptions {
        self.options
    }

    /// Current state
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Mutable state, for the statement splitter
    pub fn state_mut(&mut self) -> &mut ScanState {
        &mut self.state
    }

    fn is_enabled(&self, flags: SplitterFlags) -> bool {
        self.options.is_enabled(flags)
    }

    /// Active delimiter, unless suppressed by a `BEGIN ... END` block
    fn active_delimiter(&self) -> Option<&str> {
        if self.state.begin_end_depth > 0 {
            return None;
        }
        self.state.delimiter.as_deref().filter(|d| !d.is_empty())
    }

    fn begin(&self, data: &str, len: usize, eof: bool) -> Match {
        let Some((start, end)) = next_word(data, len, eof) else {
            return Match::Incomplete;
        };
        match keyword(&data[start..end]) {
            // BEGIN TRANSACTION, BEGIN IMMEDIATE, ...
            Some(
                Keyword::Deferred | Keyword::Immediate | Keyword::Exclusive | Keyword::Transaction,
            ) => Match::Missing,
            // BEGIN;
            _ if self
                .active_delimiter()
                .is_some_and(|d| data[start..].starts_with(d)) =>
            {
                Match::Missing
            }
            _ => Match::Token(TokenType::Begin, len),
        }
    }
}

enum Match {
    Token(TokenType, usize),
    /// rule does not apply
    Missing,
    /// rule may apply once more data is available
    Incomplete,
}

macro_rules! try_match {
    ($rule:expr) => {
        match $rule {
            Match::Token(token_type, amt) => return Some((token_type, amt)),
            Match::Incomplete => return None,
            Match::Missing => {}
        }
    };
}

impl Splitter for Tokenizer<'_> {
    type TokenType = TokenType;

    fn split(&self, input: &str, offset: usize, eof: bool) -> Option<(TokenType, usize)> {
        let data = &input[offset..];
        let token = self.split_data(input, data, offset, eof);
        trace!(target: "scanner", "split({offset}) = {token:?}");
        token
    }
}

impl Tokenizer<'_> {
    fn split_data(
        &self,
        input: &str,
        data: &str,
        offset: usize,
        eof: bool,
    ) -> Option<(TokenType, usize)> {
        if self.state.copy_from_stdin {
            return copy_from_stdin_line(data, eof);
        }
        let ch = data.chars().next()?;
        if let Some(quote) = self.options.quote(ch) {
            return literal(data, quote, eof);
        }
        if let Some(style) = self.options.parameter_style {
            if let Some(amt) = parameter(data, style) {
                return Some((TokenType::Parameter, amt));
            }
        }
        if let Some(delimiter) = self.active_delimiter() {
            if data.starts_with(delimiter) {
                return Some((TokenType::Delimiter, delimiter.len()));
            }
        }
        match ch {
            ' ' | '\t' | '\r' => return Some((TokenType::Whitespace, 1)),
            '\n' => return Some((TokenType::Eoln, 1)),
            _ => {}
        }
        if (self.is_enabled(SplitterFlags::DOUBLE_DASH_COMMENTS) && data.starts_with("--"))
            || (self.is_enabled(SplitterFlags::JAVASCRIPT_COMMENTS) && data.starts_with("//"))
        {
            return line_comment(data, eof);
        }
        if self.is_enabled(SplitterFlags::MULTILINE_COMMENTS) && data.starts_with("/*") {
            return block_comment(data, eof);
        }

        let line_start = !self.state.was_data_on_line;
        let word_start = offset == 0 || !is_identifier_continue(input.as_bytes()[offset - 1]);
        let word_len = if word_start { identifier_len(data) } else { 0 };
        let kw = keyword(&data[..word_len]);

        if kw == Some(Keyword::Delimiter)
            && line_start
            && self.is_enabled(SplitterFlags::ALLOW_CUSTOM_DELIMITER)
        {
            try_match!(set_delimiter(data, word_len));
        }
        if kw == Some(Keyword::Set) && self.is_enabled(SplitterFlags::ALLOW_CUSTOM_SQL_TERMINATOR) {
            try_match!(set_sql_terminator(data, word_len));
        }
        if kw == Some(Keyword::Go)
            && line_start
            && (self.is_enabled(SplitterFlags::ALLOW_GO_DELIMITER)
                || self.is_enabled(SplitterFlags::ADAPTIVE_GO_SPLIT))
        {
            try_match!(alone_on_line(data, word_len, TokenType::GoDelimiter));
        }
        if ch == '/' && line_start && self.is_enabled(SplitterFlags::ALLOW_SLASH_DELIMITER) {
            try_match!(alone_on_line(data, 1, TokenType::SlashDelimiter));
        }
        if matches!(kw, Some(Keyword::Create | Keyword::Alter))
            && self.is_enabled(SplitterFlags::ADAPTIVE_GO_SPLIT)
        {
            try_match!(create_routine(
                data,
                word_len,
                kw == Some(Keyword::Create),
                eof
            ));
        }
        if word_start
            && line_start
            && self.is_enabled(SplitterFlags::COPY_FROM_STDIN)
            && data.starts_with("COPY ")
        {
            return Some((TokenType::CopyFromStdin, "COPY".len()));
        }
        if word_start && self.state.copy_from_stdin_candidate && data.starts_with("FROM stdin;") {
            return Some(copy_from_stdin_start(data));
        }
        if self.is_enabled(SplitterFlags::SKIP_SEPARATOR_BEGIN_END) {
            match kw {
                Some(Keyword::Begin) => try_match!(self.begin(data, word_len, eof)),
                Some(Keyword::End) => try_match!(end(data, word_len, eof)),
                _ => {}
            }
        }
        if ch == '$' && self.is_enabled(SplitterFlags::ALLOW_DOLLAR_DOLLAR_STRING) {
            try_match!(dollar_quoted_string(data, eof));
        }
        Some((TokenType::Data, ch.len_utf8()))
    }
}

fn literal(data: &str, quote: &Quote, eof: bool) -> Option<(TokenType, usize)> {
    debug_assert!(data.starts_with(quote.open));
    let open = quote.open.len_utf8();
    let doubled = quote.escape == Some(quote.close);
    let mut chars = data[open..].char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let end = open + i + c.len_utf8();
        if doubled {
            if c == quote.close {
                match chars.peek() {
                    // escaped quote
                    Some(&(_, next)) if next == quote.close => {
                        chars.next();
                    }
                    Some(_) => return Some((TokenType::String, end)),
                    None if eof => return Some((TokenType::String, end)),
                    // may be followed by another quote
                    None => return None,
                }
            }
        } else if Some(c) == quote.escape {
            if chars.next().is_none() {
                break;
            }
        } else if c == quote.close {
            return Some((TokenType::String, end));
        }
    }
    // non-terminated literal
    if eof {
        Some((TokenType::String, data.len()))
    } else {
        None
    }
}

fn parameter(data: &str, style: ParameterStyle) -> Option<usize> {
    if !data.starts_with(style.marker()) {
        return None;
    }
    if style == ParameterStyle::Question {
        return Some(1);
    }
    // marker is ASCII
    match identifier_len(&data[1..]) {
        0 => None,
        n => Some(n + 1),
    }
}

fn line_comment(data: &str, eof: bool) -> Option<(TokenType, usize)> {
    match memchr(b'\n', data.as_bytes()) {
        Some(i) => Some((TokenType::Comment, i)),
        None if eof => Some((TokenType::Comment, data.len())),
        None => None,
    }
}

fn block_comment(data: &str, eof: bool) -> Option<(TokenType, usize)> {
    match memmem::find(&data.as_bytes()[2..], b"*/") {
        Some(i) => Some((TokenType::Comment, i + 4)),
        // non-terminated comment
        None if eof => Some((TokenType::Comment, data.len())),
        None => None,
    }
}

fn blank_len(data: &str) -> usize {
    data.bytes().take_while(|&b| b == b' ' || b == b'\t').count()
}

fn line_len(data: &str) -> usize {
    memchr(b'\n', data.as_bytes()).unwrap_or(data.len())
}

/// Skip whitespace (line feeds included) from `from` then read a word.
/// `None` if the input ends before the word is known.
fn next_word(data: &str, from: usize, eof: bool) -> Option<(usize, usize)> {
    let start = from
        + data[from..]
            .bytes()
            .take_while(|b| b.is_ascii_whitespace())
            .count();
    if start == data.len() && !eof {
        return None;
    }
    Some((start, start + identifier_len(&data[start..])))
}

/// `DELIMITER <new delimiter>`
fn set_delimiter(data: &str, len: usize) -> Match {
    let blanks = blank_len(&data[len..]);
    if blanks == 0 {
        return Match::Missing;
    }
    let end = line_len(data);
    let delimiter = data[len + blanks..end].trim();
    if delimiter.is_empty() {
        return Match::Missing;
    }
    Match::Token(TokenType::SetDelimiter(delimiter.to_owned()), end)
}

/// `SET SQLT[ERMINATOR] ON|OFF|"<terminator>"`
fn set_sql_terminator(data: &str, len: usize) -> Match {
    let line = &data[..line_len(data)];
    let mut i = len;
    let blanks = blank_len(&line[i..]);
    if blanks == 0 {
        return Match::Missing;
    }
    i += blanks;
    let word = identifier_len(&line[i..]);
    if keyword(&line[i..i + word]) != Some(Keyword::SqlTerminator) {
        return Match::Missing;
    }
    i += word;
    let blanks = blank_len(&line[i..]);
    if blanks == 0 {
        return Match::Missing;
    }
    i += blanks;
    let rest = &line[i..];
    let terminator = if let Some(quoted) = rest.strip_prefix('"') {
        match quoted.find('"') {
            Some(end) if end > 0 => {
                i += end + 2;
                Some(quoted[..end].to_owned())
            }
            _ => return Match::Missing,
        }
    } else {
        let word = identifier_len(rest);
        let terminator = match keyword(&rest[..word]) {
            Some(Keyword::On) => Some(";".to_owned()),
            Some(Keyword::Off) => None,
            _ => return Match::Missing,
        };
        i += word;
        terminator
    };
    i += blank_len(&line[i..]);
    Match::Token(TokenType::SetSqlTerminator(terminator), i)
}

/// `len` bytes followed by blanks only up to the end of the line.
/// The line feed is not consumed.
fn alone_on_line(data: &str, len: usize, token_type: TokenType) -> Match {
    let rest = &data.as_bytes()[len..];
    let blanks = rest
        .iter()
        .take_while(|&&b| b == b' ' || b == b'\t' || b == b'\r')
        .count();
    match rest.get(blanks) {
        None | Some(b'\n') => Match::Token(token_type, len + blanks),
        _ => Match::Missing,
    }
}

/// `CREATE [OR REPLACE|OR ALTER] PROCEDURE|FUNCTION|TRIGGER`
fn create_routine(data: &str, from: usize, or_allowed: bool, eof: bool) -> Match {
    let Some((start, end)) = next_word(data, from, eof) else {
        return Match::Incomplete;
    };
    if start == from {
        return Match::Missing;
    }
    match keyword(&data[start..end]) {
        Some(Keyword::Procedure | Keyword::Function | Keyword::Trigger) => {
            Match::Token(TokenType::CreateRoutine, end)
        }
        Some(Keyword::Or) if or_allowed => {
            let Some((start, next)) = next_word(data, end, eof) else {
                return Match::Incomplete;
            };
            if start == end || !matches!(keyword(&data[start..next]), Some(Keyword::Replace | Keyword::Alter))
            {
                return Match::Missing;
            }
            create_routine(data, next, false, eof)
        }
        _ => Match::Missing,
    }
}

/// `END` but not `END TRANSACTION` nor `END IF`
fn end(data: &str, len: usize, eof: bool) -> Match {
    let Some((start, end)) = next_word(data, len, eof) else {
        return Match::Incomplete;
    };
    match keyword(&data[start..end]) {
        Some(Keyword::Transaction | Keyword::If) => Match::Missing,
        _ => Match::Token(TokenType::End, len),
    }
}

/// `$label$ ... $label$`
fn dollar_quoted_string(data: &str, eof: bool) -> Match {
    let label_len = 1 + identifier_len(&data[1..]);
    if data.as_bytes().get(label_len) != Some(&b'$') {
        return Match::Missing;
    }
    let label = &data.as_bytes()[..=label_len];
    match memmem::find(&data.as_bytes()[label.len()..], label) {
        Some(i) => Match::Token(TokenType::String, 2 * label.len() + i),
        // scanned as data
        None if eof => Match::Missing,
        None => Match::Incomplete,
    }
}

fn copy_from_stdin_start(data: &str) -> (TokenType, usize) {
    let end = memchr(b'\n', data.as_bytes()).map_or(data.len(), |i| i + 1);
    (
        TokenType::CopyFromStdinStart {
            keep: "FROM stdin".len(),
        },
        end,
    )
}

fn copy_from_stdin_line(data: &str, eof: bool) -> Option<(TokenType, usize)> {
    let end = match memchr(b'\n', data.as_bytes()) {
        Some(i) => i + 1,
        None if eof => data.len(),
        None => return None,
    };
    if data[..end].trim_end() == "\\." {
        Some((TokenType::CopyFromStdinEnd { keep: 2 }, end))
    } else {
        Some((TokenType::CopyFromStdinLine, end))
    }
}
