//! Statements produced by the splitter
use std::fmt;

use crate::lexer::Pos;

/// Tags items of a `COPY ... FROM stdin` block
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecialMarker {
    /// The `COPY` statement itself
    CopyStdinStart,
    /// One data line, line feed included
    CopyStdinLine,
    /// The `\.` line
    CopyStdinEnd,
}

impl SpecialMarker {
    /// Marker name
    pub fn as_str(self) -> &'static str {
        match self {
            SpecialMarker::CopyStdinStart => "copy_stdin_start",
            SpecialMarker::CopyStdinLine => "copy_stdin_line",
            SpecialMarker::CopyStdinEnd => "copy_stdin_end",
        }
    }
}

impl fmt::Display for SpecialMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statement with its location in the input
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RichItem {
    /// Statement text, without surrounding whitespace
    pub text: String,
    /// Where the statement starts, leading whitespace included
    pub start: Pos,
    /// Where the statement ends, before its delimiter
    pub end: Pos,
    /// Where `text` starts
    pub trim_start: Option<Pos>,
    /// Where `text` ends
    pub trim_end: Option<Pos>,
    /// Set for `COPY ... FROM stdin` items
    pub special_marker: Option<SpecialMarker>,
}

/// One statement
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SplitItem {
    /// Statement text only
    Text(String),
    /// Statement with positions, when `RETURN_RICH_INFO` is set
    Rich(RichItem),
}

impl SplitItem {
    /// Statement text
    pub fn text(&self) -> &str {
        match self {
            SplitItem::Text(text) => text,
            SplitItem::Rich(item) => &item.text,
        }
    }

    /// Statement text, positions dropped
    pub fn into_text(self) -> String {
        match self {
            SplitItem::Text(text) => text,
            SplitItem::Rich(item) => item.text,
        }
    }

    /// Positions, when available
    pub fn rich(&self) -> Option<&RichItem> {
        match self {
            SplitItem::Text(_) => None,
            SplitItem::Rich(item) => Some(item),
        }
    }

    /// `COPY ... FROM stdin` tag
    pub fn special_marker(&self) -> Option<SpecialMarker> {
        self.rich().and_then(|item| item.special_marker)
    }
}

impl fmt::Display for SplitItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl From<SplitItem> for String {
    fn from(item: SplitItem) -> String {
        item.into_text()
    }
}
