use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Lexical features enabled for a dialect
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SplitterFlags: u32 {
        /// `;` terminates statements
        const ALLOW_SEMICOLON = 1;
        /// MySQL `DELIMITER xx` directive
        const ALLOW_CUSTOM_DELIMITER = 1 << 1;
        /// SQL*Plus `SET SQLT[ERMINATOR] ON|OFF|"x"` directive
        const ALLOW_CUSTOM_SQL_TERMINATOR = 1 << 2;
        /// `GO` alone on its line terminates statements
        const ALLOW_GO_DELIMITER = 1 << 3;
        /// `/` alone on its line terminates statements
        const ALLOW_SLASH_DELIMITER = 1 << 4;
        /// PostgreSQL `$tag$ ... $tag$` strings
        const ALLOW_DOLLAR_DOLLAR_STRING = 1 << 5;
        /// Return the input as a single statement.
        /// Leading and trailing whitespace is trimmed; blank input gives nothing.
        const NO_SPLIT = 1 << 6;
        /// `-- ...` comments
        const DOUBLE_DASH_COMMENTS = 1 << 7;
        /// `/* ... */` comments
        const MULTILINE_COMMENTS = 1 << 8;
        /// `// ...` comments
        const JAVASCRIPT_COMMENTS = 1 << 9;
        /// Delimiters inside `BEGIN ... END` blocks do not split
        const SKIP_SEPARATOR_BEGIN_END = 1 << 10;
        /// Comments are not part of statement boundaries
        const IGNORE_COMMENTS = 1 << 11;
        /// Statements sharing a line with a following statement are not split
        const PREVENT_SINGLE_LINE_SPLIT = 1 << 12;
        /// Split by `;` except in routine bodies, which end with `GO`
        const ADAPTIVE_GO_SPLIT = 1 << 13;
        /// Emit statements with their source positions
        const RETURN_RICH_INFO = 1 << 14;
        /// One statement per line
        const SPLIT_BY_LINES = 1 << 15;
        /// Statements are separated by blank lines
        const SPLIT_BY_EMPTY_LINE = 1 << 16;
        /// PostgreSQL `COPY ... FROM stdin;` data blocks
        const COPY_FROM_STDIN = 1 << 17;
    }
}

/// String literal (or quoted identifier) syntax
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Quote {
    /// Opening character
    pub open: char,
    /// Closing character
    pub close: char,
    /// Escape character: `close` for doubled closers, `\\` for backslash escapes
    pub escape: Option<char>,
}

impl Quote {
    /// Closer is escaped by doubling it
    pub const fn doubled(open: char, close: char) -> Quote {
        Quote {
            open,
            close,
            escape: Some(close),
        }
    }
    /// Any character following `escape` is literal
    pub const fn escaped(open: char, close: char, escape: char) -> Quote {
        Quote {
            open,
            close,
            escape: Some(escape),
        }
    }
    /// Literal ends at the first closer
    pub const fn plain(open: char, close: char) -> Quote {
        Quote {
            open,
            close,
            escape: None,
        }
    }
}

/// Placeholder syntax
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParameterStyle {
    /// `?` (anonymous)
    Question,
    /// `$name`
    Dollar,
    /// `@name`
    At,
    /// `:name`
    Colon,
    /// `#name`
    Hash,
}

impl ParameterStyle {
    /// Marker character
    pub fn marker(self) -> char {
        match self {
            ParameterStyle::Question => '?',
            ParameterStyle::Dollar => '$',
            ParameterStyle::At => '@',
            ParameterStyle::Colon => ':',
            ParameterStyle::Hash => '#',
        }
    }
}

impl TryFrom<char> for ParameterStyle {
    type Error = char;

    fn try_from(marker: char) -> Result<Self, Self::Error> {
        Ok(match marker {
            '?' => ParameterStyle::Question,
            '$' => ParameterStyle::Dollar,
            '@' => ParameterStyle::At,
            ':' => ParameterStyle::Colon,
            '#' => ParameterStyle::Hash,
            _ => return Err(marker),
        })
    }
}

impl fmt::Display for ParameterStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.marker())
    }
}

/// Lexical rules used to split a script
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitterOptions {
    /// Recognized string literals
    pub quotes: Vec<Quote>,
    /// Enabled features
    pub flags: SplitterFlags,
    /// Placeholder syntax, if any
    pub parameter_style: Option<ParameterStyle>,
}

impl Default for SplitterOptions {
    fn default() -> SplitterOptions {
        SplitterOptions {
            quotes: vec![Quote::doubled('\'', '\'')],
            flags: SplitterFlags::ALLOW_SEMICOLON
                | SplitterFlags::DOUBLE_DASH_COMMENTS
                | SplitterFlags::MULTILINE_COMMENTS,
            parameter_style: None,
        }
    }
}

impl SplitterOptions {
    /// MySQL: `DELIMITER`, backslash escapes, backtick identifiers
    pub fn mysql() -> SplitterOptions {
        SplitterOptions {
            quotes: vec![Quote::escaped('\'', '\'', '\\'), Quote::doubled('`', '`')],
            ..SplitterOptions::default()
        }
        .with(SplitterFlags::ALLOW_CUSTOM_DELIMITER)
    }

    /// SQL Server: `GO` batches, bracketed identifiers
    pub fn mssql() -> SplitterOptions {
        SplitterOptions {
            quotes: vec![Quote::doubled('\'', '\''), Quote::plain('[', ']')],
            ..SplitterOptions::default()
        }
        .without(SplitterFlags::ALLOW_SEMICOLON)
        .with(SplitterFlags::ALLOW_GO_DELIMITER)
    }

    /// PostgreSQL: dollar-quoted strings
    pub fn postgres() -> SplitterOptions {
        SplitterOptions {
            quotes: vec![Quote::doubled('\'', '\''), Quote::doubled('"', '"')],
            ..SplitterOptions::default()
        }
        .with(SplitterFlags::ALLOW_DOLLAR_DOLLAR_STRING)
    }

    /// SQLite: `BEGIN ... END` trigger bodies
    pub fn sqlite() -> SplitterOptions {
        SplitterOptions {
            quotes: vec![Quote::doubled('\'', '\''), Quote::doubled('"', '"')],
            ..SplitterOptions::default()
        }
        .with(SplitterFlags::SKIP_SEPARATOR_BEGIN_END)
    }

    /// Mongo shell: JavaScript strings
    pub fn mongo() -> SplitterOptions {
        SplitterOptions {
            quotes: vec![Quote::escaped('\'', '\'', '\\'), Quote::escaped('"', '"', '\\')],
            ..SplitterOptions::default()
        }
    }

    /// Whole input is one statement
    pub fn no_split() -> SplitterOptions {
        SplitterOptions::default().with(SplitterFlags::NO_SPLIT)
    }

    /// Redis: one command per line
    pub fn redis() -> SplitterOptions {
        SplitterOptions::default().with(SplitterFlags::SPLIT_BY_LINES)
    }

    /// Oracle: `SET SQLTERMINATOR` and `/`
    pub fn oracle() -> SplitterOptions {
        SplitterOptions {
            quotes: vec![Quote::doubled('\'', '\''), Quote::doubled('"', '"')],
            ..SplitterOptions::default()
        }
        .with(SplitterFlags::ALLOW_CUSTOM_SQL_TERMINATOR | SplitterFlags::ALLOW_SLASH_DELIMITER)
    }

    /// Enable `flags`
    #[must_use]
    pub fn with(mut self, flags: SplitterFlags) -> SplitterOptions {
        self.flags.insert(flags);
        self
    }

    /// Disable `flags`
    #[must_use]
    pub fn without(mut self, flags: SplitterFlags) -> SplitterOptions {
        self.flags.remove(flags);
        self
    }

    /// Recognize placeholders
    #[must_use]
    pub fn with_parameter_style(mut self, style: ParameterStyle) -> SplitterOptions {
        self.parameter_style = Some(style);
        self
    }

    /// Check if all `flags` are enabled
    pub fn is_enabled(&self, flags: SplitterFlags) -> bool {
        self.flags.contains(flags)
    }

    /// Quote opened by `ch`
    pub fn quote(&self, ch: char) -> Option<&Quote> {
        self.quotes.iter().find(|q| q.open == ch)
    }

    /// Delimiter active before any directive
    pub fn initial_delimiter(&self) -> Option<&'static str> {
        if self.is_enabled(SplitterFlags::ADAPTIVE_GO_SPLIT)
            || self.is_enabled(SplitterFlags::ALLOW_SEMICOLON)
        {
            Some(";")
        } else {
            None
        }
    }
}
