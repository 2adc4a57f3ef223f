//! Dialect presets and keyword classification
use std::fmt;
use std::str::FromStr;

use uncased::UncasedStr;

mod options;

pub use options::{ParameterStyle, Quote, SplitterFlags, SplitterOptions};

/// Words the scanner gives a special meaning to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    /// `ALTER`
    Alter,
    /// `BEGIN`
    Begin,
    /// `CREATE`
    Create,
    /// `DEFERRED`
    Deferred,
    /// `DELIMITER`
    Delimiter,
    /// `END`
    End,
    /// `EXCLUSIVE`
    Exclusive,
    /// `FUNCTION`
    Function,
    /// `GO`
    Go,
    /// `IF`
    If,
    /// `IMMEDIATE`
    Immediate,
    /// `OFF`
    Off,
    /// `ON`
    On,
    /// `OR`
    Or,
    /// `PROCEDURE`
    Procedure,
    /// `REPLACE`
    Replace,
    /// `SET`
    Set,
    /// `SQLT` or `SQLTERMINATOR`
    SqlTerminator,
    /// `TRANSACTION`
    Transaction,
    /// `TRIGGER`
    Trigger,
}

include!(concat!(env!("OUT_DIR"), "/keywords.rs"));

/// Check if `word` is a keyword (case-insensitive)
pub fn keyword(word: &str) -> Option<Keyword> {
    if word.is_empty() || word.len() > MAX_KEYWORD_LEN {
        return None;
    }
    KEYWORDS.get(UncasedStr::new(word)).copied()
}

/// Bytes allowed in placeholder names, dollar-quote labels and keywords
pub fn is_identifier_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Length of the identifier run at the start of `data`
pub(crate) fn identifier_len(data: &str) -> usize {
    data.bytes()
        .position(|b| !is_identifier_continue(b))
        .unwrap_or(data.len())
}

/// Named option presets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Generic SQL: `;` delimiter, `'` strings
    Default,
    /// MySQL / MariaDB
    MySql,
    /// SQL Server
    MsSql,
    /// PostgreSQL
    Postgres,
    /// SQLite
    Sqlite,
    /// Oracle / SQL*Plus scripts
    Oracle,
    /// Mongo shell scripts
    Mongo,
    /// Redis commands, one per line
    Redis,
    /// Keep the whole input as a single statement
    NoSplit,
}

impl Dialect {
    /// Options of this preset
    pub fn options(self) -> SplitterOptions {
        match self {
            Dialect::Default => SplitterOptions::default(),
            Dialect::MySql => SplitterOptions::mysql(),
            Dialect::MsSql => SplitterOptions::mssql(),
            Dialect::Postgres => SplitterOptions::postgres(),
            Dialect::Sqlite => SplitterOptions::sqlite(),
            Dialect::Oracle => SplitterOptions::oracle(),
            Dialect::Mongo => SplitterOptions::mongo(),
            Dialect::Redis => SplitterOptions::redis(),
            Dialect::NoSplit => SplitterOptions::no_split(),
        }
    }

    /// Preset name, as accepted by `from_str`
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Default => "default",
            Dialect::MySql => "mysql",
            Dialect::MsSql => "mssql",
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
            Dialect::Oracle => "oracle",
            Dialect::Mongo => "mongo",
            Dialect::Redis => "redis",
            Dialect::NoSplit => "nosplit",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown preset name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownDialect(pub String);

impl fmt::Display for UnknownDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown dialect: {}", self.0)
    }
}

impl std::error::Error for UnknownDialect {}

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = UncasedStr::new(s);
        Ok(if name == "default" {
            Dialect::Default
        } else if name == "mysql" || name == "mariadb" {
            Dialect::MySql
        } else if name == "mssql" || name == "sqlserver" {
            Dialect::MsSql
        } else if name == "postgres" || name == "postgresql" {
            Dialect::Postgres
        } else if name == "sqlite" {
            Dialect::Sqlite
        } else if name == "oracle" {
            Dialect::Oracle
        } else if name == "mongo" || name == "mongodb" {
            Dialect::Mongo
        } else if name == "redis" {
            Dialect::Redis
        } else if name == "nosplit" {
            Dialect::NoSplit
        } else {
            return Err(UnknownDialect(s.to_owned()));
        })
    }
}
