//! Query parameters (placeholders) lookup and substitution
use std::borrow::{Borrow, Cow};
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use indexmap::IndexSet;

use crate::dialect::{ParameterStyle, SplitterOptions};
use crate::lexer::sql::{TokenType, Tokenizer};
use crate::lexer::Scanner;

/// Placeholders found in a script
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParameterInfo {
    /// Number of placeholder occurrences
    pub count: u32,
    /// Distinct placeholder names, in order of first appearance
    pub names: IndexSet<String>,
}

impl ParameterInfo {
    /// Collect placeholders of `sql`
    pub fn new(sql: &str, options: &SplitterOptions) -> ParameterInfo {
        let mut info = ParameterInfo::default();
        scan(sql, options, |_, name| {
            if let Some(name) = name {
                info.count += 1;
                info.names.insert(name.into_owned());
            }
        });
        info
    }
}

/// Distinct placeholder names of `sql`, in order of first appearance.
///
/// Anonymous `?` placeholders are named `?1`, `?2`, ...
pub fn extract_query_parameters(sql: &str, options: &SplitterOptions) -> IndexSet<String> {
    ParameterInfo::new(sql, options).names
}

/// Substitute placeholders of `sql` by their value in `values`.
///
/// Placeholders without value are kept as is.
pub fn replace_query_parameters<K, V, S>(
    sql: &str,
    values: &HashMap<K, V, S>,
    options: &SplitterOptions,
) -> String
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    let mut result = String::with_capacity(sql.len());
    scan(sql, options, |text, name| {
        match name.and_then(|name| values.get(&*name)) {
            Some(value) => result.push_str(value.as_ref()),
            None => result.push_str(text),
        }
    });
    result
}

/// Call `f` with the text of each token and, for placeholders, their name.
fn scan<F>(sql: &str, options: &SplitterOptions, mut f: F)
where
    F: FnMut(&str, Option<Cow<'_, str>>),
{
    let Some(style) = options.parameter_style else {
        f(sql, None);
        return;
    };
    if sql.is_empty() {
        return;
    }
    let mut scanner = Scanner::with_input(sql.to_owned(), Tokenizer::new(options));
    let mut anonymous = 0;
    while let Some((token_type, amt)) = scanner.peek(true) {
        let amt = match token_type {
            TokenType::Parameter
            | TokenType::String
            | TokenType::Comment
            | TokenType::Whitespace
            | TokenType::Eoln
            | TokenType::Data => amt,
            // directives and boundaries may contain placeholders
            _ => scanner.remaining().chars().next().map_or(amt, char::len_utf8),
        };
        let state = scanner.splitter_mut().state_mut();
        match token_type {
            TokenType::Eoln => state.was_data_on_line = false,
            TokenType::Whitespace => {}
            _ => state.was_data_on_line = true,
        }
        let start = scanner.offset();
        scanner.consume(amt);
        let text = &scanner.input()[start..start + amt];
        if token_type != TokenType::Parameter {
            f(text, None);
        } else if style == ParameterStyle::Question {
            anonymous += 1;
            f(text, Some(Cow::Owned(format!("?{anonymous}"))));
        } else {
            f(text, Some(Cow::Borrowed(text)));
        }
    }
}
