use std::collections::HashSet;

use crate::errors::ParseError;

/// Sort direction taken from an optional `+`/`-` token prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Splits the direction prefix off a sort token. Tokens without a prefix
    /// are ascending.
    #[must_use]
    pub fn split_token(token: &str) -> (Self, &str) {
        if let Some(column) = token.strip_prefix('-') {
            (Self::Desc, column)
        } else if let Some(column) = token.strip_prefix('+') {
            (Self::Asc, column)
        } else {
            (Self::Asc, token)
        }
    }
}

/// Builds the sort clause for the given tokens, in request order.
///
/// `+col` and `col` produce `col`, `-col` produces `col desc`. Every column
/// must be sortable.
pub(crate) fn parse_sort(tokens: &[String], sort_fields: &HashSet<String>) -> Result<String, ParseError> {
    let mut clauses = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.is_empty() {
            return Err(ParseError::MissingSort);
        }
        let (direction, column) = SortDirection::split_token(token);
        if !sort_fields.contains(column) {
            return Err(ParseError::InvalidSort(column.to_string()));
        }
        clauses.push(match direction {
            SortDirection::Asc => column.to_string(),
            SortDirection::Desc => format!("{column} desc"),
        });
    }
    Ok(clauses.join(", "))
}
