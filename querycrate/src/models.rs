use serde::Serialize;
use std::collections::HashMap;

use crate::value::Value;

/// Multi-valued query-string parameters, as decoded from a request URI.
///
/// ```rust
/// use querycrate::QueryParams;
///
/// let params = QueryParams::parse("name_eq=a8m&name_eq=pos&sort=-age&search=red%20collar");
/// assert_eq!(params.get_all("name_eq").unwrap(), ["a8m", "pos"]);
/// assert_eq!(params.get("search"), Some("red collar"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(HashMap<String, Vec<String>>);

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an `application/x-www-form-urlencoded` query string. A leading
    /// `?` is ignored.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// First value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|values| values.first()).map(String::as_str)
    }

    /// All values of `key`, in request order.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Appends a value to `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, Vec<String>>> for QueryParams {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.append(key, value);
        }
        params
    }
}

/// Query options produced for one request, ready to apply to a database query.
///
/// `filter` holds positional `?` placeholders; `values` holds the bound value
/// of each placeholder, in order.
///
/// ```text
/// filter: "age > ? AND (name = ? OR name = ?)"
/// values: [10, "a8m", "pos"]
/// sort:   "age desc, name"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DbQuery {
    /// Maximum number of rows to return.
    pub limit: u64,
    /// Number of rows to skip. Used for pagination.
    pub offset: u64,
    /// `column [desc]` clauses joined by `", "`. Empty means unordered.
    pub sort: String,
    /// Columns to retrieve joined by `","`. Empty means all columns.
    pub select: String,
    pub filter: String,
    pub values: Vec<Value>,
}

impl DbQuery {
    /// Adds `expression` to the filter with an AND condition.
    pub fn and(&mut self, expression: &str, values: impl IntoIterator<Item = Value>) {
        if expression.is_empty() {
            return;
        }
        if !self.filter.is_empty() {
            self.filter.push_str(" AND ");
        }
        self.filter.push_str(expression);
        self.values.extend(values);
    }

    /// Number of `?` placeholders in the filter.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.filter.matches('?').count()
    }

    /// The filter split into its top-level AND terms. Parenthesized groups are
    /// kept whole, and so is the `AND` closing a `BETWEEN ? AND ?` range.
    /// Keywords are matched case-insensitively.
    #[must_use]
    pub fn conditions(&self) -> Vec<&str> {
        let filter = self.filter.as_str();
        let mut terms = Vec::new();
        let mut depth = 0usize;
        let mut start = 0;
        let mut in_range = false;
        let mut i = 0;
        while i < filter.len() {
            match filter.as_bytes()[i] {
                b'(' => depth += 1,
                b')' => depth = depth.saturating_sub(1),
                b' ' if depth == 0 && keyword_at(filter, i, " BETWEEN ") => {
                    in_range = true;
                    i += " BETWEEN ".len();
                    continue;
                }
                b' ' if depth == 0 && keyword_at(filter, i, " AND ") => {
                    if !in_range {
                        terms.push(&filter[start..i]);
                        start = i + " AND ".len();
                    }
                    in_range = false;
                    i += " AND ".len();
                    continue;
                }
                _ => {}
            }
            i += 1;
        }
        if start < filter.len() {
            terms.push(&filter[start..]);
        }
        terms
    }

    /// Compares two descriptors, ignoring the order of filter terms and bound
    /// values. Values are compared as multisets.
    #[must_use]
    pub fn same_conditions(&self, other: &Self) -> bool {
        let mut ours = self.conditions();
        let mut theirs = other.conditions();
        ours.sort_unstable();
        theirs.sort_unstable();

        self.limit == other.limit
            && self.offset == other.offset
            && ours == theirs
            && same_values(&self.values, &other.values)
    }
}

fn keyword_at(filter: &str, at: usize, keyword: &str) -> bool {
    filter
        .as_bytes()
        .get(at..at + keyword.len())
        .is_some_and(|bytes| bytes.eq_ignore_ascii_case(keyword.as_bytes()))
}

fn same_values(left: &[Value], right: &[Value]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut remaining = right.to_vec();
    left.iter().all(|value| {
        remaining
            .iter()
            .position(|other| other == value)
            .map(|found| remaining.swap_remove(found))
            .is_some()
    })
}
