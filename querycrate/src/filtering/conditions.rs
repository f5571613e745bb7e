use std::collections::BTreeMap;

use crate::errors::ParseError;
use crate::models::QueryParams;
use crate::schema::WrapFn;
use crate::value::{self, ParseFn, Value};

/// Comparison operator of a filter key, selected by the key suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Equal,
    NotEqual,
    Like,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl FilterOperator {
    const STRING: [Self; 3] = [Self::Equal, Self::NotEqual, Self::Like];
    const ORDERED: [Self; 6] = [
        Self::Equal,
        Self::NotEqual,
        Self::LessThan,
        Self::LessThanOrEqual,
        Self::GreaterThan,
        Self::GreaterThanOrEqual,
    ];
    const BOOL: [Self; 2] = [Self::Equal, Self::NotEqual];

    /// Key suffix, appended after the separator (`age` + `_` + `gte`).
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Equal => "eq",
            Self::NotEqual => "neq",
            Self::Like => "like",
            Self::LessThan => "lt",
            Self::LessThanOrEqual => "lte",
            Self::GreaterThan => "gt",
            Self::GreaterThanOrEqual => "gte",
        }
    }

    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::Like => "LIKE",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
        }
    }
}

/// A compiled filter key.
#[derive(Clone)]
pub(crate) struct FilterField {
    /// Fragment with a single placeholder, e.g. `age > ?`.
    pub(crate) exp: String,
    pub(crate) parse: ParseFn,
    pub(crate) wrap: Option<WrapFn>,
    pub(crate) split_on_comma: bool,
}

impl FilterField {
    fn wrap(&self, exp: String) -> String {
        match &self.wrap {
            Some(wrap) => wrap(&exp),
            None => exp,
        }
    }
}

/// Everything registered for one filterable column.
pub(crate) struct FieldRegistration<'a> {
    /// Base of the filter keys: the column, or its `param=` override.
    pub(crate) key: &'a str,
    pub(crate) column: &'a str,
    pub(crate) separator: &'a str,
    pub(crate) split_on_comma: bool,
    pub(crate) wrap: Option<WrapFn>,
}

/// Filter key → compiled filter. Ordered so that translation visits keys
/// deterministically.
#[derive(Clone, Default)]
pub(crate) struct FilterTable(BTreeMap<String, FilterField>);

impl FilterTable {
    pub(crate) fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn add_string_field(&mut self, field: &FieldRegistration<'_>) {
        for op in FilterOperator::STRING {
            let parse = if op == FilterOperator::Like {
                value::parse_like_string
            } else {
                value::parse_string
            };
            self.add_operator(field, op, parse);
        }
    }

    /// Integers and timestamps: equality plus the four comparisons.
    pub(crate) fn add_ordered_field(&mut self, field: &FieldRegistration<'_>, parse: ParseFn) {
        for op in FilterOperator::ORDERED {
            self.add_operator(field, op, parse);
        }
    }

    pub(crate) fn add_bool_field(&mut self, field: &FieldRegistration<'_>) {
        for op in FilterOperator::BOOL {
            self.add_operator(field, op, value::parse_bool);
        }
    }

    fn add_operator(&mut self, field: &FieldRegistration<'_>, op: FilterOperator, parse: ParseFn) {
        let filter = FilterField {
            exp: format!("{} {} ?", field.column, op.sql()),
            parse,
            wrap: field.wrap.clone(),
            split_on_comma: field.split_on_comma,
        };
        // The bare key is the equality form.
        if op == FilterOperator::Equal {
            self.0.insert(field.key.to_string(), filter.clone());
        }
        let key = format!("{}{}{}", field.key, field.separator, op.suffix());
        self.0.insert(key, filter);
    }
}

/// Builds the filter expression and its bound values from the request.
///
/// Each key present in both the request and the table yields one term:
/// `col OP ?` for a single value, or `(col OP ? OR col OP ? ...)` for several,
/// passed through the key's wrap transform. Terms are joined with `AND`.
pub(crate) fn parse_filter(params: &QueryParams, filters: &FilterTable) -> Result<(String, Vec<Value>), ParseError> {
    let mut terms = Vec::new();
    let mut values = Vec::new();

    for (name, filter) in &filters.0 {
        let Some(args) = params.get_all(name) else {
            continue;
        };
        let args: Vec<&str> = match args {
            [single] if filter.split_on_comma && single.contains(',') => single.split(',').collect(),
            _ => args.iter().map(String::as_str).collect(),
        };
        if args.is_empty() {
            continue;
        }

        let mut fragments = Vec::with_capacity(args.len());
        for arg in args {
            let value = (filter.parse)(arg).ok_or_else(|| ParseError::InvalidFilter(name.clone()))?;
            values.push(value);
            fragments.push(filter.exp.as_str());
        }

        let exp = if fragments.len() > 1 {
            format!("({})", fragments.join(" OR "))
        } else {
            fragments.concat()
        };
        let exp = filter.wrap(exp);
        if !exp.is_empty() {
            terms.push(exp);
        }
    }

    Ok((terms.join(" AND "), values))
}
