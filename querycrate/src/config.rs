//! Builder configuration.
//!
//! [`Config`] is plain data and can be deserialized from any serde format; the
//! model schema is attached separately and is never serialized.
//!
//! ```rust
//! use querycrate::{Config, FieldSpec, ModelSchema, ValueKind};
//!
//! let config: Config = serde_json::from_str(r#"{"default_limit": 10, "limit_param": "lp"}"#).unwrap();
//! let config = config.with_model(
//!     ModelSchema::new("Pet").field(FieldSpec::new("Name", ValueKind::String).tag("query", "filter")),
//! );
//! assert_eq!(config.default_limit, 10);
//! assert_eq!(config.offset_param, "offset");
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::schema::{ModelSchema, QueryModel};

pub const DEFAULT_TAG_NAME: &str = "query";
pub const DEFAULT_SEPARATOR: &str = "_";
pub const DEFAULT_SORT_PARAM: &str = "sort";
pub const DEFAULT_LIMIT_PARAM: &str = "limit";
pub const DEFAULT_OFFSET_PARAM: &str = "offset";
pub const DEFAULT_SEARCH_OPERATOR: &str = "AND";
pub const DEFAULT_LIMIT: u64 = 25;
pub const DEFAULT_LIMIT_MAX_VALUE: u64 = 100;

/// Name of the free-text search parameter.
pub const SEARCH_PARAM: &str = "search";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The model the builder compiles. Required.
    #[serde(skip)]
    pub model: Option<ModelSchema>,
    /// Tag holding the capability options of each field.
    pub tag_name: String,
    /// Joins a filter key and its operator, e.g. `age` + `_` + `gt`.
    pub separator: String,
    /// Skip sort parsing entirely; `default_sort` is always used.
    pub ignore_sort: bool,
    pub sort_param: String,
    /// Used when the request has no sort parameter, e.g. `"created_at desc"`.
    pub default_sort: String,
    pub limit_param: String,
    pub default_limit: u64,
    /// Upper bound for the limit parameter. `None` disables the check.
    pub limit_max_value: Option<u64>,
    pub offset_param: String,
    /// Combines several search terms. `AND` or `OR`.
    pub search_operator: String,
    /// Emit the compiled column list as `select`.
    pub explicit_select: bool,
    /// Leave `detailed` fields out of the select list. Implies
    /// `explicit_select`.
    pub only_select_non_detailed_fields: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: None,
            tag_name: DEFAULT_TAG_NAME.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            ignore_sort: false,
            sort_param: DEFAULT_SORT_PARAM.to_string(),
            default_sort: String::new(),
            limit_param: DEFAULT_LIMIT_PARAM.to_string(),
            default_limit: DEFAULT_LIMIT,
            limit_max_value: Some(DEFAULT_LIMIT_MAX_VALUE),
            offset_param: DEFAULT_OFFSET_PARAM.to_string(),
            search_operator: DEFAULT_SEARCH_OPERATOR.to_string(),
            explicit_select: false,
            only_select_non_detailed_fields: false,
        }
    }
}

impl Config {
    /// Default configuration for the given schema.
    #[must_use]
    pub fn new(model: ModelSchema) -> Self {
        Self::default().with_model(model)
    }

    /// Default configuration for a [`QueryModel`].
    #[must_use]
    pub fn for_model<M: QueryModel>() -> Self {
        Self::new(M::query_schema())
    }

    #[must_use]
    pub fn with_model(mut self, model: ModelSchema) -> Self {
        self.model = Some(model);
        self
    }

    #[must_use]
    pub fn tag_name(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = tag_name.into();
        self
    }

    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    #[must_use]
    pub const fn ignore_sort(mut self, ignore_sort: bool) -> Self {
        self.ignore_sort = ignore_sort;
        self
    }

    #[must_use]
    pub fn sort_param(mut self, param: impl Into<String>) -> Self {
        self.sort_param = param.into();
        self
    }

    #[must_use]
    pub fn default_sort(mut self, sort: impl Into<String>) -> Self {
        self.default_sort = sort.into();
        self
    }

    #[must_use]
    pub fn limit_param(mut self, param: impl Into<String>) -> Self {
        self.limit_param = param.into();
        self
    }

    #[must_use]
    pub const fn default_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit;
        self
    }

    #[must_use]
    pub const fn limit_max_value(mut self, max: Option<u64>) -> Self {
        self.limit_max_value = max;
        self
    }

    #[must_use]
    pub fn offset_param(mut self, param: impl Into<String>) -> Self {
        self.offset_param = param.into();
        self
    }

    #[must_use]
    pub fn search_operator(mut self, operator: impl Into<String>) -> Self {
        self.search_operator = operator.into();
        self
    }

    #[must_use]
    pub const fn explicit_select(mut self, explicit_select: bool) -> Self {
        self.explicit_select = explicit_select;
        self
    }

    #[must_use]
    pub const fn only_select_non_detailed_fields(mut self, only: bool) -> Self {
        self.only_select_non_detailed_fields = only;
        self
    }

    /// Fills empty options with their defaults and validates the rest.
    pub(crate) fn normalize(&mut self) -> Result<(), ConfigError> {
        default_string(&mut self.tag_name, DEFAULT_TAG_NAME);
        default_string(&mut self.separator, DEFAULT_SEPARATOR);
        default_string(&mut self.sort_param, DEFAULT_SORT_PARAM);
        default_string(&mut self.limit_param, DEFAULT_LIMIT_PARAM);
        default_string(&mut self.offset_param, DEFAULT_OFFSET_PARAM);
        default_string(&mut self.search_operator, DEFAULT_SEARCH_OPERATOR);

        let operator = self.search_operator.trim().to_uppercase();
        if operator != "AND" && operator != "OR" {
            return Err(ConfigError::InvalidSearchOperator(self.search_operator.clone()));
        }
        self.search_operator = operator;

        if self.only_select_non_detailed_fields {
            self.explicit_select = true;
        }
        Ok(())
    }
}

fn default_string(s: &mut String, default: &str) {
    if s.is_empty() {
        *s = default.to_string();
    }
}
