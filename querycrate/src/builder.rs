//! # Query builder
//!
//! [`QueryBuilder`] compiles a model once into static lookup tables and then
//! translates any number of requests against them. Build it at startup and
//! share it, e.g. as `Arc<QueryBuilder>` in your router state; [`parse`] takes
//! `&self` and is safe to call from many tasks at once.
//!
//! ```rust
//! use querycrate::{Config, FieldSpec, ModelSchema, QueryBuilder, QueryParams, Value, ValueKind};
//!
//! let model = ModelSchema::new("Pet")
//!     .field(FieldSpec::new("Name", ValueKind::String).tag("query", "sort,filter"))
//!     .field(FieldSpec::new("Age", ValueKind::Int).tag("query", "filter"))
//!     .field(FieldSpec::new("CreatedAt", ValueKind::Timestamp).tag("query", "sort,filter"));
//!
//! let builder = QueryBuilder::new(
//!     Config::new(model).default_sort("created_at desc").default_limit(10),
//! )?;
//!
//! let query = builder.parse(&QueryParams::parse("sort=name&age_lt=20&age_gte=13&sort=-created_at&offset=7"))?;
//! assert_eq!(query.sort, "name, created_at desc");
//! assert_eq!(query.filter, "age >= ? AND age < ?");
//! assert_eq!(query.values, [Value::Int(13), Value::Int(20)]);
//! assert_eq!((query.limit, query.offset), (10, 7));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`parse`]: QueryBuilder::parse

use heck::ToSnakeCase;
use std::collections::HashSet;

use crate::config::{Config, SEARCH_PARAM};
use crate::errors::{ConfigError, ParseError};
use crate::filtering::conditions::{FieldRegistration, FilterTable, parse_filter};
use crate::filtering::pagination::parse_number;
use crate::filtering::search::parse_search;
use crate::filtering::sort::parse_sort;
use crate::models::{DbQuery, QueryParams};
use crate::schema::{FieldKind, FieldOptions, FieldSpec, QueryModel, SearchFn, ValueKind, WrapFn};
use crate::value;

/// Compiled query tables of one model.
#[derive(Clone)]
pub struct QueryBuilder {
    config: Config,
    model_name: String,
    searcher: Option<SearchFn>,
    sort_fields: HashSet<String>,
    filter_fields: FilterTable,
    select_fields: Vec<String>,
}

impl QueryBuilder {
    /// Compiles the model attached to `config`.
    ///
    /// # Errors
    ///
    /// Fails when the config has no model, the search operator is not `AND`
    /// or `OR`, or a filterable field has a kind with no filter handling.
    pub fn new(mut config: Config) -> Result<Self, ConfigError> {
        config.normalize()?;
        let (model_name, fields, searcher) = config
            .model
            .take()
            .ok_or(ConfigError::MissingModel)?
            .into_parts();

        let mut builder = Self {
            config,
            model_name,
            searcher,
            sort_fields: HashSet::new(),
            filter_fields: FilterTable::default(),
            select_fields: Vec::new(),
        };
        builder.register_fields(&fields)?;

        tracing::debug!(
            model = %builder.model_name,
            sort_fields = builder.sort_fields.len(),
            filter_keys = builder.filter_fields.len(),
            select_fields = builder.select_fields.len(),
            searchable = builder.searcher.is_some(),
            "compiled query schema"
        );
        Ok(builder)
    }

    /// Compiles `M` with the given configuration. A model already attached to
    /// `config` is replaced.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn for_model<M: QueryModel>(config: Config) -> Result<Self, ConfigError> {
        Self::new(config.with_model(M::query_schema()))
    }

    /// Embedded groups are flattened depth-first, in declaration order.
    fn register_fields(&mut self, fields: &[FieldSpec]) -> Result<(), ConfigError> {
        for field in fields {
            match field.kind() {
                FieldKind::Embedded(inner) => self.register_fields(inner)?,
                FieldKind::Value { kind, wrap } => self.register_field(field, kind, wrap.as_ref())?,
            }
        }
        Ok(())
    }

    fn register_field(&mut self, field: &FieldSpec, kind: &ValueKind, wrap: Option<&WrapFn>) -> Result<(), ConfigError> {
        let column = field.name().to_snake_case();
        if field.is_storage_ignored() {
            tracing::trace!(field = field.name(), "skipping field without a storage column");
            return Ok(());
        }

        let options = FieldOptions::parse(field.get_tag(&self.config.tag_name).unwrap_or_default());

        if self.config.explicit_select && !(self.config.only_select_non_detailed_fields && options.detailed) {
            self.select_fields.push(column.clone());
        }
        if options.sort {
            self.sort_fields.insert(column.clone());
        }
        if !options.filter {
            return Ok(());
        }

        let registration = FieldRegistration {
            key: options.param.as_deref().unwrap_or(&column),
            column: &column,
            separator: &self.config.separator,
            split_on_comma: options.split,
            wrap: wrap.cloned(),
        };
        match kind {
            ValueKind::String => self.filter_fields.add_string_field(&registration),
            ValueKind::Int => self.filter_fields.add_ordered_field(&registration, value::parse_int),
            ValueKind::Int64 => self.filter_fields.add_ordered_field(&registration, value::parse_int64),
            ValueKind::Timestamp => self
                .filter_fields
                .add_ordered_field(&registration, value::parse_timestamp),
            ValueKind::Bool => self.filter_fields.add_bool_field(&registration),
            ValueKind::Opaque(type_name) => {
                return Err(ConfigError::UnsupportedFieldType {
                    field: field.name().to_string(),
                    type_name: type_name.clone(),
                });
            }
        }
        tracing::trace!(field = field.name(), column = %column, key = registration.key, "registered filter keys");
        Ok(())
    }

    /// Validates and translates the request parameters.
    ///
    /// Parameters are checked in a fixed order (limit, offset, sort, filters,
    /// search) and the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] naming the first rejected parameter.
    pub fn parse(&self, params: &QueryParams) -> Result<DbQuery, ParseError> {
        let config = &self.config;
        let mut query = DbQuery {
            limit: config.default_limit,
            offset: 0,
            sort: config.default_sort.clone(),
            select: self.select_fields.join(","),
            filter: String::new(),
            values: Vec::new(),
        };

        if let Some(v) = params.get(&config.limit_param)
            && !v.is_empty()
        {
            query.limit = parse_number(&config.limit_param, v, 0, config.limit_max_value)?;
        }
        if let Some(v) = params.get(&config.offset_param)
            && !v.is_empty()
        {
            query.offset = parse_number(&config.offset_param, v, 0, None)?;
        }
        if !config.ignore_sort
            && let Some(tokens) = params.get_all(&config.sort_param)
            && !tokens.is_empty()
        {
            query.sort = parse_sort(tokens, &self.sort_fields)?;
        }

        let (filter, values) = parse_filter(params, &self.filter_fields)?;
        query.filter = filter;
        query.values = values;

        if let Some(search) = &self.searcher
            && let Some(terms) = params.get_all(SEARCH_PARAM)
            && !terms.is_empty()
        {
            let (exp, values) = parse_search(terms, search, &config.search_operator);
            query.and(&exp, values);
        }

        tracing::trace!(
            model = %self.model_name,
            filter = %query.filter,
            values = query.values.len(),
            sort = %query.sort,
            "translated query parameters"
        );
        Ok(query)
    }

    /// Translates the query string of an HTTP request.
    ///
    /// # Errors
    ///
    /// See [`parse`](Self::parse).
    #[cfg(feature = "axum")]
    pub fn parse_request<B>(&self, request: &axum::http::Request<B>) -> Result<DbQuery, ParseError> {
        self.parse(&QueryParams::parse(request.uri().query().unwrap_or_default()))
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    #[must_use]
    pub fn is_sortable(&self, column: &str) -> bool {
        self.sort_fields.contains(column)
    }

    /// All accepted filter keys, sorted.
    pub fn filter_keys(&self) -> impl Iterator<Item = &str> {
        self.filter_fields.keys()
    }

    /// Columns of the explicit select list, in declaration order.
    #[must_use]
    pub fn select_fields(&self) -> &[String] {
        &self.select_fields
    }

    #[must_use]
    pub fn is_searchable(&self) -> bool {
        self.searcher.is_some()
    }
}
