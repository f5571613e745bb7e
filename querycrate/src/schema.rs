//! # Model schema description
//!
//! A [`ModelSchema`] is the explicit, build-once description of a model that
//! [`QueryBuilder`](crate::QueryBuilder) compiles into its lookup tables. It can
//! be written by hand or generated with `#[derive(QueryModel)]`.
//!
//! Capabilities are attached to fields as raw tags, keyed by tag name, in the
//! same comma-separated form the derive macro produces:
//!
//! ```rust
//! use querycrate::{FieldSpec, ModelSchema, ValueKind};
//!
//! let schema = ModelSchema::new("Pet")
//!     .field(FieldSpec::new("Name", ValueKind::String).tag("query", "sort,filter"))
//!     .field(FieldSpec::new("Age", ValueKind::Int).tag("query", "filter"))
//!     .field(FieldSpec::new("OwnerId", ValueKind::Int64).tag("storage", "foreignkey:OwnerID"));
//! # let _ = schema;
//! ```
//!
//! Recognised options of the capability tag (default name `query`):
//!
//! - `sort` – the column may appear in `sort=`
//! - `filter` – filter keys are registered for the column
//! - `split` – a single value containing commas is split into several values
//! - `detailed` – excluded from the select list under the non-detailed policy
//! - `param=<name>` – filter keys are built from `<name>` instead of the column
//!
//! The `storage` tag is `;`-separated. A field whose storage tag contains `-`,
//! or an option starting with `foreignkey`, `association_foreignkey` or
//! `many2many`, is not a real column and is skipped entirely.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Tag holding storage-mapping options.
pub const STORAGE_TAG: &str = "storage";

const STORAGE_IGNORE_OPTIONS: [&str; 4] = ["-", "foreignkey", "association_foreignkey", "many2many"];

/// Rewrites the composed expression of one filter key, e.g. to redirect a
/// filter on a collection into a correlated sub-query.
pub type WrapFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Turns one free-text search term into an expression and its bound values.
pub type SearchFn = Arc<dyn Fn(&str) -> (String, Vec<Value>) + Send + Sync>;

/// The kind of value a field holds, which decides the operators registered
/// for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// Strings and anything rendered as one (enums, string lists, ...).
    String,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Int64,
    Bool,
    /// Date-time, filtered with RFC 3339 values.
    Timestamp,
    /// A type with no filter handling. Marking it `filter` is a configuration
    /// error.
    Opaque(String),
}

/// Describes how a Rust type takes part in filtering.
///
/// Implemented for the supported primitives. Implement it for custom types
/// (enums stored as text, tag lists, ...) to make them filterable, and
/// override [`wrapper`](Self::wrapper) to delegate the expression.
///
/// ```rust
/// use querycrate::{QueryValue, ValueKind, WrapFn};
/// use std::sync::Arc;
///
/// struct Tags(Vec<String>);
///
/// impl QueryValue for Tags {
///     fn value_kind() -> ValueKind {
///         ValueKind::String
///     }
///
///     fn wrapper() -> Option<WrapFn> {
///         Some(Arc::new(|exp| {
///             format!("(id IN (SELECT pet_id FROM tags WHERE {exp}))")
///         }))
///     }
/// }
/// ```
///
/// The derive only accepts `filter` on types implementing this trait:
///
/// ```rust,compile_fail
/// use querycrate::QueryModel;
///
/// #[derive(QueryModel)]
/// struct Reading {
///     #[query(filter)]
///     weight: f64,
/// }
/// ```
///
/// Sorting and selecting such a field is fine:
///
/// ```rust
/// use querycrate::QueryModel;
///
/// #[derive(QueryModel)]
/// struct Reading {
///     #[query(sort)]
///     weight: f64,
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used with `#[query(filter)]`",
    label = "not a filterable type",
    note = "implement `querycrate::QueryValue` for the type, or drop `filter`"
)]
pub trait QueryValue {
    fn value_kind() -> ValueKind;

    fn wrapper() -> Option<WrapFn> {
        None
    }
}

impl QueryValue for String {
    fn value_kind() -> ValueKind {
        ValueKind::String
    }
}

impl QueryValue for Vec<String> {
    fn value_kind() -> ValueKind {
        ValueKind::String
    }
}

impl QueryValue for i32 {
    fn value_kind() -> ValueKind {
        ValueKind::Int
    }
}

impl QueryValue for i64 {
    fn value_kind() -> ValueKind {
        ValueKind::Int64
    }
}

impl QueryValue for bool {
    fn value_kind() -> ValueKind {
        ValueKind::Bool
    }
}

impl<Tz: chrono::TimeZone> QueryValue for chrono::DateTime<Tz> {
    fn value_kind() -> ValueKind {
        ValueKind::Timestamp
    }
}

impl QueryValue for chrono::NaiveDateTime {
    fn value_kind() -> ValueKind {
        ValueKind::Timestamp
    }
}

/// Nullable columns filter like their inner type.
impl<T: QueryValue> QueryValue for Option<T> {
    fn value_kind() -> ValueKind {
        T::value_kind()
    }

    fn wrapper() -> Option<WrapFn> {
        T::wrapper()
    }
}

impl<T: QueryValue> QueryValue for Box<T> {
    fn value_kind() -> ValueKind {
        T::value_kind()
    }

    fn wrapper() -> Option<WrapFn> {
        T::wrapper()
    }
}

/// A model that can describe itself. Usually derived.
pub trait QueryModel {
    fn query_schema() -> ModelSchema;
}

#[derive(Clone)]
pub enum FieldKind {
    Value { kind: ValueKind, wrap: Option<WrapFn> },
    /// Fields of an embedded model, flattened into the parent.
    Embedded(Vec<FieldSpec>),
}

/// One field of a [`ModelSchema`].
#[derive(Clone)]
pub struct FieldSpec {
    name: String,
    tags: BTreeMap<String, String>,
    kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            tags: BTreeMap::new(),
            kind: FieldKind::Value { kind, wrap: None },
        }
    }

    /// A field whose kind and wrap transform come from its Rust type.
    pub fn of<T: QueryValue>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: BTreeMap::new(),
            kind: FieldKind::Value {
                kind: T::value_kind(),
                wrap: T::wrapper(),
            },
        }
    }

    pub fn embedded(name: impl Into<String>, fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        Self {
            name: name.into(),
            tags: BTreeMap::new(),
            kind: FieldKind::Embedded(fields.into_iter().collect()),
        }
    }

    /// Sets the raw value of tag `key`, replacing any previous value.
    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Attaches a wrap transform, overriding the one taken from the type.
    #[must_use]
    pub fn with_wrap(mut self, wrap: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        if let FieldKind::Value { wrap: slot, .. } = &mut self.kind {
            *slot = Some(Arc::new(wrap));
        }
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    #[must_use]
    pub fn get_tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// True when the storage tag marks this field as not being a real column.
    #[must_use]
    pub fn is_storage_ignored(&self) -> bool {
        self.get_tag(STORAGE_TAG).is_some_and(|tag| {
            tag.split(';').map(str::trim).any(|option| {
                STORAGE_IGNORE_OPTIONS
                    .iter()
                    .any(|ignored| option.starts_with(ignored))
            })
        })
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("FieldSpec");
        out.field("name", &self.name).field("tags", &self.tags);
        match &self.kind {
            FieldKind::Value { kind, wrap } => out
                .field("kind", kind)
                .field("wrap", &wrap.as_ref().map(|_| "<fn>")),
            FieldKind::Embedded(fields) => out.field("embedded", fields),
        };
        out.finish()
    }
}

/// Capability options parsed from one field's capability tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FieldOptions {
    pub(crate) sort: bool,
    pub(crate) filter: bool,
    pub(crate) split: bool,
    pub(crate) detailed: bool,
    pub(crate) param: Option<String>,
}

impl FieldOptions {
    pub(crate) fn parse(tag: &str) -> Self {
        let mut options = Self::default();
        for option in tag.split(',').map(str::trim) {
            match option {
                "sort" => options.sort = true,
                "filter" => options.filter = true,
                "split" => options.split = true,
                "detailed" => options.detailed = true,
                _ => {
                    if let Some(param) = option.strip_prefix("param=")
                        && !param.is_empty()
                    {
                        options.param = Some(param.to_string());
                    }
                }
            }
        }
        options
    }
}

/// Explicit description of a model: its fields in declaration order and an
/// optional free-text search hook.
#[derive(Clone, Default)]
pub struct ModelSchema {
    name: String,
    fields: Vec<FieldSpec>,
    search: Option<SearchFn>,
}

impl ModelSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            search: None,
        }
    }

    /// Schema of a model implementing [`QueryModel`].
    #[must_use]
    pub fn of<M: QueryModel>() -> Self {
        M::query_schema()
    }

    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    #[must_use]
    pub fn with_search(
        mut self,
        search: impl Fn(&str) -> (String, Vec<Value>) + Send + Sync + 'static,
    ) -> Self {
        self.search = Some(Arc::new(search));
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn field_specs(&self) -> &[FieldSpec] {
        &self.fields
    }

    #[must_use]
    pub fn into_fields(self) -> Vec<FieldSpec> {
        self.fields
    }

    #[must_use]
    pub fn is_searchable(&self) -> bool {
        self.search.is_some()
    }

    pub(crate) fn into_parts(self) -> (String, Vec<FieldSpec>, Option<SearchFn>) {
        (self.name, self.fields, self.search)
    }
}

impl fmt::Debug for ModelSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSchema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("search", &self.search.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
