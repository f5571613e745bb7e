//! # querycrate
//!
//! Translates URL query parameters into database query options: filter
//! expressions with positional `?` placeholders and their bound values, sort
//! clauses, select lists and limit/offset pagination.
//!
//! A model is described once, either by hand with [`ModelSchema`] or with
//! `#[derive(QueryModel)]`, and compiled into a [`QueryBuilder`]. The builder
//! then validates and translates requests into a [`DbQuery`].
//!
//! ```rust,ignore
//! use querycrate::{Config, QueryBuilder, QueryModel, QueryParams};
//!
//! #[derive(QueryModel)]
//! struct Pet {
//!     #[query(sort, filter)]
//!     name: String,
//!     #[query(filter)]
//!     age: i32,
//!     #[query(sort, filter)]
//!     created_at: chrono::DateTime<chrono::Utc>,
//! }
//!
//! let builder = QueryBuilder::for_model::<Pet>(Config::default().default_sort("created_at desc"))?;
//! let query = builder.parse(&QueryParams::parse("age_gte=3&name_like=rex&sort=-name"))?;
//! // query.filter == "age >= ? AND name LIKE ?"
//! // query.values == [3, "%rex%"]
//! // query.sort   == "name desc"
//! ```
//!
//! ## Features
//!
//! - `derive`: `#[derive(QueryModel)]`
//! - `axum`: [`QueryParams`] extractor, `ParseError` responses and
//!   [`QueryBuilder::parse_request`]
//! - `sea-orm`: [`DbQuery::apply`] onto a sea-orm `Select`

extern crate self as querycrate;

pub mod builder;
pub mod config;
#[cfg(feature = "sea-orm")]
pub mod database;
pub mod errors;
#[cfg(feature = "axum")]
mod extract;
pub mod filtering;
pub mod models;
pub mod schema;
pub mod value;

pub use builder::QueryBuilder;
pub use config::Config;
pub use errors::{ConfigError, ParseError};
pub use filtering::{FilterOperator, SortDirection};
pub use models::{DbQuery, QueryParams};
pub use schema::{FieldKind, FieldSpec, ModelSchema, QueryModel, QueryValue, STORAGE_TAG, SearchFn, ValueKind, WrapFn};
pub use value::Value;

#[cfg(feature = "derive")]
pub use querycrate_derive::QueryModel;
