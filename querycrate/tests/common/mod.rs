#![allow(dead_code)]

use axum::{Json, Router, extract::State, routing::get};
use chrono::{DateTime, Utc};
use querycrate::{Config, DbQuery, ParseError, QueryBuilder, QueryModel, QueryParams, QueryValue, Value, ValueKind, WrapFn};
use std::sync::Arc;

/// Pet status, stored as text.
pub enum Kind {
    Dog,
    Cat,
}

impl QueryValue for Kind {
    fn value_kind() -> ValueKind {
        ValueKind::String
    }
}

/// Tag names live in a join table; filters are redirected into a sub-query.
pub struct Tags(pub Vec<String>);

impl QueryValue for Tags {
    fn value_kind() -> ValueKind {
        ValueKind::String
    }

    fn wrapper() -> Option<WrapFn> {
        Some(Arc::new(|exp| {
            format!("(id IN (SELECT pet_id FROM pet_tags WHERE {exp}))")
        }))
    }
}

pub fn search(term: &str) -> (String, Vec<Value>) {
    (
        "(name = ? OR status LIKE ?)".to_string(),
        vec![Value::from(term), Value::String(format!("%{term}%"))],
    )
}

#[derive(QueryModel)]
#[query(search = search)]
pub struct Pet {
    #[query(sort, filter)]
    pub name: String,
    #[query(filter)]
    pub status: String,
    #[query(filter)]
    pub age: i64,
    #[query(filter, detailed)]
    pub year: i32,
    #[storage(ignore)]
    pub dummy: i32,
    #[query(sort, filter)]
    pub created_at: DateTime<Utc>,
    #[query(sort, filter)]
    pub updated_at: DateTime<Utc>,
    #[query(filter, param = "tag_name")]
    pub tags: Tags,
    #[query(filter, sort)]
    pub flag_ptr: Option<bool>,
    #[query(filter, sort)]
    pub flag: bool,
    #[query(filter, sort)]
    pub enum_val_ptr: Option<Kind>,
    #[query(filter, sort)]
    pub enum_val: Kind,
    #[storage(foreignkey = "ExternalEndpointID")]
    pub field_to_ignore1: bool,
    #[storage(association_foreignkey = "UUID")]
    pub field_to_ignore2: bool,
    #[storage(many2many = "UUID")]
    pub field_to_ignore3: bool,
}

pub const DETAILED_FIELDS: &str =
    "name,status,age,year,created_at,updated_at,tags,flag_ptr,flag,enum_val_ptr,enum_val";
pub const NON_DETAILED_FIELDS: &str =
    "name,status,age,created_at,updated_at,tags,flag_ptr,flag,enum_val_ptr,enum_val";

pub fn pet_builder(config: Config) -> QueryBuilder {
    QueryBuilder::for_model::<Pet>(config).expect("pet model compiles")
}

async fn list_pets(
    State(builder): State<Arc<QueryBuilder>>,
    params: QueryParams,
) -> Result<Json<DbQuery>, ParseError> {
    Ok(Json(builder.parse(&params)?))
}

pub fn setup_test_app(config: Config) -> Router {
    Router::new()
        .route("/api/v1/pets", get(list_pets))
        .with_state(Arc::new(pet_builder(config)))
}
