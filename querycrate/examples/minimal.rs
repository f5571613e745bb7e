//! Minimal query API example with Axum
//!
//! ```bash
//! cargo run --example minimal
//! ```
//!
//! Then visit:
//! - <http://localhost:3000/pets?name_like=rex&age_gte=3&sort=-created_at>
//! - <http://localhost:3000/pets?search=collar&limit=5>

use axum::{Json, Router, extract::State, routing::get};
use chrono::{DateTime, Utc};
use querycrate::{Config, ParseError, QueryBuilder, QueryModel, QueryParams, Value};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::SqliteQueryBuilder;
use sea_orm::QueryTrait;
use serde::Serialize;
use std::sync::Arc;

fn search(term: &str) -> (String, Vec<Value>) {
    (
        "(name LIKE ? OR description LIKE ?)".to_string(),
        vec![Value::String(format!("%{term}%")), Value::String(format!("%{term}%"))],
    )
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, QueryModel)]
#[sea_orm(table_name = "pets")]
#[query(search = search)]
pub struct Model {
    #[sea_orm(primary_key)]
    #[query(sort)]
    pub id: i32,
    #[query(sort, filter)]
    pub name: String,
    #[query(filter, sort)]
    pub age: i32,
    #[query(filter, split)]
    pub species: String,
    #[query(detailed)]
    pub description: String,
    #[query(sort, filter)]
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}
impl ActiveModelBehavior for ActiveModel {}

#[derive(Serialize)]
struct Translation {
    query: querycrate::DbQuery,
    sql: String,
}

async fn list_pets(
    State(builder): State<Arc<QueryBuilder>>,
    params: QueryParams,
) -> Result<Json<Translation>, ParseError> {
    let query = builder.parse(&params)?;
    let sql = query
        .apply(Entity::find())
        .into_query()
        .to_string(SqliteQueryBuilder);
    tracing::info!(%sql, "translated request");
    Ok(Json(Translation { query, sql }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minimal=info,querycrate=debug".into()),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::default()
        .default_sort("created_at desc")
        .default_limit(20)
        .only_select_non_detailed_fields(true);
    let builder = QueryBuilder::for_model::<Model>(config)?;

    let app = Router::new()
        .route("/pets", get(list_pets))
        .with_state(Arc::new(builder));
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("listening on http://0.0.0.0:3000/pets");
    axum::serve(listener, app).await?;
    Ok(())
}
