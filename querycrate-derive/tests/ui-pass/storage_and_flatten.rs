//! Test that storage options, embedded models, raw tags and search hooks compile

use querycrate::{Config, QueryBuilder, QueryModel, QueryParams, QueryValue, Value, ValueKind, WrapFn};
use std::sync::Arc;

pub struct Tags(pub Vec<String>);

impl QueryValue for Tags {
    fn value_kind() -> ValueKind {
        ValueKind::String
    }

    fn wrapper() -> Option<WrapFn> {
        Some(Arc::new(|exp| format!("(id IN (SELECT pet_id FROM tags WHERE {exp}))")))
    }
}

#[derive(QueryModel)]
pub struct Audit {
    #[query(sort, filter)]
    pub created_at: chrono::NaiveDateTime,
    #[query(sort)]
    pub updated_at: chrono::NaiveDateTime,
}

fn search(term: &str) -> (String, Vec<Value>) {
    ("name LIKE ?".to_string(), vec![Value::String(format!("%{term}%"))])
}

#[derive(QueryModel)]
#[query(search = search)]
pub struct Pet {
    #[query(filter, split, param = "tag_name")]
    pub tags: Tags,

    #[tags(ormquery = "sort")]
    pub name: String,

    #[query(flatten)]
    pub audit: Audit,

    #[storage(foreignkey = "OwnerID")]
    #[query(sort, filter)]
    pub owner: Option<String>,

    #[storage(ignore)]
    pub score: i64,
}

fn main() {
    let builder = QueryBuilder::for_model::<Pet>(Config::default()).unwrap();
    assert!(builder.is_searchable());
    assert!(builder.is_sortable("created_at"));
    assert!(!builder.is_sortable("owner"));

    let query = builder.parse(&QueryParams::parse("tag_name=a,b")).unwrap();
    assert_eq!(query.filter, "(id IN (SELECT pet_id FROM tags WHERE (tags = ? OR tags = ?)))");

    let custom = QueryBuilder::for_model::<Pet>(Config::default().tag_name("ormquery")).unwrap();
    assert!(custom.is_sortable("name"));
}
