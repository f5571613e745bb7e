//! Test that a basic model compiles and compiles into a working builder

use querycrate::{Config, QueryBuilder, QueryModel, QueryParams};

#[derive(QueryModel)]
pub struct Pet {
    #[query(sort, filter)]
    pub name: String,

    #[query(filter)]
    pub age: i32,

    #[query(sort, filter)]
    pub created_at: chrono::DateTime<chrono::Utc>,

    pub weight: f64,
}

fn main() {
    let builder = QueryBuilder::for_model::<Pet>(Config::default()).unwrap();
    let query = builder
        .parse(&QueryParams::parse("age_gt=3&sort=-created_at"))
        .unwrap();
    assert_eq!(query.filter, "age > ?");
    assert_eq!(query.sort, "created_at desc");
}
