//! Test that generic models compile

use querycrate::{Config, QueryBuilder, QueryModel, QueryValue};

#[derive(QueryModel)]
pub struct Tagged<T>
where
    T: QueryValue,
{
    #[query(sort, filter)]
    pub value: T,

    #[query(filter)]
    pub active: bool,
}

fn main() {
    let builder = QueryBuilder::for_model::<Tagged<i64>>(Config::default()).unwrap();
    assert!(builder.filter_keys().any(|key| key == "value_gte"));
    assert!(builder.filter_keys().any(|key| key == "active_neq"));
}
