//! Test that a misspelled query option is rejected with a span on the option

use querycrate::QueryModel;

#[derive(QueryModel)]
#[allow(dead_code)]
pub struct Pet {
    #[query(sortable)]
    pub name: String,
}

fn main() {}
