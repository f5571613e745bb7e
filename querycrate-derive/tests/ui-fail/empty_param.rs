//! Test that an empty parameter name is rejected

use querycrate::QueryModel;

#[derive(QueryModel)]
#[allow(dead_code)]
pub struct Pet {
    #[query(filter, param = "")]
    pub tags: String,
}

fn main() {}
