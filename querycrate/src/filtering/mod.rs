//! # Request translation phases
//!
//! Each phase turns one group of query-string parameters into part of a
//! [`DbQuery`](crate::DbQuery):
//!
//! - `pagination`: `limit` and `offset`, bounds-checked
//! - `sort`: `sort=+col`, `sort=-col`, checked against sortable columns
//! - `conditions`: filter keys such as `age_gt=10` or `name_like=dog`
//! - `search`: free-text `search=` terms handed to the model's search hook
//!
//! ## Query Parameter Examples
//!
//! ```text
//! GET /pets?name=rex                       name = ?
//! GET /pets?name_eq=rex&name_eq=max        (name = ? OR name = ?)
//! GET /pets?name_like=re                   name LIKE ?          ['%re%']
//! GET /pets?age_gte=3&age_lt=10            age >= ? AND age < ?
//! GET /pets?born_at_gt=2024-01-01T00:00:00Z
//! GET /pets?tag_name=a,b                   with `split`: (tags = ? OR tags = ?)
//! GET /pets?sort=-age&sort=name            age desc, name
//! GET /pets?limit=10&offset=20
//! GET /pets?search=collar
//! ```

pub(crate) mod conditions;
pub(crate) mod pagination;
pub(crate) mod search;
pub(crate) mod sort;

pub use conditions::FilterOperator;
pub use sort::SortDirection;
