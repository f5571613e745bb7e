//! sea-orm integration.
//!
//! [`DbQuery::apply`](crate::DbQuery::apply) adds the translated options to
//! any sea-orm select. Filter values are bound as parameters, never inlined
//! into the expression.

mod apply;
