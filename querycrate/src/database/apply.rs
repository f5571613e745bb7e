use sea_orm::sea_query::{Alias, Expr, Order, SimpleExpr};
use sea_orm::{QueryFilter, QueryOrder, QuerySelect};

use crate::models::DbQuery;
use crate::value::Value;

impl From<Value> for sea_orm::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => s.into(),
            Value::Int(n) => n.into(),
            Value::Bool(b) => b.into(),
            Value::Timestamp(ts) => ts.into(),
        }
    }
}

/// Splits one sort clause into its column and direction.
fn sort_clause(clause: &str) -> (&str, Order) {
    let clause = clause.trim();
    let lower = clause.to_ascii_lowercase();
    if lower.ends_with(" desc") {
        (clause[..clause.len() - " desc".len()].trim_end(), Order::Desc)
    } else if lower.ends_with(" asc") {
        (clause[..clause.len() - " asc".len()].trim_end(), Order::Asc)
    } else {
        (clause, Order::Asc)
    }
}

impl DbQuery {
    /// Adds the filter, sort, select list and pagination to a sea-orm query.
    ///
    /// ```rust,ignore
    /// let pets = builder
    ///     .parse(&params)?
    ///     .apply(pet::Entity::find())
    ///     .all(&db)
    ///     .await?;
    /// ```
    ///
    /// `limit` and `offset` are only applied when non-zero. `limit=0` is a
    /// valid request value, so a client sending it gets no `LIMIT` clause at
    /// all, regardless of `limit_max_value`. Hosts that need a hard cap must
    /// reject a zero limit before calling `apply`.
    ///
    /// A non-empty select list replaces the default columns.
    #[must_use]
    pub fn apply<Q>(&self, mut query: Q) -> Q
    where
        Q: QueryFilter + QuerySelect + QueryOrder,
    {
        if !self.filter.is_empty() {
            let values: Vec<sea_orm::Value> = self.values.iter().cloned().map(Into::into).collect();
            query = query.filter(Expr::cust_with_values(self.filter.as_str(), values));
        }

        if !self.select.is_empty() {
            query = query.select_only();
            for column in self.select.split(',').filter(|c| !c.is_empty()) {
                query = query.expr(SimpleExpr::from(Expr::col(Alias::new(column))));
            }
        }

        for clause in self.sort.split(',').filter(|c| !c.trim().is_empty()) {
            let (column, order) = sort_clause(clause);
            query = query.order_by(Expr::cust(column), order);
        }

        if self.limit > 0 {
            query = query.limit(self.limit);
        }
        if self.offset > 0 {
            query = query.offset(self.offset);
        }
        tracing::trace!(filter = %self.filter, values = self.values.len(), "applied query options");
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::SqliteQueryBuilder;
    use sea_orm::{EntityTrait, QueryTrait};

    mod pet {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = "pets")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i32,
            pub name: String,
            pub age: i32,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    fn render(query: &DbQuery) -> String {
        query
            .apply(pet::Entity::find())
            .into_query()
            .to_string(SqliteQueryBuilder)
    }

    #[test]
    fn test_sort_clause() {
        assert!(matches!(sort_clause("name"), ("name", Order::Asc)));
        assert!(matches!(sort_clause(" created_at desc"), ("created_at", Order::Desc)));
        assert!(matches!(sort_clause("age ASC"), ("age", Order::Asc)));
    }

    #[test]
    fn test_apply_filter_binds_values() {
        let query = DbQuery {
            filter: "age >= ? AND (name = ? OR name = ?)".into(),
            values: vec![Value::Int(3), Value::from("rex"), Value::from("max")],
            ..DbQuery::default()
        };
        let sql = render(&query);
        assert!(
            sql.contains("WHERE age >= 3 AND (name = 'rex' OR name = 'max')"),
            "{sql}"
        );
        assert!(!sql.contains("LIMIT"), "{sql}");
    }

    #[test]
    fn test_apply_sort_select_and_pagination() {
        let query = DbQuery {
            limit: 10,
            offset: 20,
            sort: "name, age desc".into(),
            select: "name,age".into(),
            ..DbQuery::default()
        };
        let sql = render(&query);
        assert!(sql.starts_with(r#"SELECT "name", "age" FROM "pets""#), "{sql}");
        assert!(sql.contains("ORDER BY name ASC, age DESC"), "{sql}");
        assert!(sql.contains("LIMIT 10 OFFSET 20"), "{sql}");
    }

    #[test]
    fn test_empty_query_keeps_select_untouched() {
        let sql = render(&DbQuery::default());
        assert_eq!(
            sql,
            pet::Entity::find().into_query().to_string(SqliteQueryBuilder)
        );
    }

    #[test]
    fn test_zero_limit_is_not_capped() {
        use crate::{Config, FieldSpec, ModelSchema, QueryBuilder, QueryParams, ValueKind};

        let model = ModelSchema::new("Pet")
            .field(FieldSpec::new("Name", ValueKind::String).tag("query", "filter"));
        let builder = QueryBuilder::new(Config::new(model).limit_max_value(Some(5))).unwrap();

        let query = builder.parse(&QueryParams::parse("limit=0")).unwrap();
        assert_eq!(query.limit, 0);
        let sql = render(&query);
        assert!(!sql.contains("LIMIT"), "{sql}");

        let query = builder.parse(&QueryParams::parse("limit=5")).unwrap();
        assert!(render(&query).contains("LIMIT 5"));
    }

    #[test]
    fn test_value_conversion() {
        assert_eq!(sea_orm::Value::from(Value::Int(7)), sea_orm::Value::BigInt(Some(7)));
        assert_eq!(sea_orm::Value::from(Value::Bool(true)), sea_orm::Value::Bool(Some(true)));
        assert_eq!(
            sea_orm::Value::from(Value::from("a8m")),
            sea_orm::Value::String(Some(Box::new("a8m".to_string())))
        );
    }
}
