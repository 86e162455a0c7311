//! SQL rendering for scan plans.

use keyset_core::types::{Filter, KeysetQuery, SortOrder, Value};
use keyset_core::{ScanPlan, Seek};

/// A parameterized statement: SQL text with `$n` placeholders and their values.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    /// SQL text.
    pub sql: String,
    /// Values bound to `$1..$n`, in order.
    pub binds: Vec<Value>,
}

impl SqlStatement {
    /// Renders the row fetch of a scan.
    pub fn fetch(plan: &ScanPlan<'_>) -> Self {
        let mut builder = SqlBuilder::default();
        builder.push("SELECT * FROM ");
        builder.push(&quote_path(plan.query.source()));
        builder.push_where(plan.query, plan.seek.as_ref());

        if !plan.order.is_empty() {
            let order = plan
                .order
                .iter()
                .map(|key| format!("{} {}", quote_ident(&key.column), key.order.as_sql()))
                .collect::<Vec<_>>()
                .join(", ");
            builder.push(" ORDER BY ");
            builder.push(&order);
        }

        if let Some(limit) = plan.limit {
            builder.push(&format!(" LIMIT {limit}"));
        }

        builder.finish()
    }

    /// Renders the count of a scan.
    pub fn count(plan: &ScanPlan<'_>) -> Self {
        let mut builder = SqlBuilder::default();
        builder.push("SELECT COUNT(*) AS count FROM ");
        builder.push(&quote_path(plan.query.source()));
        builder.push_where(plan.query, plan.seek.as_ref());
        builder.finish()
    }

    /// Renders the single-row lookup of a cursor record.
    pub fn lookup(query: &KeysetQuery, key: &Value) -> Self {
        let mut builder = SqlBuilder::default();
        builder.push("SELECT * FROM ");
        builder.push(&quote_path(query.source()));
        builder.push(" WHERE ");
        builder.push(&quote_ident(query.primary_key()));
        builder.push(" = ");
        builder.push_bind(key.clone());
        builder.push(" LIMIT 1");
        builder.finish()
    }
}

#[derive(Debug, Default)]
struct SqlBuilder {
    sql: String,
    binds: Vec<Value>,
}

impl SqlBuilder {
    fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    fn push_bind(&mut self, value: Value) {
        self.binds.push(value);
        self.sql.push('$');
        self.sql.push_str(&self.binds.len().to_string());
    }

    fn push_where(&mut self, query: &KeysetQuery, seek: Option<&Seek>) {
        let mut first = true;
        let mut and = |builder: &mut Self| {
            builder.push(if first { " WHERE " } else { " AND " });
            first = false;
        };

        for filter in query.filters() {
            and(self);
            self.push_filter(filter);
        }

        if let Some(seek) = seek.filter(|seek| !seek.keys.is_empty()) {
            and(self);
            self.push_seek(seek);
        }
    }

    fn push_filter(&mut self, filter: &Filter) {
        // Any comparison with NULL is unknown, hence never true.
        if filter.value.is_null() {
            self.push("FALSE");
            return;
        }

        self.push(&quote_ident(&filter.column));
        self.push(" ");
        self.push(filter.comparison.as_sql());
        self.push(" ");
        self.push_bind(filter.value.clone());
    }

    /// `(a > $1) OR (a = $2 AND b > $3) OR ...`, with `<` for descending keys.
    fn push_seek(&mut self, seek: &Seek) {
        let pairs: Vec<_> = seek.pairs().collect();

        self.push("(");
        for (i, (key, value)) in pairs.iter().enumerate() {
            if i > 0 {
                self.push(" OR ");
            }

            self.push("(");
            for (prefix_key, prefix_value) in &pairs[..i] {
                self.push(&quote_ident(&prefix_key.column));
                self.push(" = ");
                self.push_bind((*prefix_value).clone());
                self.push(" AND ");
            }

            let op = match key.order {
                SortOrder::Asc => " > ",
                SortOrder::Desc => " < ",
            };
            self.push(&quote_ident(&key.column));
            self.push(op);
            self.push_bind((*value).clone());
            self.push(")");
        }
        self.push(")");
    }

    fn finish(self) -> SqlStatement {
        SqlStatement {
            sql: self.sql,
            binds: self.binds,
        }
    }
}

/// Quotes an identifier, doubling embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quotes a possibly schema-qualified name such as `public.events`.
pub fn quote_path(path: &str) -> String {
    path.split('.').map(quote_ident).collect::<Vec<_>>().join(".")
}

#[cfg(test)]
mod tests {
    use keyset_core::types::{Filter, OrderSpec, SortKey};

    use super::*;

    fn query() -> KeysetQuery {
        KeysetQuery::new("public.events", "id", OrderSpec::desc("created"))
    }

    #[test]
    fn first_page_fetch() {
        let query = query().filter(Filter::eq("owner_id", 7));
        let plan = ScanPlan {
            query: &query,
            order: query.sort_keys(),
            seek: None,
            limit: Some(3),
        };

        let statement = SqlStatement::fetch(&plan);
        assert_eq!(
            statement.sql,
            r#"SELECT * FROM "public"."events" WHERE "owner_id" = $1 ORDER BY "created" DESC, "id" DESC LIMIT 3"#
        );
        assert_eq!(statement.binds, vec![Value::Int(7)]);
    }

    #[test]
    fn seek_fetch() {
        let query = query();
        let keys = vec![SortKey::asc("created"), SortKey::asc("id")];
        let plan = ScanPlan {
            query: &query,
            order: keys.clone(),
            seek: Some(Seek::new(keys, vec![Value::Int(9), Value::Int(2)])),
            limit: None,
        };

        let statement = SqlStatement::fetch(&plan);
        assert_eq!(
            statement.sql,
            r#"SELECT * FROM "public"."events" WHERE (("created" > $1) OR ("created" = $2 AND "id" > $3)) ORDER BY "created" ASC, "id" ASC"#
        );
        assert_eq!(
            statement.binds,
            vec![Value::Int(9), Value::Int(9), Value::Int(2)]
        );
    }

    #[test]
    fn count_with_filters_and_seek() {
        let query = query().filter(Filter::ne("status", "draft"));
        let keys = vec![SortKey::desc("id")];
        let plan = ScanPlan {
            query: &query,
            order: keys.clone(),
            seek: Some(Seek::new(keys, vec![Value::Int(5)])),
            limit: Some(16),
        };

        let statement = SqlStatement::count(&plan);
        assert_eq!(
            statement.sql,
            r#"SELECT COUNT(*) AS count FROM "public"."events" WHERE "status" <> $1 AND (("id" < $2))"#
        );
    }

    #[test]
    fn null_filter_matches_nothing() {
        let query = query().filter(Filter::eq("owner_id", Value::Null));
        let plan = ScanPlan {
            query: &query,
            order: Vec::new(),
            seek: None,
            limit: None,
        };

        let statement = SqlStatement::count(&plan);
        assert!(statement.sql.ends_with(" WHERE FALSE"));
        assert!(statement.binds.is_empty());
    }

    #[test]
    fn lookup_by_primary_key() {
        let statement = SqlStatement::lookup(&query(), &Value::Int(42));
        assert_eq!(
            statement.sql,
            r#"SELECT * FROM "public"."events" WHERE "id" = $1 LIMIT 1"#
        );
        assert_eq!(statement.binds, vec![Value::Int(42)]);
    }

    #[test]
    fn quoting() {
        assert_eq!(quote_ident(r#"we"ird"#), r#""we""ird""#);
        assert_eq!(quote_path("events"), r#""events""#);
    }
}
