use std::marker::PhantomData;

use diesel::pg::Pg;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types::{BigInt, Bool, Double, Nullable, Text, Timestamptz};
use diesel::{OptionalExtension, QueryableByName};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use keyset_core::types::{KeysetQuery, Value};
use keyset_core::{KeysetStore, Record, ScanPlan};

use super::SqlStatement;
use crate::{PgError, PgResult, TRACING_TARGET_QUERY};

type BoxedQuery = BoxedSqlQuery<'static, Pg, SqlQuery>;

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// [`KeysetStore`] over a PostgreSQL connection.
///
/// `R` is the row type every page is made of. It is loaded by column name, so
/// it must derive [`QueryableByName`] and expose the same columns to
/// [`Record`].
pub struct PgStore<'c, R> {
    conn: &'c mut AsyncPgConnection,
    row: PhantomData<fn() -> R>,
}

impl<'c, R> PgStore<'c, R> {
    /// Creates a store borrowing the given connection.
    pub fn new(conn: &'c mut AsyncPgConnection) -> Self {
        Self {
            conn,
            row: PhantomData,
        }
    }
}

impl SqlStatement {
    /// Converts the statement into an executable diesel query.
    pub fn into_query(self) -> BoxedQuery {
        tracing::trace!(target: TRACING_TARGET_QUERY, sql = %self.sql, binds = self.binds.len());

        self.binds
            .into_iter()
            .fold(diesel::sql_query(self.sql).into_boxed(), bind_value)
    }
}

fn bind_value(query: BoxedQuery, value: Value) -> BoxedQuery {
    match value {
        Value::Null => query.bind::<Nullable<Text>, _>(None::<String>),
        Value::Bool(value) => query.bind::<Bool, _>(value),
        Value::Int(value) => query.bind::<BigInt, _>(value),
        Value::Float(value) => query.bind::<Double, _>(value),
        Value::Uuid(value) => query.bind::<diesel::sql_types::Uuid, _>(value),
        Value::Timestamp(value) => {
            query.bind::<Timestamptz, _>(jiff_diesel::Timestamp::from(value))
        }
        Value::Text(value) => query.bind::<Text, _>(value),
    }
}

impl<R> KeysetStore for PgStore<'_, R>
where
    R: QueryableByName<Pg> + Record + Send + 'static,
{
    type Error = PgError;
    type Row = R;

    #[tracing::instrument(skip_all, target = TRACING_TARGET_QUERY, fields(source = plan.query.source()))]
    async fn count(&mut self, plan: &ScanPlan<'_>) -> PgResult<u64> {
        let row: CountRow = SqlStatement::count(plan)
            .into_query()
            .get_result(&mut *self.conn)
            .await
            .map_err(PgError::from)?;

        Ok(u64::try_from(row.count).unwrap_or_default())
    }

    #[tracing::instrument(skip_all, target = TRACING_TARGET_QUERY, fields(source = plan.query.source()))]
    async fn fetch(&mut self, plan: &ScanPlan<'_>) -> PgResult<Vec<R>> {
        let rows = SqlStatement::fetch(plan)
            .into_query()
            .load::<R>(&mut *self.conn)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(target: TRACING_TARGET_QUERY, rows = rows.len(), "Fetched rows");
        Ok(rows)
    }

    #[tracing::instrument(skip_all, target = TRACING_TARGET_QUERY, fields(source = query.source()))]
    async fn lookup(&mut self, query: &KeysetQuery, key: &Value) -> PgResult<Option<R>> {
        let row = SqlStatement::lookup(query, key)
            .into_query()
            .get_result::<R>(&mut *self.conn)
            .await
            .optional()
            .map_err(PgError::from)?;

        if row.is_none() {
            tracing::debug!(target: TRACING_TARGET_QUERY, %key, "Cursor record not found");
        }

        Ok(row)
    }
}
