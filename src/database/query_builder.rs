use std::time::{Duration, Instant};

use sqlx::{self, postgres::PgArguments, FromRow, PgPool, Row};
use tracing::{debug, warn};

use super::error::StorageResult;
use crate::filter::types::{Param, SqlResult};
use crate::filter::Filter;

/// Runs a compiled [`Filter`] against Postgres.
///
/// `select` and `from` let callers join extra columns while the filter keeps
/// control of WHERE, ORDER BY and LIMIT/OFFSET.
pub struct QueryBuilder<'f, T> {
    select: &'static str,
    from: &'static str,
    filter: &'f Filter,
    slow_threshold: Duration,
    _phantom: std::marker::PhantomData<T>,
}

impl<'f, T> QueryBuilder<'f, T>
where
    T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    pub fn new(select: &'static str, from: &'static str, filter: &'f Filter) -> Self {
        Self {
            select,
            from,
            filter,
            slow_threshold: Duration::from_millis(u64::MAX),
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }

    pub async fn select_all(self, pool: &PgPool) -> StorageResult<Vec<T>> {
        let sql_result = self.filter.to_sql(self.select, self.from)?;
        debug!(query = %sql_result.query, params = sql_result.params.len(), "select");

        let started = Instant::now();
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(pool).await?;
        self.report_slow(&sql_result, started.elapsed());
        Ok(rows)
    }

    pub async fn count(self, pool: &PgPool) -> StorageResult<i64> {
        let sql_result = self.filter.to_count_sql()?;
        debug!(query = %sql_result.query, params = sql_result.params.len(), "count");

        let started = Instant::now();
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(pool).await?;
        self.report_slow(&sql_result, started.elapsed());
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    fn report_slow(&self, sql_result: &SqlResult, elapsed: Duration) {
        if elapsed >= self.slow_threshold {
            warn!(
                query = %sql_result.query,
                elapsed_ms = elapsed.as_millis() as u64,
                "slow query"
            );
        }
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Param,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Param::Int(i) => q.bind(*i),
        Param::Text(s) => q.bind(s.as_str()),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Param,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        Param::Int(i) => q.bind(*i),
        Param::Text(s) => q.bind(s.as_str()),
    }
}
