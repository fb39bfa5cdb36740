use async_trait::async_trait;
use sqlx::PgPool;

use super::sql;
use crate::query::{
    AgeAggregate, Projection, QueryError, QueryExecutor, QueryResult, SelectPlan, TeamAgeStats,
    UpdatePlan,
};

/// SQLSTATE for `numeric_value_out_of_range`
const NUMERIC_OUT_OF_RANGE: &str = "22003";

/// PostgreSQL implementation of QueryExecutor
///
/// Renders plans with [`sql`] and runs them on the pool. Each call checks
/// out its own connection, so concurrent callers never share session state.
#[derive(Clone)]
pub struct PostgresQueryExecutor {
    pool: PgPool,
}

impl PostgresQueryExecutor {
    /// Creates a new PostgresQueryExecutor
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryExecutor for PostgresQueryExecutor {
    async fn fetch<P: Projection>(&self, plan: &SelectPlan) -> QueryResult<Vec<P>> {
        let mut qb = sql::select_statement::<P>(plan);
        tracing::debug!(sql = qb.sql(), "Executing select");

        let rows = qb.build_query_as::<P>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn count(&self, plan: &SelectPlan) -> QueryResult<u64> {
        let mut qb = sql::count_statement(plan);
        tracing::debug!(sql = qb.sql(), "Executing count");

        let count: i64 = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn aggregate(&self, plan: &SelectPlan) -> QueryResult<AgeAggregate> {
        let mut qb = sql::aggregate_statement(plan);
        tracing::debug!(sql = qb.sql(), "Executing aggregate");

        let aggregate = qb
            .build_query_as::<AgeAggregate>()
            .fetch_one(&self.pool)
            .await?;
        Ok(aggregate)
    }

    async fn aggregate_by_team(&self, plan: &SelectPlan) -> QueryResult<Vec<TeamAgeStats>> {
        let mut qb = sql::team_aggregate_statement(plan);
        tracing::debug!(sql = qb.sql(), "Executing team aggregate");

        let stats = qb
            .build_query_as::<TeamAgeStats>()
            .fetch_all(&self.pool)
            .await?;
        Ok(stats)
    }

    async fn execute_update(&self, plan: &UpdatePlan) -> QueryResult<u64> {
        if plan.assignments.is_empty() {
            return Ok(0);
        }

        let mut qb = sql::update_statement(plan);
        tracing::debug!(sql = qb.sql(), "Executing bulk update");

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(update_error)?;
        Ok(result.rows_affected())
    }
}

/// Constraint and range violations mean the update itself is invalid
fn update_error(err: sqlx::Error) -> QueryError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_check_violation() || db.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE) {
            return QueryError::InvalidUpdate(db.message().to_string());
        }
    }
    QueryError::Storage(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_stay_storage_errors() {
        let err = update_error(sqlx::Error::RowNotFound);

        assert!(matches!(err, QueryError::Storage(sqlx::Error::RowNotFound)));
    }
}
