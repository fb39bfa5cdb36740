use async_trait::async_trait;

use super::errors::QueryResult;
use super::plan::{SelectPlan, UpdatePlan};
use super::projection::{AgeAggregate, Projection, TeamAgeStats};

/// Storage port used by the query composer
///
/// Implementations run plans against a storage snapshot and map rows into
/// the requested shape. Storage errors are returned unchanged.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run a select plan and project every row into `P`
    async fn fetch<P: Projection>(&self, plan: &SelectPlan) -> QueryResult<Vec<P>>;

    /// Count rows matching the plan, ignoring ordering and paging
    async fn count(&self, plan: &SelectPlan) -> QueryResult<u64>;

    /// Aggregate `age` over rows matching the plan
    async fn aggregate(&self, plan: &SelectPlan) -> QueryResult<AgeAggregate>;

    /// Aggregate `age` per team name over rows matching the plan
    async fn aggregate_by_team(&self, plan: &SelectPlan) -> QueryResult<Vec<TeamAgeStats>>;

    /// Apply an update plan and return the number of affected rows
    async fn execute_update(&self, plan: &UpdatePlan) -> QueryResult<u64>;
}
