use super::condition::MemberSearchCondition;
use super::errors::{QueryError, QueryResult};
use super::executor::QueryExecutor;
use super::order::OrderSpec;
use super::page::{Page, Pageable};
use super::plan::{Assignment, JoinKind, SelectPlan, UpdatePlan};
use super::predicate::Predicate;
use super::projection::{AgeAggregate, MemberTeamDto, Projection, TeamAgeStats};

/// Builds member queries from optional search conditions
///
/// Stateless: every call composes a fresh plan and runs it through the
/// executor. Members are always left-joined to their team unless a method
/// says otherwise, so members without a team still show up.
///
/// # Example
/// ```
/// use member_query::infrastructure::memory::InMemoryStore;
/// use member_query::query::{MemberQueryComposer, MemberSearchCondition};
///
/// # #[tokio::main]
/// # async fn main() {
/// let composer = MemberQueryComposer::new(InMemoryStore::new());
/// let page = composer
///     .search(&MemberSearchCondition::new(), None)
///     .await
///     .expect("search");
///
/// assert_eq!(page.total, 0);
/// # }
/// ```
pub struct MemberQueryComposer<E> {
    executor: E,
}

impl<E: QueryExecutor> MemberQueryComposer<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Search members and return one page with the total match count
    ///
    /// # Arguments
    /// * `condition` - Optional filters; unset fields place no constraint
    /// * `pageable` - Offset, limit and ordering; `None` returns everything
    ///
    /// The total ignores offset and limit. It comes from a separate count
    /// query unless the fetched page already proves it.
    pub async fn search(
        &self,
        condition: &MemberSearchCondition,
        pageable: Option<&Pageable>,
    ) -> QueryResult<Page<MemberTeamDto>> {
        let unpaged = Pageable::unpaged();
        let pageable = pageable.unwrap_or(&unpaged);

        let plan = Self::plan_for(condition)
            .order(pageable.order.iter().copied())
            .offset(pageable.offset)
            .limit(pageable.limit);

        tracing::debug!(?plan, "Searching members");

        let content = self.executor.fetch::<MemberTeamDto>(&plan).await?;
        let total = match pageable.total_from_page(content.len()) {
            Some(total) => total,
            None => self.executor.count(&plan.for_count()).await?,
        };

        Ok(Page::new(content, total, pageable))
    }

    /// Every matching member, unordered and unpaged
    pub async fn search_all(
        &self,
        condition: &MemberSearchCondition,
    ) -> QueryResult<Vec<MemberTeamDto>> {
        self.select(condition, &[]).await
    }

    /// Number of members matching the condition
    pub async fn count(&self, condition: &MemberSearchCondition) -> QueryResult<u64> {
        self.executor.count(&Self::plan_for(condition)).await
    }

    /// Fetch matching members in any projection shape
    pub async fn select<P: Projection>(
        &self,
        condition: &MemberSearchCondition,
        order: &[OrderSpec],
    ) -> QueryResult<Vec<P>> {
        let plan = Self::plan_for(condition).order(order.iter().copied());
        self.executor.fetch::<P>(&plan).await
    }

    /// Matching members with only the named team joined
    ///
    /// Every member matching `condition` is returned. Team columns are
    /// filled only when the member belongs to `team_name`; other members
    /// come back with NULL team columns instead of being dropped.
    pub async fn select_joining_team(
        &self,
        team_name: &str,
        condition: &MemberSearchCondition,
        order: &[OrderSpec],
    ) -> QueryResult<Vec<MemberTeamDto>> {
        let plan = Self::plan_for(condition)
            .join_on([Predicate::TeamNameEq(team_name.to_string())])
            .order(order.iter().copied());

        tracing::debug!(?plan, "Selecting members with join condition");
        self.executor.fetch::<MemberTeamDto>(&plan).await
    }

    /// Zero or one match
    ///
    /// # Errors
    /// * `QueryError::NonUniqueResult` - More than one member matched
    pub async fn fetch_one(
        &self,
        condition: &MemberSearchCondition,
    ) -> QueryResult<Option<MemberTeamDto>> {
        let mut rows = self
            .executor
            .fetch::<MemberTeamDto>(&Self::plan_for(condition))
            .await?;

        if rows.len() > 1 {
            return Err(QueryError::NonUniqueResult { found: rows.len() });
        }
        Ok(rows.pop())
    }

    /// Exactly one match
    ///
    /// # Errors
    /// * `QueryError::NotFound` - Nothing matched
    /// * `QueryError::NonUniqueResult` - More than one member matched
    pub async fn fetch_single(
        &self,
        condition: &MemberSearchCondition,
    ) -> QueryResult<MemberTeamDto> {
        self.fetch_one(condition).await?.ok_or(QueryError::NotFound)
    }

    /// First match under the given ordering, if any
    pub async fn fetch_first(
        &self,
        condition: &MemberSearchCondition,
        order: &[OrderSpec],
    ) -> QueryResult<Option<MemberTeamDto>> {
        let plan = Self::plan_for(condition)
            .order(order.iter().copied())
            .limit(Some(1));

        Ok(self
            .executor
            .fetch::<MemberTeamDto>(&plan)
            .await?
            .into_iter()
            .next())
    }

    /// Count, sum, average, min and max of age over matching members
    pub async fn aggregate(&self, condition: &MemberSearchCondition) -> QueryResult<AgeAggregate> {
        let plan = Self::plan_for(condition);
        tracing::debug!(?plan, "Aggregating member ages");
        self.executor.aggregate(&plan).await
    }

    /// Age statistics per team, ordered by team name
    ///
    /// Members without a team are left out.
    pub async fn aggregate_by_team(
        &self,
        condition: &MemberSearchCondition,
    ) -> QueryResult<Vec<TeamAgeStats>> {
        let plan = Self::plan_for(condition).join(JoinKind::Inner);
        self.executor.aggregate_by_team(&plan).await
    }

    /// Members whose age equals the maximum age
    pub async fn oldest_members(&self) -> QueryResult<Vec<MemberTeamDto>> {
        let plan = SelectPlan::new(vec![Predicate::AgeIsMaximum]);
        self.executor.fetch::<MemberTeamDto>(&plan).await
    }

    /// Set the username of every member younger than `age_lt`
    ///
    /// Runs directly against storage and returns the affected row count.
    /// Rows fetched earlier are not refreshed; query again to see the change.
    pub async fn bulk_set_username(&self, username: &str, age_lt: i32) -> QueryResult<u64> {
        let plan = UpdatePlan::new(Assignment::SetUsername(Some(username.to_string())))
            .filter([Predicate::AgeLt(age_lt)]);

        let affected = self.executor.execute_update(&plan).await?;
        tracing::info!(affected, age_lt, "Bulk username update applied");
        Ok(affected)
    }

    /// Add `delta` to the age of every matching member
    pub async fn bulk_add_age(
        &self,
        delta: i32,
        condition: &MemberSearchCondition,
    ) -> QueryResult<u64> {
        let plan = UpdatePlan::new(Assignment::AddAge(delta)).filter(condition.predicates());

        let affected = self.executor.execute_update(&plan).await?;
        tracing::info!(affected, delta, "Bulk age update applied");
        Ok(affected)
    }

    fn plan_for(condition: &MemberSearchCondition) -> SelectPlan {
        SelectPlan::new(condition.predicates())
    }
}
