use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::member::{Member, MemberWithTeam};
use crate::domain::repositories::{MemberRepository, TeamRepository};
use crate::domain::team::Team;
use crate::query::{
    AgeAggregate, Assignment, JoinKind, JoinedRow, OrderSpec, Predicate, Projection, QueryError,
    QueryExecutor, QueryResult, SelectPlan, SortDirection, SortField, TeamAgeStats, UpdatePlan,
};

#[derive(Debug, Default)]
struct State {
    teams: Vec<Team>,
    members: Vec<Member>,
}

impl State {
    fn team(&self, id: Uuid) -> Option<&Team> {
        self.teams.iter().find(|t| t.id() == id)
    }

    fn max_age(&self) -> Option<i32> {
        self.members.iter().map(Member::age).max()
    }

    /// Join, then filter; rows keep member insertion order
    ///
    /// A team that fails `join_on` is treated as absent for that member.
    fn select(
        &self,
        join: JoinKind,
        join_on: &[Predicate],
        predicates: &[Predicate],
    ) -> Vec<JoinedRow> {
        let max_age = self.max_age();

        self.members
            .iter()
            .filter_map(|member| {
                let team = member.team_id().and_then(|id| self.team(id)).filter(|team| {
                    let joined = JoinedRow::new(member, Some(*team));
                    join_on.iter().all(|p| row_matches(&joined, p, max_age))
                });
                match (join, team) {
                    (JoinKind::Inner, None) => None,
                    _ => Some(JoinedRow::new(member, team)),
                }
            })
            .filter(|row| predicates.iter().all(|p| row_matches(row, p, max_age)))
            .collect()
    }

    fn matching(&self, plan: &SelectPlan) -> Vec<JoinedRow> {
        self.select(plan.join, &plan.join_on, &plan.predicates)
    }

    fn rows(&self, plan: &SelectPlan) -> Vec<JoinedRow> {
        let mut rows = self.matching(plan);
        if !plan.order.is_empty() {
            rows.sort_by(|a, b| compare_rows(a, b, &plan.order));
        }

        let offset = usize::try_from(plan.offset).unwrap_or(usize::MAX);
        let limit = plan
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

        rows.into_iter().skip(offset).take(limit).collect()
    }
}

/// In-process store with the same query semantics as the PostgreSQL adapter
///
/// Implements both repository ports and [`QueryExecutor`] over shared
/// state, so a composer and repositories built from clones of one store
/// see the same data. NULLs sort like PostgreSQL; text compares bytewise.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored members
    pub async fn member_count(&self) -> usize {
        self.state.read().await.members.len()
    }
}

fn row_matches(row: &JoinedRow, predicate: &Predicate, max_age: Option<i32>) -> bool {
    match predicate {
        Predicate::UsernameEq(username) => row.username.as_deref() == Some(username.as_str()),
        Predicate::TeamNameEq(name) => row.team_name.as_deref() == Some(name.as_str()),
        Predicate::AgeEq(age) => row.age == *age,
        Predicate::AgeGoe(age) => row.age >= *age,
        Predicate::AgeLoe(age) => row.age <= *age,
        Predicate::AgeLt(age) => row.age < *age,
        Predicate::AgeIsMaximum => Some(row.age) == max_age,
    }
}

fn compare_rows(a: &JoinedRow, b: &JoinedRow, order: &[OrderSpec]) -> Ordering {
    order
        .iter()
        .map(|spec| match spec.field {
            SortField::MemberId => compare_nullable(Some(a.member_id), Some(b.member_id), spec),
            SortField::Username => {
                compare_nullable(a.username.as_deref(), b.username.as_deref(), spec)
            }
            SortField::Age => compare_nullable(Some(a.age), Some(b.age), spec),
            SortField::TeamName => {
                compare_nullable(a.team_name.as_deref(), b.team_name.as_deref(), spec)
            }
        })
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

fn compare_nullable<T: Ord>(a: Option<T>, b: Option<T>, spec: &OrderSpec) -> Ordering {
    let null_before = if spec.nulls_come_first() {
        Ordering::Less
    } else {
        Ordering::Greater
    };

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => null_before,
        (Some(_), None) => null_before.reverse(),
        (Some(a), Some(b)) => match spec.direction {
            SortDirection::Asc => a.cmp(&b),
            SortDirection::Desc => b.cmp(&a),
        },
    }
}

#[async_trait]
impl QueryExecutor for InMemoryStore {
    async fn fetch<P: Projection>(&self, plan: &SelectPlan) -> QueryResult<Vec<P>> {
        let state = self.state.read().await;
        Ok(state.rows(plan).iter().map(P::from_joined).collect())
    }

    async fn count(&self, plan: &SelectPlan) -> QueryResult<u64> {
        let state = self.state.read().await;
        Ok(state.matching(plan).len() as u64)
    }

    async fn aggregate(&self, plan: &SelectPlan) -> QueryResult<AgeAggregate> {
        let state = self.state.read().await;
        let rows = state.matching(plan);
        Ok(AgeAggregate::from_ages(rows.iter().map(|row| row.age)))
    }

    async fn aggregate_by_team(&self, plan: &SelectPlan) -> QueryResult<Vec<TeamAgeStats>> {
        let state = self.state.read().await;
        let rows = state.matching(plan);

        let mut names: Vec<&str> = rows.iter().filter_map(|r| r.team_name.as_deref()).collect();
        names.sort_unstable();
        names.dedup();

        let stats = names
            .into_iter()
            .map(|name| {
                let ages = rows
                    .iter()
                    .filter(|r| r.team_name.as_deref() == Some(name))
                    .map(|r| r.age);
                let aggregate = AgeAggregate::from_ages(ages);
                TeamAgeStats {
                    team_name: name.to_string(),
                    member_count: aggregate.count,
                    average_age: aggregate.avg.unwrap_or_default(),
                }
            })
            .collect();

        Ok(stats)
    }

    async fn execute_update(&self, plan: &UpdatePlan) -> QueryResult<u64> {
        if plan.assignments.is_empty() {
            return Ok(0);
        }

        let mut state = self.state.write().await;
        let targets: Vec<Uuid> = state
            .select(JoinKind::Left, &[], &plan.predicates)
            .into_iter()
            .map(|row| row.member_id)
            .collect();

        // Validate every change before touching any row
        let mut updated = Vec::with_capacity(targets.len());
        for member in state.members.iter().filter(|m| targets.contains(&m.id())) {
            let mut member = member.clone();
            for assignment in &plan.assignments {
                match assignment {
                    Assignment::SetUsername(username) => member.set_username(username.clone()),
                    Assignment::AddAge(delta) => {
                        let age = member.age().checked_add(*delta).ok_or_else(|| {
                            QueryError::InvalidUpdate(format!("Age overflow for {}", member.id()))
                        })?;
                        member.set_age(age).map_err(QueryError::InvalidUpdate)?;
                    }
                }
            }
            updated.push(member);
        }

        let affected = updated.len() as u64;
        for member in updated {
            if let Some(slot) = state.members.iter_mut().find(|m| m.id() == member.id()) {
                *slot = member;
            }
        }

        Ok(affected)
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn save(&self, team: &Team) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        match state.teams.iter_mut().find(|t| t.id() == team.id()) {
            Some(existing) => *existing = team.clone(),
            None => state.teams.push(team.clone()),
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Team>> {
        Ok(self.state.read().await.team(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> RepositoryResult<Vec<Team>> {
        let state = self.state.read().await;
        Ok(state
            .teams
            .iter()
            .filter(|t| t.name() == name)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Team>> {
        let mut teams = self.state.read().await.teams.clone();
        teams.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(teams)
    }
}

#[async_trait]
impl MemberRepository for InMemoryStore {
    async fn save(&self, member: &Member) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        if let Some(team_id) = member.team_id() {
            if state.team(team_id).is_none() {
                return Err(RepositoryError::Validation(format!(
                    "Unknown team: {}",
                    team_id
                )));
            }
        }

        match state.members.iter_mut().find(|m| m.id() == member.id()) {
            Some(existing) => *existing = member.clone(),
            None => state.members.push(member.clone()),
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Member>> {
        let state = self.state.read().await;
        Ok(state.members.iter().find(|m| m.id() == id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Member>> {
        Ok(self.state.read().await.members.clone())
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Vec<Member>> {
        let state = self.state.read().await;
        Ok(state
            .members
            .iter()
            .filter(|m| m.username() == Some(username))
            .cloned()
            .collect())
    }

    async fn find_by_team(&self, team_id: Uuid) -> RepositoryResult<Vec<Member>> {
        let state = self.state.read().await;
        let mut members: Vec<Member> = state
            .members
            .iter()
            .filter(|m| m.team_id() == Some(team_id))
            .cloned()
            .collect();

        let by_username = OrderSpec::asc(SortField::Username);
        members.sort_by(|a, b| compare_nullable(a.username(), b.username(), &by_username));
        Ok(members)
    }

    async fn find_with_team(&self, id: Uuid) -> RepositoryResult<Option<MemberWithTeam>> {
        let state = self.state.read().await;
        Ok(state
            .members
            .iter()
            .find(|m| m.id() == id)
            .map(|member| MemberWithTeam {
                member: member.clone(),
                team: member.team_id().and_then(|tid| state.team(tid)).cloned(),
            }))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        let before = state.members.len();
        state.members.retain(|m| m.id() != id);

        if state.members.len() == before {
            return Err(RepositoryError::NotFound(format!("Member not found: {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(username: Option<&str>, age: i32, team_name: Option<&str>) -> JoinedRow {
        JoinedRow {
            member_id: Uuid::new_v4(),
            username: username.map(str::to_string),
            age,
            team_id: team_name.map(|_| Uuid::new_v4()),
            team_name: team_name.map(str::to_string),
        }
    }

    #[test]
    fn nulls_last_when_ascending_by_default() {
        let spec = OrderSpec::asc(SortField::Username);

        assert_eq!(compare_nullable(None, Some("a"), &spec), Ordering::Greater);
        assert_eq!(compare_nullable(Some("a"), None, &spec), Ordering::Less);
    }

    #[test]
    fn nulls_first_when_descending_by_default() {
        let spec = OrderSpec::desc(SortField::Username);

        assert_eq!(compare_nullable(None, Some("a"), &spec), Ordering::Less);
        assert_eq!(compare_nullable(Some("b"), Some("a"), &spec), Ordering::Less);
    }

    #[test]
    fn secondary_key_breaks_ties() {
        let order = [
            OrderSpec::desc(SortField::Age),
            OrderSpec::asc(SortField::Username).nulls_last(),
        ];
        let a = row(Some("member5"), 100, None);
        let b = row(None, 100, None);
        let c = row(Some("member1"), 10, None);

        assert_eq!(compare_rows(&a, &b, &order), Ordering::Less);
        assert_eq!(compare_rows(&c, &b, &order), Ordering::Greater);
    }

    #[test]
    fn team_name_predicate_never_matches_missing_team() {
        let r = row(Some("member1"), 10, None);

        assert!(!row_matches(&r, &Predicate::TeamNameEq("teamA".to_string()), None));
        assert!(row_matches(&r, &Predicate::AgeLt(11), None));
    }

    #[test]
    fn maximum_predicate_compares_with_max_age() {
        let r = row(Some("member4"), 40, Some("teamB"));

        assert!(row_matches(&r, &Predicate::AgeIsMaximum, Some(40)));
        assert!(!row_matches(&r, &Predicate::AgeIsMaximum, Some(41)));
    }

    #[tokio::test]
    async fn saving_member_with_unknown_team_fails() {
        let store = InMemoryStore::new();
        let team = Team::new("ghost").unwrap();
        let member = Member::new(Some("member1".to_string()), 10, Some(&team)).unwrap();

        let result = MemberRepository::save(&store, &member).await;

        assert!(matches!(result, Err(RepositoryError::Validation(_))));
        assert_eq!(store.member_count().await, 0);
    }

    #[tokio::test]
    async fn join_condition_nulls_team_instead_of_dropping_member() {
        let store = InMemoryStore::new();
        let team_a = Team::new("teamA").unwrap();
        let team_b = Team::new("teamB").unwrap();
        TeamRepository::save(&store, &team_a).await.unwrap();
        TeamRepository::save(&store, &team_b).await.unwrap();
        let a = Member::new(Some("member1".to_string()), 10, Some(&team_a)).unwrap();
        let b = Member::new(Some("member3".to_string()), 30, Some(&team_b)).unwrap();
        MemberRepository::save(&store, &a).await.unwrap();
        MemberRepository::save(&store, &b).await.unwrap();

        let on_team_a = [Predicate::TeamNameEq("teamA".to_string())];
        let left = SelectPlan::default().join_on(on_team_a.clone());
        let rows = store.state.read().await.rows(&left);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].team_name.as_deref(), Some("teamA"));
        assert!(rows[1].team_id.is_none());
        assert!(rows[1].team_name.is_none());

        let inner = SelectPlan::default()
            .join(JoinKind::Inner)
            .join_on(on_team_a);
        assert_eq!(store.count(&inner).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn failed_update_leaves_rows_untouched() {
        let store = InMemoryStore::new();
        MemberRepository::save(&store, &Member::named("member1", 10).unwrap())
            .await
            .unwrap();
        MemberRepository::save(&store, &Member::named("member2", 1).unwrap())
            .await
            .unwrap();

        let result = store
            .execute_update(&UpdatePlan::new(Assignment::AddAge(-5)))
            .await;

        assert!(matches!(result, Err(QueryError::InvalidUpdate(_))));
        let ages: Vec<i32> = MemberRepository::find_all(&store)
            .await
            .unwrap()
            .iter()
            .map(Member::age)
            .collect();
        assert_eq!(ages, vec![10, 1]);
    }
}
