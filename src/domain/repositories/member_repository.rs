use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryResult;
use crate::domain::member::{Member, MemberWithTeam};

/// Repository trait for Member entities
///
/// Plain load/store access. Filtered searches, projections and bulk
/// updates go through [`crate::query::MemberQueryComposer`].
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Save a member (insert or update)
    async fn save(&self, member: &Member) -> RepositoryResult<()>;

    /// Find a member by ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Member>>;

    /// Find every member
    async fn find_all(&self) -> RepositoryResult<Vec<Member>>;

    /// Find members with an exact username
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Vec<Member>>;

    /// Find all members of a team
    async fn find_by_team(&self, team_id: Uuid) -> RepositoryResult<Vec<Member>>;

    /// Load a member and its team in a single fetch-join
    async fn find_with_team(&self, id: Uuid) -> RepositoryResult<Option<MemberWithTeam>>;

    /// Delete a member by ID
    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;
}
