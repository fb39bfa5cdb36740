use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryResult;
use crate::domain::team::Team;

/// Repository trait for Team entities
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Save a team (insert or update)
    async fn save(&self, team: &Team) -> RepositoryResult<()>;

    /// Find a team by its ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Team>>;

    /// Find all teams with the given name
    async fn find_by_name(&self, name: &str) -> RepositoryResult<Vec<Team>>;

    /// Find all teams ordered by name
    async fn find_all(&self) -> RepositoryResult<Vec<Team>>;
}
