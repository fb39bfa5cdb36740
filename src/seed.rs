//! Demo data: two teams with two members each

use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::member::Member;
use crate::domain::repositories::{MemberRepository, TeamRepository};
use crate::domain::team::Team;

/// Insert teamA (member1 10, member2 20) and teamB (member3 30, member4 40)
///
/// Does nothing when any member already exists. Returns whether data was
/// inserted.
pub async fn seed_demo_data<T, M>(teams: &T, members: &M) -> RepositoryResult<bool>
where
    T: TeamRepository + ?Sized,
    M: MemberRepository + ?Sized,
{
    if !members.find_all().await?.is_empty() {
        tracing::info!("Members present, skipping demo seed");
        return Ok(false);
    }

    let team_a = Team::new("teamA").map_err(RepositoryError::Validation)?;
    let team_b = Team::new("teamB").map_err(RepositoryError::Validation)?;
    teams.save(&team_a).await?;
    teams.save(&team_b).await?;

    for (username, age, team) in [
        ("member1", 10, &team_a),
        ("member2", 20, &team_a),
        ("member3", 30, &team_b),
        ("member4", 40, &team_b),
    ] {
        let member = Member::new(Some(username.to_string()), age, Some(team))
            .map_err(RepositoryError::Validation)?;
        members.save(&member).await?;
    }

    tracing::info!("Seeded demo teams and members");
    Ok(true)
}
