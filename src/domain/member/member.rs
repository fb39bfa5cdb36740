use uuid::Uuid;

use crate::domain::team::Team;

/// Member entity
///
/// A member may belong to at most one team. The username is nullable,
/// matching the `member.username` column.
///
/// # Invariants
/// - Age cannot be negative
///
/// # Example
/// ```
/// use member_query::domain::member::Member;
/// use member_query::domain::team::Team;
///
/// let team = Team::new("teamA").expect("valid team");
/// let member = Member::new(Some("member1".to_string()), 10, Some(&team)).expect("valid member");
///
/// assert_eq!(member.username(), Some("member1"));
/// assert_eq!(member.team_id(), Some(team.id()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    id: Uuid,
    username: Option<String>,
    age: i32,
    team_id: Option<Uuid>,
}

impl Member {
    /// Creates a new Member
    ///
    /// # Arguments
    /// * `username` - Optional username
    /// * `age` - Age in years (cannot be negative)
    /// * `team` - Team to join, if any
    pub fn new(username: Option<String>, age: i32, team: Option<&Team>) -> Result<Self, String> {
        validate_age(age)?;

        Ok(Self {
            id: Uuid::new_v4(),
            username,
            age,
            team_id: team.map(Team::id),
        })
    }

    /// Shorthand for a named member without a team
    pub fn named(username: impl Into<String>, age: i32) -> Result<Self, String> {
        Self::new(Some(username.into()), age, None)
    }

    pub fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub fn set_age(&mut self, age: i32) -> Result<(), String> {
        validate_age(age)?;
        self.age = age;
        Ok(())
    }

    /// Moves the member to another team
    pub fn change_team(&mut self, team: &Team) {
        self.team_id = Some(team.id());
    }

    pub fn leave_team(&mut self) {
        self.team_id = None;
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn team_id(&self) -> Option<Uuid> {
        self.team_id
    }

    /// Reconstructs a Member from persistence layer data
    ///
    /// Only to be used by repository implementations.
    pub fn from_persistence(
        id: Uuid,
        username: Option<String>,
        age: i32,
        team_id: Option<Uuid>,
    ) -> Self {
        Self {
            id,
            username,
            age,
            team_id,
        }
    }
}

fn validate_age(age: i32) -> Result<(), String> {
    if age < 0 {
        return Err(format!("Age cannot be negative: {}", age));
    }
    Ok(())
}

/// A member loaded together with its team in one fetch-join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberWithTeam {
    pub member: Member,
    pub team: Option<Team>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_member_with_team() {
        let team = Team::new("teamA").unwrap();
        let member = Member::new(Some("member1".to_string()), 10, Some(&team)).unwrap();

        assert_eq!(member.username(), Some("member1"));
        assert_eq!(member.age(), 10);
        assert_eq!(member.team_id(), Some(team.id()));
    }

    #[test]
    fn create_member_without_username() {
        let member = Member::new(None, 100, None).unwrap();

        assert!(member.username().is_none());
        assert!(member.team_id().is_none());
    }

    #[test]
    fn negative_age_fails() {
        let result = Member::named("member1", -1);

        assert!(result.is_err());
        assert!(result.unwrap_err().contains("cannot be negative"));
    }

    #[test]
    fn set_age_validates() {
        let mut member = Member::named("member1", 10).unwrap();

        assert!(member.set_age(-5).is_err());
        assert_eq!(member.age(), 10);

        member.set_age(11).unwrap();
        assert_eq!(member.age(), 11);
    }

    #[test]
    fn change_and_leave_team() {
        let team_a = Team::new("teamA").unwrap();
        let team_b = Team::new("teamB").unwrap();
        let mut member = Member::new(Some("member1".to_string()), 10, Some(&team_a)).unwrap();

        member.change_team(&team_b);
        assert_eq!(member.team_id(), Some(team_b.id()));

        member.leave_team();
        assert!(member.team_id().is_none());
    }
}
