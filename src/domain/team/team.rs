use uuid::Uuid;

/// Team entity
///
/// A named group of members. A team's lifetime is independent of the
/// members that reference it: members point at a team, the team does not
/// own or cascade to them.
///
/// # Invariants
/// - Name cannot be empty
///
/// # Example
/// ```
/// use member_query::domain::team::Team;
///
/// let team = Team::new("teamA").expect("valid team");
/// assert_eq!(team.name(), "teamA");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    id: Uuid,
    name: String,
}

impl Team {
    /// Creates a new Team with a freshly generated ID
    ///
    /// # Returns
    /// * `Ok(Team)` - New team
    /// * `Err(String)` - If the name is empty
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Team name cannot be empty".to_string());
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
        })
    }

    /// Renames the team
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Team name cannot be empty".to_string());
        }
        self.name = name;
        Ok(())
    }

    // ===== Getters =====

    /// Returns the team's ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the team's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reconstructs a Team from persistence layer data
    ///
    /// Skips validation since the row was validated when it was stored.
    /// Only to be used by repository implementations.
    pub fn from_persistence(id: Uuid, name: String) -> Self {
        Self { id, name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_team_with_valid_name() {
        let team = Team::new("teamA").unwrap();

        assert_eq!(team.name(), "teamA");
        assert!(!team.id().is_nil());
    }

    #[test]
    fn create_team_with_empty_name_fails() {
        let result = Team::new("   ");

        assert!(result.is_err());
        assert!(result.unwrap_err().contains("cannot be empty"));
    }

    #[test]
    fn teams_get_distinct_ids() {
        let a = Team::new("teamA").unwrap();
        let b = Team::new("teamA").unwrap();

        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn rename_rejects_empty_name() {
        let mut team = Team::new("teamA").unwrap();

        assert!(team.rename("").is_err());
        assert_eq!(team.name(), "teamA");

        team.rename("teamZ").unwrap();
        assert_eq!(team.name(), "teamZ");
    }

    #[test]
    fn from_persistence_keeps_id() {
        let id = Uuid::new_v4();
        let team = Team::from_persistence(id, "teamB".to_string());

        assert_eq!(team.id(), id);
        assert_eq!(team.name(), "teamB");
    }
}
