use serde::{Deserialize, Serialize};

use super::predicate::{Predicate, PredicateBuilder};

/// Optional search filters for members
///
/// Every field is optional; an unset field (or a blank string) places no
/// constraint on that dimension.
///
/// # Example
/// ```
/// use member_query::query::MemberSearchCondition;
///
/// let condition = MemberSearchCondition::new()
///     .team_name("teamB")
///     .age_goe(35)
///     .age_loe(40);
///
/// assert_eq!(condition.predicates().len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberSearchCondition {
    pub username: Option<String>,
    pub team_name: Option<String>,
    pub age_goe: Option<i32>,
    pub age_loe: Option<i32>,
}

impl MemberSearchCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }

    pub fn age_goe(mut self, age: i32) -> Self {
        self.age_goe = Some(age);
        self
    }

    pub fn age_loe(mut self, age: i32) -> Self {
        self.age_loe = Some(age);
        self
    }

    /// Translate the set fields into predicates
    ///
    /// The output order is fixed (username, team name, age lower bound,
    /// age upper bound) so equal conditions always yield equal predicate
    /// lists, however the fields were populated.
    pub fn predicates(&self) -> Vec<Predicate> {
        PredicateBuilder::new()
            .and_some(has_text(&self.username), Predicate::UsernameEq)
            .and_some(has_text(&self.team_name), Predicate::TeamNameEq)
            .and_some(self.age_goe, Predicate::AgeGoe)
            .and_some(self.age_loe, Predicate::AgeLoe)
            .build()
    }

    /// True when no field constrains the search
    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }
}

fn has_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}
