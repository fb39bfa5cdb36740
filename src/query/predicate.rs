//! Predicates over the member/team join
//!
//! Predicates are a closed set of variants rather than free-form
//! expressions; storage adapters translate each variant themselves.

/// A single boolean condition on a joined member/team row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `member.username = value`
    UsernameEq(String),
    /// `team.name = value`
    TeamNameEq(String),
    /// `member.age = value`
    AgeEq(i32),
    /// `member.age >= value`
    AgeGoe(i32),
    /// `member.age <= value`
    AgeLoe(i32),
    /// `member.age < value`
    AgeLt(i32),
    /// `member.age = (SELECT MAX(age) FROM member)`
    AgeIsMaximum,
}

impl Predicate {
    /// True when the predicate reads a team column
    pub fn touches_team(&self) -> bool {
        matches!(self, Predicate::TeamNameEq(_))
    }
}

/// Folds optional values into a list of predicates combined with AND
///
/// # Example
/// ```
/// use member_query::query::predicate::{Predicate, PredicateBuilder};
///
/// let predicates = PredicateBuilder::new()
///     .and_some(Some("member1".to_string()), Predicate::UsernameEq)
///     .and_some(None::<i32>, Predicate::AgeEq)
///     .build();
///
/// assert_eq!(predicates, vec![Predicate::UsernameEq("member1".to_string())]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PredicateBuilder {
    predicates: Vec<Predicate>,
}

impl PredicateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate unconditionally
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Add `factory(value)` when the value is present, otherwise nothing
    pub fn and_some<T>(mut self, value: Option<T>, factory: impl FnOnce(T) -> Predicate) -> Self {
        if let Some(value) = value {
            self.predicates.push(factory(value));
        }
        self
    }

    /// Append every predicate from another list
    pub fn and_all(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.predicates.extend(predicates);
        self
    }

    pub fn build(self) -> Vec<Predicate> {
        self.predicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_values_add_nothing() {
        let predicates = PredicateBuilder::new()
            .and_some(None::<String>, Predicate::UsernameEq)
            .and_some(None::<i32>, Predicate::AgeGoe)
            .build();

        assert!(predicates.is_empty());
    }

    #[test]
    fn present_values_keep_insertion_order() {
        let predicates = PredicateBuilder::new()
            .and_some(Some(20), Predicate::AgeGoe)
            .and(Predicate::AgeIsMaximum)
            .and_some(Some(30), Predicate::AgeLoe)
            .build();

        assert_eq!(
            predicates,
            vec![
                Predicate::AgeGoe(20),
                Predicate::AgeIsMaximum,
                Predicate::AgeLoe(30)
            ]
        );
    }

    #[test]
    fn and_all_appends() {
        let predicates = PredicateBuilder::new()
            .and(Predicate::AgeLt(28))
            .and_all(vec![Predicate::TeamNameEq("teamA".to_string())])
            .build();

        assert_eq!(predicates.len(), 2);
        assert!(predicates[1].touches_team());
        assert!(!predicates[0].touches_team());
    }
}
