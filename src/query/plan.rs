//! Storage-neutral query plans
//!
//! A plan is a value: composing one has no side effects, and executors
//! decide how to run it.

use super::order::OrderSpec;
use super::predicate::Predicate;

/// How members are joined to teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    /// Keep members without a team (team columns are NULL)
    #[default]
    Left,
    /// Drop members without a team
    Inner,
}

/// A read over the member/team join
///
/// `join_on` predicates are extra join conditions. Under a left join a
/// member whose team fails them is kept with NULL team columns, while
/// `predicates` drop the member entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectPlan {
    pub join: JoinKind,
    pub join_on: Vec<Predicate>,
    pub predicates: Vec<Predicate>,
    pub order: Vec<OrderSpec>,
    pub offset: u64,
    pub limit: Option<u64>,
}

impl SelectPlan {
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Self {
            predicates,
            ..Self::default()
        }
    }

    pub fn join(mut self, join: JoinKind) -> Self {
        self.join = join;
        self
    }

    /// Add conditions to the join itself
    pub fn join_on(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.join_on.extend(predicates);
        self
    }

    pub fn order(mut self, order: impl IntoIterator<Item = OrderSpec>) -> Self {
        self.order = order.into_iter().collect();
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    /// Same filters and join, without ordering or paging
    pub fn for_count(&self) -> Self {
        Self {
            join: self.join,
            join_on: self.join_on.clone(),
            predicates: self.predicates.clone(),
            ..Self::default()
        }
    }
}

/// Column change applied by a bulk update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// `username = value`
    SetUsername(Option<String>),
    /// `age = age + delta`
    AddAge(i32),
}

/// A storage-level update over every member matching the predicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    pub assignments: Vec<Assignment>,
    pub predicates: Vec<Predicate>,
}

impl UpdatePlan {
    pub fn new(assignment: Assignment) -> Self {
        Self {
            assignments: vec![assignment],
            predicates: Vec::new(),
        }
    }

    pub fn filter(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.predicates.extend(predicates);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::order::{OrderSpec, SortField};

    #[test]
    fn default_plan_is_unfiltered_left_join() {
        let plan = SelectPlan::default();

        assert_eq!(plan.join, JoinKind::Left);
        assert!(plan.join_on.is_empty());
        assert!(plan.predicates.is_empty());
        assert_eq!(plan.offset, 0);
        assert!(plan.limit.is_none());
    }

    #[test]
    fn count_plan_drops_order_and_paging() {
        let plan = SelectPlan::new(vec![Predicate::AgeGoe(10)])
            .join(JoinKind::Inner)
            .join_on([Predicate::TeamNameEq("teamA".to_string())])
            .order([OrderSpec::desc(SortField::Age)])
            .offset(5)
            .limit(Some(10));

        let count = plan.for_count();

        assert_eq!(count.join, JoinKind::Inner);
        assert_eq!(count.join_on, vec![Predicate::TeamNameEq("teamA".to_string())]);
        assert_eq!(count.predicates, vec![Predicate::AgeGoe(10)]);
        assert!(count.order.is_empty());
        assert_eq!(count.offset, 0);
        assert!(count.limit.is_none());
    }

    #[test]
    fn update_plan_collects_filters() {
        let plan = UpdatePlan::new(Assignment::AddAge(1))
            .filter([Predicate::AgeLt(28), Predicate::TeamNameEq("teamA".to_string())]);

        assert_eq!(plan.assignments, vec![Assignment::AddAge(1)]);
        assert_eq!(plan.predicates.len(), 2);
    }
}
