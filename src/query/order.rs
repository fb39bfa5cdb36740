//! Ordering keys for member queries
//!
//! Keys apply in the order given: the first key decides, later keys only
//! break ties.

use serde::{Deserialize, Serialize};

/// Sortable attributes of the member/team join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    MemberId,
    Username,
    Age,
    TeamName,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Where NULL values land
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NullsOrder {
    /// PostgreSQL default: last when ascending, first when descending
    #[default]
    Default,
    First,
    Last,
}

/// One ordering key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSpec {
    pub field: SortField,
    #[serde(default)]
    pub direction: SortDirection,
    #[serde(default)]
    pub nulls: NullsOrder,
}

impl OrderSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self {
            field,
            direction,
            nulls: NullsOrder::Default,
        }
    }

    pub fn asc(field: SortField) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: SortField) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = NullsOrder::First;
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = NullsOrder::Last;
        self
    }

    /// Whether NULLs sort before non-NULL values once defaults are resolved
    pub fn nulls_come_first(&self) -> bool {
        match self.nulls {
            NullsOrder::First => true,
            NullsOrder::Last => false,
            NullsOrder::Default => self.direction == SortDirection::Desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_null_placement_follows_direction() {
        assert!(!OrderSpec::asc(SortField::Username).nulls_come_first());
        assert!(OrderSpec::desc(SortField::Username).nulls_come_first());
    }

    #[test]
    fn explicit_null_placement_wins() {
        assert!(OrderSpec::asc(SortField::Username).nulls_first().nulls_come_first());
        assert!(!OrderSpec::desc(SortField::Username).nulls_last().nulls_come_first());
    }

    #[test]
    fn direction_sql() {
        assert_eq!(SortDirection::Asc.as_sql(), "ASC");
        assert_eq!(SortDirection::Desc.as_sql(), "DESC");
    }

    #[test]
    fn deserializes_with_defaults() {
        let spec: OrderSpec = serde_json::from_str(r#"{"field":"teamName"}"#).unwrap();

        assert_eq!(spec, OrderSpec::asc(SortField::TeamName));
    }
}
