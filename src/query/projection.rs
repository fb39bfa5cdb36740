//! Result shapes produced by member queries
//!
//! Queries never hand out entities. Each shape names its own select list
//! so storage adapters can map columns onto fields without reflection.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::member::Member;
use crate::domain::team::Team;

/// Selectable columns of the member/team join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    MemberId,
    Username,
    Age,
    TeamId,
    TeamName,
}

/// A member row joined with its (optional) team, before projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRow {
    pub member_id: Uuid,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<Uuid>,
    pub team_name: Option<String>,
}

impl JoinedRow {
    pub fn new(member: &Member, team: Option<&Team>) -> Self {
        Self {
            member_id: member.id(),
            username: member.username().map(str::to_string),
            age: member.age(),
            team_id: team.map(Team::id),
            team_name: team.map(|t| t.name().to_string()),
        }
    }
}

/// A typed output shape for member queries
pub trait Projection: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static {
    /// Select list as `(field, output column name)` pairs
    const COLUMNS: &'static [(Field, &'static str)];

    /// Build the shape from a joined row
    fn from_joined(row: &JoinedRow) -> Self;
}

/// Member with its team's id and name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MemberTeamDto {
    pub member_id: Uuid,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<Uuid>,
    pub team_name: Option<String>,
}

impl Projection for MemberTeamDto {
    const COLUMNS: &'static [(Field, &'static str)] = &[
        (Field::MemberId, "member_id"),
        (Field::Username, "username"),
        (Field::Age, "age"),
        (Field::TeamId, "team_id"),
        (Field::TeamName, "team_name"),
    ];

    fn from_joined(row: &JoinedRow) -> Self {
        Self {
            member_id: row.member_id,
            username: row.username.clone(),
            age: row.age,
            team_id: row.team_id,
            team_name: row.team_name.clone(),
        }
    }
}

/// Username and age only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MemberDto {
    pub username: Option<String>,
    pub age: i32,
}

impl Projection for MemberDto {
    const COLUMNS: &'static [(Field, &'static str)] =
        &[(Field::Username, "username"), (Field::Age, "age")];

    fn from_joined(row: &JoinedRow) -> Self {
        Self {
            username: row.username.clone(),
            age: row.age,
        }
    }
}

/// Username exposed under the column alias `name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserDto {
    pub name: Option<String>,
    pub age: i32,
}

impl Projection for UserDto {
    const COLUMNS: &'static [(Field, &'static str)] =
        &[(Field::Username, "name"), (Field::Age, "age")];

    fn from_joined(row: &JoinedRow) -> Self {
        Self {
            name: row.username.clone(),
            age: row.age,
        }
    }
}

/// Fractional digits PostgreSQL keeps for `AVG` over integer columns
const AVG_SCALE: u32 = 16;

/// Count, sum, average, min and max of `age`
///
/// Over an empty set the count is 0 and everything else is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct AgeAggregate {
    #[sqlx(rename = "member_count")]
    pub count: i64,
    #[sqlx(rename = "age_sum")]
    pub sum: Option<i64>,
    #[sqlx(rename = "age_avg")]
    pub avg: Option<Decimal>,
    #[sqlx(rename = "age_min")]
    pub min: Option<i32>,
    #[sqlx(rename = "age_max")]
    pub max: Option<i32>,
}

impl AgeAggregate {
    /// Fold a set of ages
    pub fn from_ages(ages: impl IntoIterator<Item = i32>) -> Self {
        let ages: Vec<i32> = ages.into_iter().collect();
        if ages.is_empty() {
            return Self {
                count: 0,
                sum: None,
                avg: None,
                min: None,
                max: None,
            };
        }

        let count = ages.len() as i64;
        let sum: i64 = ages.iter().map(|&age| i64::from(age)).sum();

        Self {
            count,
            sum: Some(sum),
            avg: Some(
                (Decimal::from(sum) / Decimal::from(count))
                    .round_dp_with_strategy(AVG_SCALE, RoundingStrategy::MidpointAwayFromZero),
            ),
            min: ages.iter().copied().min(),
            max: ages.iter().copied().max(),
        }
    }
}

/// Per-team age statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamAgeStats {
    pub team_name: String,
    pub member_count: i64,
    pub average_age: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined() -> JoinedRow {
        let team = Team::new("teamA").unwrap();
        let member = Member::new(Some("member1".to_string()), 10, Some(&team)).unwrap();
        JoinedRow::new(&member, Some(&team))
    }

    #[test]
    fn member_team_dto_copies_every_column() {
        let row = joined();
        let dto = MemberTeamDto::from_joined(&row);

        assert_eq!(dto.member_id, row.member_id);
        assert_eq!(dto.username.as_deref(), Some("member1"));
        assert_eq!(dto.age, 10);
        assert_eq!(dto.team_id, row.team_id);
        assert_eq!(dto.team_name.as_deref(), Some("teamA"));
    }

    #[test]
    fn member_without_team_has_null_team_columns() {
        let member = Member::named("loner", 33).unwrap();
        let dto = MemberTeamDto::from_joined(&JoinedRow::new(&member, None));

        assert!(dto.team_id.is_none());
        assert!(dto.team_name.is_none());
    }

    #[test]
    fn user_dto_renames_username() {
        let dto = UserDto::from_joined(&joined());

        assert_eq!(dto.name.as_deref(), Some("member1"));
        assert_eq!(UserDto::COLUMNS[0], (Field::Username, "name"));
    }

    #[test]
    fn aggregate_of_ages() {
        let aggregate = AgeAggregate::from_ages(vec![10, 20, 30, 40]);

        assert_eq!(aggregate.count, 4);
        assert_eq!(aggregate.sum, Some(100));
        assert_eq!(aggregate.avg, Some(Decimal::from(25)));
        assert_eq!(aggregate.min, Some(10));
        assert_eq!(aggregate.max, Some(40));
    }

    #[test]
    fn fractional_average_keeps_sixteen_digits() {
        let aggregate = AgeAggregate::from_ages(vec![10, 10, 11]);
        let expected: Decimal = "10.3333333333333333".parse().unwrap();

        assert_eq!(aggregate.avg, Some(expected));
        assert_eq!(aggregate.avg.unwrap().scale(), 16);
    }

    #[test]
    fn aggregate_of_nothing() {
        let aggregate = AgeAggregate::from_ages(Vec::new());

        assert_eq!(aggregate.count, 0);
        assert!(aggregate.sum.is_none());
        assert!(aggregate.avg.is_none());
    }

    #[test]
    fn member_team_dto_serializes_camel_case() {
        let json = serde_json::to_value(MemberTeamDto::from_joined(&joined())).unwrap();

        assert_eq!(json["teamName"], "teamA");
        assert_eq!(json["username"], "member1");
    }
}
