//! Renders query plans into PostgreSQL statements
//!
//! All values go through bind parameters; only fixed column and table
//! names are written into the SQL text.

use sqlx::{Postgres, QueryBuilder};

use crate::query::{
    Assignment, Field, JoinKind, OrderSpec, Predicate, Projection, SelectPlan, SortField,
    UpdatePlan,
};

pub type PgQueryBuilder = QueryBuilder<'static, Postgres>;

/// Qualified column for a selectable field
pub fn field_column(field: Field) -> &'static str {
    match field {
        Field::MemberId => "m.member_id",
        Field::Username => "m.username",
        Field::Age => "m.age",
        Field::TeamId => "t.team_id",
        Field::TeamName => "t.name",
    }
}

/// Qualified column for a sort key
pub fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::MemberId => "m.member_id",
        SortField::Username => "m.username",
        SortField::Age => "m.age",
        SortField::TeamName => "t.name",
    }
}

/// `SELECT <projection columns> FROM ... WHERE ... ORDER BY ... LIMIT ... OFFSET ...`
pub fn select_statement<P: Projection>(plan: &SelectPlan) -> PgQueryBuilder {
    let mut qb = PgQueryBuilder::new("SELECT ");
    for (i, (field, alias)) in P::COLUMNS.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(field_column(*field)).push(" AS ").push(*alias);
    }
    push_from(&mut qb, plan.join, &plan.join_on);
    push_where(&mut qb, &plan.predicates);
    push_order_by(&mut qb, &plan.order);
    push_limit_offset(&mut qb, plan.limit, plan.offset);
    qb
}

/// `SELECT COUNT(*)` over the plan's join and filters
pub fn count_statement(plan: &SelectPlan) -> PgQueryBuilder {
    let mut qb = PgQueryBuilder::new("SELECT COUNT(*)");
    push_from(&mut qb, plan.join, &plan.join_on);
    push_where(&mut qb, &plan.predicates);
    qb
}

/// Count/sum/avg/min/max of age over the plan's join and filters
pub fn aggregate_statement(plan: &SelectPlan) -> PgQueryBuilder {
    let mut qb = PgQueryBuilder::new(
        "SELECT COUNT(m.member_id) AS member_count, SUM(m.age) AS age_sum, \
         AVG(m.age) AS age_avg, MIN(m.age) AS age_min, MAX(m.age) AS age_max",
    );
    push_from(&mut qb, plan.join, &plan.join_on);
    push_where(&mut qb, &plan.predicates);
    qb
}

/// Member count and average age grouped by team name
pub fn team_aggregate_statement(plan: &SelectPlan) -> PgQueryBuilder {
    let mut qb = PgQueryBuilder::new(
        "SELECT t.name AS team_name, COUNT(m.member_id) AS member_count, \
         AVG(m.age) AS average_age",
    );
    push_from(&mut qb, plan.join, &plan.join_on);
    push_where(&mut qb, &plan.predicates);
    qb.push(" GROUP BY t.name ORDER BY t.name ASC");
    qb
}

/// `UPDATE member SET ...` restricted to members matched through the join
///
/// Filters may reference team columns, so matching rows are selected with
/// the same LEFT JOIN as reads and the update is keyed on their ids.
pub fn update_statement(plan: &UpdatePlan) -> PgQueryBuilder {
    let mut qb = PgQueryBuilder::new("UPDATE member SET ");
    for (i, assignment) in plan.assignments.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        match assignment {
            Assignment::SetUsername(username) => {
                qb.push("username = ").push_bind(username.clone());
            }
            Assignment::AddAge(delta) => {
                qb.push("age = age + ").push_bind(*delta);
            }
        }
    }

    if !plan.predicates.is_empty() {
        qb.push(" WHERE member_id IN (SELECT m.member_id");
        push_from(&mut qb, JoinKind::Left, &[]);
        push_where(&mut qb, &plan.predicates);
        qb.push(")");
    }
    qb
}

fn push_from(qb: &mut PgQueryBuilder, join: JoinKind, join_on: &[Predicate]) {
    qb.push(" FROM member m ");
    qb.push(match join {
        JoinKind::Left => "LEFT JOIN",
        JoinKind::Inner => "INNER JOIN",
    });
    qb.push(" team t ON m.team_id = t.team_id");
    for predicate in join_on {
        qb.push(" AND ");
        push_predicate(qb, predicate);
    }
}

fn push_where(qb: &mut PgQueryBuilder, predicates: &[Predicate]) {
    for (i, predicate) in predicates.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        push_predicate(qb, predicate);
    }
}

fn push_predicate(qb: &mut PgQueryBuilder, predicate: &Predicate) {
    match predicate {
        Predicate::UsernameEq(username) => {
            qb.push("m.username = ").push_bind(username.clone());
        }
        Predicate::TeamNameEq(name) => {
            qb.push("t.name = ").push_bind(name.clone());
        }
        Predicate::AgeEq(age) => {
            qb.push("m.age = ").push_bind(*age);
        }
        Predicate::AgeGoe(age) => {
            qb.push("m.age >= ").push_bind(*age);
        }
        Predicate::AgeLoe(age) => {
            qb.push("m.age <= ").push_bind(*age);
        }
        Predicate::AgeLt(age) => {
            qb.push("m.age < ").push_bind(*age);
        }
        Predicate::AgeIsMaximum => {
            qb.push("m.age = (SELECT MAX(ms.age) FROM member ms)");
        }
    }
}

fn push_order_by(qb: &mut PgQueryBuilder, order: &[OrderSpec]) {
    for (i, spec) in order.iter().enumerate() {
        qb.push(if i == 0 { " ORDER BY " } else { ", " });
        qb.push(sort_column(spec.field))
            .push(" ")
            .push(spec.direction.as_sql())
            .push(if spec.nulls_come_first() {
                " NULLS FIRST"
            } else {
                " NULLS LAST"
            });
    }
}

fn push_limit_offset(qb: &mut PgQueryBuilder, limit: Option<u64>, offset: u64) {
    if let Some(limit) = limit {
        qb.push(" LIMIT ").push_bind(to_i64(limit));
    }
    if offset > 0 {
        qb.push(" OFFSET ").push_bind(to_i64(offset));
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{MemberDto, MemberSearchCondition, MemberTeamDto, UserDto};

    const FROM_LEFT: &str = " FROM member m LEFT JOIN team t ON m.team_id = t.team_id";

    #[test]
    fn select_without_conditions_has_no_where() {
        let plan = SelectPlan::default();
        let qb = select_statement::<MemberTeamDto>(&plan);

        assert_eq!(
            qb.sql(),
            format!(
                "SELECT m.member_id AS member_id, m.username AS username, m.age AS age, \
                 t.team_id AS team_id, t.name AS team_name{}",
                FROM_LEFT
            )
        );
    }

    #[test]
    fn select_with_condition_binds_in_field_order() {
        let condition = MemberSearchCondition::new()
            .age_loe(40)
            .age_goe(35)
            .team_name("teamB");
        let plan = SelectPlan::new(condition.predicates());
        let qb = select_statement::<MemberDto>(&plan);

        assert_eq!(
            qb.sql(),
            format!(
                "SELECT m.username AS username, m.age AS age{} \
                 WHERE t.name = $1 AND m.age >= $2 AND m.age <= $3",
                FROM_LEFT
            )
        );
    }

    #[test]
    fn select_aliases_username_for_user_dto() {
        let qb = select_statement::<UserDto>(&SelectPlan::default());

        assert!(qb.sql().starts_with("SELECT m.username AS name, m.age AS age"));
    }

    #[test]
    fn order_by_renders_null_placement() {
        let plan = SelectPlan::default().order([
            OrderSpec::desc(SortField::Age),
            OrderSpec::asc(SortField::Username).nulls_last(),
            OrderSpec::asc(SortField::TeamName).nulls_first(),
        ]);
        let qb = select_statement::<MemberDto>(&plan);

        assert!(qb.sql().ends_with(
            " ORDER BY m.age DESC NULLS FIRST, m.username ASC NULLS LAST, t.name ASC NULLS FIRST"
        ));
    }

    #[test]
    fn paging_binds_limit_then_offset() {
        let plan = SelectPlan::new(vec![Predicate::AgeGoe(10)])
            .order([OrderSpec::desc(SortField::Username)])
            .offset(1)
            .limit(Some(2));
        let qb = select_statement::<MemberDto>(&plan);

        assert!(qb.sql().ends_with(
            " WHERE m.age >= $1 ORDER BY m.username DESC NULLS FIRST LIMIT $2 OFFSET $3"
        ));
    }

    #[test]
    fn zero_offset_is_omitted() {
        let plan = SelectPlan::default().limit(Some(5));
        let qb = select_statement::<MemberDto>(&plan);

        assert!(qb.sql().ends_with(" LIMIT $1"));
    }

    #[test]
    fn count_ignores_order_and_paging() {
        let plan = SelectPlan::new(vec![Predicate::TeamNameEq("teamA".to_string())])
            .order([OrderSpec::asc(SortField::Age)])
            .limit(Some(2))
            .for_count();
        let qb = count_statement(&plan);

        assert_eq!(
            qb.sql(),
            format!("SELECT COUNT(*){} WHERE t.name = $1", FROM_LEFT)
        );
    }

    #[test]
    fn aggregate_uses_named_columns() {
        let qb = aggregate_statement(&SelectPlan::default());

        assert_eq!(
            qb.sql(),
            format!(
                "SELECT COUNT(m.member_id) AS member_count, SUM(m.age) AS age_sum, \
                 AVG(m.age) AS age_avg, MIN(m.age) AS age_min, MAX(m.age) AS age_max{}",
                FROM_LEFT
            )
        );
    }

    #[test]
    fn team_aggregate_groups_with_inner_join() {
        let plan = SelectPlan::default().join(JoinKind::Inner);
        let qb = team_aggregate_statement(&plan);

        assert!(qb
            .sql()
            .contains(" FROM member m INNER JOIN team t ON m.team_id = t.team_id"));
        assert!(qb.sql().ends_with(" GROUP BY t.name ORDER BY t.name ASC"));
    }

    #[test]
    fn join_conditions_render_in_on_clause() {
        let plan = SelectPlan::new(vec![Predicate::AgeGoe(20)])
            .join_on([Predicate::TeamNameEq("teamA".to_string())]);
        let qb = select_statement::<MemberDto>(&plan);

        assert_eq!(
            qb.sql(),
            "SELECT m.username AS username, m.age AS age FROM member m \
             LEFT JOIN team t ON m.team_id = t.team_id AND t.name = $1 WHERE m.age >= $2"
        );
    }

    #[test]
    fn subquery_predicate_has_no_binds() {
        let plan = SelectPlan::new(vec![Predicate::AgeIsMaximum]);
        let qb = count_statement(&plan);

        assert!(qb
            .sql()
            .ends_with(" WHERE m.age = (SELECT MAX(ms.age) FROM member ms)"));
    }

    #[test]
    fn update_with_filter_selects_ids_through_join() {
        let plan = UpdatePlan::new(Assignment::SetUsername(Some("guest".to_string())))
            .filter([Predicate::AgeLt(28)]);
        let qb = update_statement(&plan);

        assert_eq!(
            qb.sql(),
            format!(
                "UPDATE member SET username = $1 WHERE member_id IN \
                 (SELECT m.member_id{} WHERE m.age < $2)",
                FROM_LEFT
            )
        );
    }

    #[test]
    fn update_without_filter_touches_every_row() {
        let plan = UpdatePlan::new(Assignment::AddAge(1));
        let qb = update_statement(&plan);

        assert_eq!(qb.sql(), "UPDATE member SET age = age + $1");
    }
}
