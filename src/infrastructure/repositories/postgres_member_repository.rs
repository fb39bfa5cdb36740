use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::member::{Member, MemberWithTeam};
use crate::domain::repositories::MemberRepository;
use crate::domain::team::Team;

#[derive(Debug, FromRow)]
struct MemberRow {
    member_id: Uuid,
    username: Option<String>,
    age: i32,
    team_id: Option<Uuid>,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Member::from_persistence(row.member_id, row.username, row.age, row.team_id)
    }
}

#[derive(Debug, FromRow)]
struct MemberWithTeamRow {
    member_id: Uuid,
    username: Option<String>,
    age: i32,
    team_id: Option<Uuid>,
    team_name: Option<String>,
}

impl From<MemberWithTeamRow> for MemberWithTeam {
    fn from(row: MemberWithTeamRow) -> Self {
        let team = match (row.team_id, row.team_name) {
            (Some(id), Some(name)) => Some(Team::from_persistence(id, name)),
            _ => None,
        };

        Self {
            member: Member::from_persistence(row.member_id, row.username, row.age, row.team_id),
            team,
        }
    }
}

/// PostgreSQL implementation of MemberRepository
pub struct PostgresMemberRepository {
    pool: PgPool,
}

impl PostgresMemberRepository {
    /// Creates a new PostgresMemberRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn save(&self, member: &Member) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO member (member_id, username, age, team_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (member_id) DO UPDATE SET
                username = EXCLUDED.username,
                age = EXCLUDED.age,
                team_id = EXCLUDED.team_id
            "#,
        )
        .bind(member.id())
        .bind(member.username())
        .bind(member.age())
        .bind(member.team_id())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT member_id, username, age, team_id
            FROM member
            WHERE member_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Member::from))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT member_id, username, age, team_id
            FROM member
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT member_id, username, age, team_id
            FROM member
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    async fn find_by_team(&self, team_id: Uuid) -> RepositoryResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT member_id, username, age, team_id
            FROM member
            WHERE team_id = $1
            ORDER BY username NULLS LAST
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    async fn find_with_team(&self, id: Uuid) -> RepositoryResult<Option<MemberWithTeam>> {
        let row = sqlx::query_as::<_, MemberWithTeamRow>(
            r#"
            SELECT m.member_id, m.username, m.age, t.team_id, t.name AS team_name
            FROM member m
            LEFT JOIN team t ON m.team_id = t.team_id
            WHERE m.member_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MemberWithTeam::from))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM member WHERE member_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Member not found: {}", id)));
        }

        Ok(())
    }
}
