use sqlx::PgPool;

const CREATE_TEAM: &str = r#"
    CREATE TABLE IF NOT EXISTS team (
        team_id UUID PRIMARY KEY,
        name TEXT NOT NULL
    )
"#;

const CREATE_MEMBER: &str = r#"
    CREATE TABLE IF NOT EXISTS member (
        member_id UUID PRIMARY KEY,
        username TEXT,
        age INTEGER NOT NULL CHECK (age >= 0),
        team_id UUID REFERENCES team (team_id)
    )
"#;

const CREATE_MEMBER_TEAM_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_member_team_id ON member (team_id)";

/// Creates the `team` and `member` tables when missing
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in [CREATE_TEAM, CREATE_MEMBER, CREATE_MEMBER_TEAM_INDEX] {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Database schema ready");
    Ok(())
}
