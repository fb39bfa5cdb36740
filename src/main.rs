use member_query::config::AppConfig;
use member_query::infrastructure::postgres::{ensure_schema, PostgresQueryExecutor};
use member_query::infrastructure::repositories::{PostgresMemberRepository, PostgresTeamRepository};
use member_query::query::{MemberQueryComposer, MemberSearchCondition, OrderSpec, Pageable, SortField};
use member_query::seed::seed_demo_data;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;

/// Usage: `member-query ['<json condition>'] [offset] [limit]`
///
/// Example: `member-query '{"teamName":"teamB","ageGoe":35}' 0 10`
#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let condition: MemberSearchCondition = match args.first() {
        Some(raw) => serde_json::from_str(raw).expect("Condition must be a JSON object"),
        None => MemberSearchCondition::default(),
    };
    let offset = args
        .get(1)
        .map(|raw| raw.parse::<u64>().expect("Offset must be a non-negative integer"))
        .unwrap_or(0);
    let limit = args
        .get(2)
        .map(|raw| raw.parse::<u64>().expect("Limit must be a non-negative integer"));

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Database connected successfully");

    ensure_schema(&pool).await.expect("Failed to prepare schema");

    if config.seed_demo_data {
        let teams = PostgresTeamRepository::new(pool.clone());
        let members = PostgresMemberRepository::new(pool.clone());
        seed_demo_data(&teams, &members)
            .await
            .expect("Failed to seed demo data");
    }

    let composer = MemberQueryComposer::new(PostgresQueryExecutor::new(pool));

    let pageable = Pageable {
        offset,
        limit,
        order: vec![
            OrderSpec::asc(SortField::TeamName),
            OrderSpec::asc(SortField::Username),
        ],
    };

    let page = composer
        .search(&condition, Some(&pageable))
        .await
        .expect("Search failed");
    let aggregate = composer
        .aggregate(&condition)
        .await
        .expect("Aggregate failed");

    tracing::info!(rows = page.content.len(), total = page.total, "Search finished");

    let output = json!({
        "condition": condition,
        "page": page,
        "ages": aggregate,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).expect("Output is serializable")
    );
}
