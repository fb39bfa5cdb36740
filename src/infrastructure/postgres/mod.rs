// PostgreSQL adapters for the query layer

pub mod query_executor;
pub mod schema;
pub mod sql;

pub use query_executor::PostgresQueryExecutor;
pub use schema::ensure_schema;
