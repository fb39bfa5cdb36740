use thiserror::Error;

/// Errors raised while composing or executing member queries
#[derive(Debug, Error)]
pub enum QueryError {
    /// A zero-or-one fetch matched several rows
    #[error("Expected at most one result but found {found}")]
    NonUniqueResult { found: usize },

    /// An exactly-one fetch matched nothing
    #[error("Expected exactly one result but found none")]
    NotFound,

    /// A bulk update would break an entity invariant
    #[error("Invalid update: {0}")]
    InvalidUpdate(String),

    /// Storage failures pass through untouched
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type QueryResult<T> = Result<T, QueryError>;
