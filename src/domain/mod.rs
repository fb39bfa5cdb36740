// Domain layer module exports
// Entities and repository ports; independent of storage adapters

pub mod errors;
pub mod member;
pub mod repositories;
pub mod team;

pub use errors::{RepositoryError, RepositoryResult};
