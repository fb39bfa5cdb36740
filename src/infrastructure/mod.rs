// Infrastructure layer module
// Storage adapters for the domain repositories and the query executor port

pub mod memory;
pub mod postgres;
pub mod repositories;
