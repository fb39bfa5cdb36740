//! Member Query Library
//!
//! Dynamic member/team queries: optional search conditions composed into
//! predicates, left-joined DTO projections, ordering with null placement,
//! paging with a separate total count, age aggregates and bulk updates.
//! Storage is reached through the [`query::QueryExecutor`] port, with
//! PostgreSQL and in-memory adapters in [`infrastructure`].

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod query;
pub mod seed;
