// Query layer
// Composes storage-neutral plans from search conditions and hands them
// to a QueryExecutor port

pub mod composer;
pub mod condition;
pub mod errors;
pub mod executor;
pub mod order;
pub mod page;
pub mod plan;
pub mod predicate;
pub mod projection;

pub use composer::MemberQueryComposer;
pub use condition::MemberSearchCondition;
pub use errors::{QueryError, QueryResult};
pub use executor::QueryExecutor;
pub use order::{NullsOrder, OrderSpec, SortDirection, SortField};
pub use page::{Page, Pageable};
pub use plan::{Assignment, JoinKind, SelectPlan, UpdatePlan};
pub use predicate::{Predicate, PredicateBuilder};
pub use projection::{
    AgeAggregate, Field, JoinedRow, MemberDto, MemberTeamDto, Projection, TeamAgeStats, UserDto,
};
