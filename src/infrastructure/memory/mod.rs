// In-process adapters

pub mod store;

pub use store::InMemoryStore;
