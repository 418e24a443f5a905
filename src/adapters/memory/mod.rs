//! In-memory adapters for tests and local wiring.
//!
//! These mirror the PostgreSQL adapters' semantics (dedup on append, the
//! conditional login claim) with a write lock standing in for the database's
//! constraints. Test-only conveniences such as fault injection live here too.

mod progression_repository;
mod xp_event_store;

pub use progression_repository::InMemoryProgressionRepository;
pub use xp_event_store::InMemoryXpEventStore;
