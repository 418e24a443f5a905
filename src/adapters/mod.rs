//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - PostgreSQL-backed ledger and aggregate persistence
//! - `memory` - in-memory implementations for tests and local wiring

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryProgressionRepository, InMemoryXpEventStore};
pub use postgres::{PgProgressionRepository, PgXpEventStore};
