//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! The progression core has exactly one boundary: persistence.
//!
//! - `XpEventStore` - append-only event log with a store-enforced
//!   uniqueness constraint (the duplicate-grant detection mechanism)
//! - `ProgressionRepository` - aggregate lookups plus the atomic
//!   daily-login claim (the policy's mutual-exclusion primitive)

mod progression_repository;
mod xp_event_store;

pub use progression_repository::{ClaimOutcome, ProgressionRepository};
pub use xp_event_store::{AppendOutcome, XpEventStore};
