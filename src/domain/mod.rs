//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `progression` - XP events, the level curve, and the per-user aggregate

pub mod foundation;
pub mod progression;
