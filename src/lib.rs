//! Questline - XP and Progression Ledger
//!
//! This crate implements the progression subsystem for the Questline
//! developer community platform: an append-only XP event log, per-user
//! level aggregates, and the grant policies (daily login, contribution
//! sync, streak milestones) that feed them.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
