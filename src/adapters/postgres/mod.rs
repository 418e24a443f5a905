//! PostgreSQL adapters - Database implementations for the progression ports.
//!
//! - `PgXpEventStore` - append-only ledger with an `ON CONFLICT DO NOTHING`
//!   insert over the `(user_id, event_type, dedup_key)` unique index
//! - `PgProgressionRepository` - aggregate rows plus the conditional
//!   daily-login claim update

mod progression_repository;
mod xp_event_store;

pub use progression_repository::PgProgressionRepository;
pub use xp_event_store::PgXpEventStore;

use sqlx::PgPool;

use crate::domain::foundation::DomainError;

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DomainError::persistence(format!("Migration failed: {}", e)))
}
