//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test properties with sensible defaults.

use crate::{
    core::property::{self, NewProperty},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output through the test harness, defaulting to TRACE.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test property with sensible defaults.
///
/// # Defaults
/// * `expected_price`: 100000.0
/// * everything else: the schema defaults
pub async fn create_test_property(
    db: &DatabaseConnection,
    title: &str,
) -> Result<entities::property::Model> {
    property::create_property(db, NewProperty::new(title, 100_000.0)).await
}

/// Sets up a complete test environment with one property.
/// Returns (db, property) for common test scenarios.
pub async fn setup_with_property() -> Result<(DatabaseConnection, entities::property::Model)> {
    let db = setup_test_db().await?;
    let property = create_test_property(&db, "Test Property").await?;
    Ok((db, property))
}
