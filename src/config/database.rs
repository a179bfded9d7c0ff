//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the database schema always matches the Rust structs without hand-written SQL.

use crate::entities::Property;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://estate.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling back
/// to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates the property table from its entity definition, if it does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut property_table = schema.create_table_from_entity(Property);
    property_table.if_not_exists();

    db.execute(builder.build(&property_table)).await?;
    info!("Database tables ensured.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PropertyModel;
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let _: Vec<PropertyModel> = Property::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_twice() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[test]
    fn test_database_url_is_never_empty() {
        assert!(!get_database_url().is_empty());
    }
}
