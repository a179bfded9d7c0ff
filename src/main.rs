use estate::{
    config::{database, listings},
    core::{fields::PROPERTY_FIELDS, list_properties, seed_properties},
    errors::Result,
};
use dotenvy::dotenv;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    for meta in &PROPERTY_FIELDS {
        debug!(
            field = meta.name,
            required = meta.required,
            copy = meta.copy,
            readonly = meta.readonly,
            "{}: {}",
            meta.label,
            meta.help
        );
    }

    // 4. Seed listings, if a listings file is present
    let listings_path = listings::listings_path();
    if Path::new(&listings_path).exists() {
        let config = listings::load_listings(&listings_path)
            .inspect_err(|e| error!("Failed to load listings: {}", e))?;
        seed_properties(&db, &config.properties).await?;
    } else {
        warn!("No listings file at {}; nothing to seed.", listings_path);
    }

    // 5. Report the current listing
    let properties = list_properties(&db).await?;
    info!("{} active properties.", properties.len());
    for property in &properties {
        info!(id = property.id, status = %property.status, "{}", property.display_name());
    }

    Ok(())
}
