/// Database configuration and connection management
pub mod database;

/// Seed listing loading from listings.toml
pub mod listings;
