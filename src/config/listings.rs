//! Seed listing loading from listings.toml
//!
//! Properties defined in the listings file are inserted on startup when no property
//! with the same title exists yet.

use crate::core::property::NewProperty;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

const DEFAULT_LISTINGS_PATH: &str = "listings.toml";

/// Configuration structure representing the entire listings file
#[derive(Debug, Default, Deserialize)]
pub struct ListingsConfig {
    /// Properties to seed
    #[serde(default)]
    pub properties: Vec<NewProperty>,
}

/// Parses listings from TOML text.
pub fn parse_listings(contents: &str) -> Result<ListingsConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse listings: {e}"),
    })
}

/// Loads listings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML syntax is invalid,
/// or a listing has a value of the wrong type.
pub fn load_listings<P: AsRef<Path>>(path: P) -> Result<ListingsConfig> {
    let path = path.as_ref();
    debug!("Loading listings from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read listings file {path:?}: {e}"),
    })?;
    parse_listings(&contents)
}

/// Path of the listings file: `ESTATE_LISTINGS`, or `./listings.toml`.
#[must_use]
pub fn listings_path() -> String {
    std::env::var("ESTATE_LISTINGS").unwrap_or_else(|_| DEFAULT_LISTINGS_PATH.to_string())
}
