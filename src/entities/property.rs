//! Property entity - Represents a real-estate listing.
//!
//! Each property carries its title, location, pricing, physical characteristics
//! and sales status. Properties are archived through `is_active` rather than deleted,
//! and their human-readable label is derived from title and postcode on demand.

use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a postcode, in characters
pub const POSTCODE_MAX_LEN: usize = 10;

/// Orientation of a property's garden
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum GardenOrientation {
    /// Facing north
    #[sea_orm(string_value = "north")]
    North,
    /// Facing south
    #[sea_orm(string_value = "south")]
    South,
    /// Facing east
    #[sea_orm(string_value = "east")]
    East,
    /// Facing west
    #[sea_orm(string_value = "west")]
    West,
}

impl GardenOrientation {
    /// Display label shown to users
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
        }
    }
}

impl fmt::Display for GardenOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status of a property in the sales process.
///
/// Transitions between states are driven by offer handling that lives outside
/// this crate; nothing here enforces an ordering.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum PropertyState {
    /// Freshly listed, no offer yet
    #[default]
    #[sea_orm(string_value = "new")]
    New,
    /// At least one offer is pending
    #[sea_orm(string_value = "offer_received")]
    OfferReceived,
    /// An offer was accepted
    #[sea_orm(string_value = "offer_accepted")]
    OfferAccepted,
    /// The sale is complete
    #[sea_orm(string_value = "sold")]
    Sold,
    /// Withdrawn from sale
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl PropertyState {
    /// Display label shown to users
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::OfferReceived => "Offer Received",
            Self::OfferAccepted => "Offer Accepted",
            Self::Sold => "Sold",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for PropertyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Property database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "estate_properties")]
pub struct Model {
    /// Unique identifier for the property
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Listing title (e.g., "Cozy cottage")
    pub title: String,
    /// Lowercased title, matched by case-insensitive search
    pub title_search: String,
    /// Free-form description of the property
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Postal code of the property location
    #[sea_orm(column_type = "String(StringLen::N(10))", nullable)]
    pub postcode: Option<String>,
    /// Lowercased postcode, matched by case-insensitive search
    pub postcode_search: Option<String>,
    /// Date the property becomes available
    pub availability_date: Option<Date>,
    /// Asking price
    pub expected_price: f64,
    /// Final price, filled once an offer is accepted
    pub selling_price: Option<f64>,
    /// Number of bedrooms
    pub bedrooms: i32,
    /// Living area in square meters
    pub living_area_sqm: Option<i32>,
    /// Number of facades
    pub facade_count: Option<i32>,
    /// Whether the property has a garage
    pub has_garage: bool,
    /// Whether the property has a garden
    pub has_garden: bool,
    /// Garden area in square meters
    pub garden_area_sqm: Option<i32>,
    /// Which way the garden faces
    pub garden_orientation: Option<GardenOrientation>,
    /// Archive flag - if false, the property is hidden from default listings
    pub is_active: bool,
    /// Sales status
    pub status: PropertyState,
    /// When the property was created
    pub created_at: DateTime,
    /// When the property was last modified
    pub updated_at: DateTime,
}

impl Model {
    /// Human-readable label: the title, followed by ` - {postcode}` when a postcode is set.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.postcode.as_deref() {
            Some(postcode) if !postcode.is_empty() => format!("{} - {postcode}", self.title),
            _ => self.title.clone(),
        }
    }
}

/// Case-folded form of a searchable value.
///
/// `SQLite` only folds ASCII letters in `lower()` and `LIKE`, so search keys are
/// folded here and stored next to the value they index.
#[must_use]
pub fn search_key(value: &str) -> String {
    value.to_lowercase()
}

impl ActiveModel {
    /// Recomputes `title_search` and `postcode_search` from `title` and `postcode`.
    ///
    /// Must run before any write that sets either source column.
    pub fn refresh_search_keys(&mut self) {
        let title_key = match &self.title {
            ActiveValue::Set(title) | ActiveValue::Unchanged(title) => Some(search_key(title)),
            ActiveValue::NotSet => None,
        };
        if let Some(key) = title_key {
            self.title_search = Set(key);
        }

        let postcode_key = match &self.postcode {
            ActiveValue::Set(postcode) | ActiveValue::Unchanged(postcode) => {
                Some(postcode.as_deref().map(search_key))
            }
            ActiveValue::NotSet => None,
        };
        if let Some(key) = postcode_key {
            self.postcode_search = Set(key);
        }
    }
}

/// `Property` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
