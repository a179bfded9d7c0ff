//! Property business logic - Handles all listing-related operations.
//!
//! Provides functions for creating, retrieving, updating, archiving and duplicating
//! properties. Defaults, required fields and copy rules come from the field metadata
//! in [`crate::core::fields`]; every write is validated before it reaches the database.

use crate::{
    core::fields,
    entities::{GardenOrientation, Property, PropertyState, property},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue, QueryOrder, Set, TransactionTrait, Value, prelude::*};
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Values for a new property. Fields left as `None` take their declared default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewProperty {
    /// Listing title, trimmed before it is stored
    pub title: String,
    /// Free-form description
    pub description: Option<String>,
    /// Postal code; blank values are stored as NULL
    pub postcode: Option<String>,
    /// Defaults to three months after creation
    pub availability_date: Option<NaiveDate>,
    /// Asking price, required
    pub expected_price: Option<f64>,
    /// Defaults to 2
    pub bedrooms: Option<i32>,
    /// Living area in square meters
    pub living_area_sqm: Option<i32>,
    /// Number of facades
    pub facade_count: Option<i32>,
    /// Defaults to false
    pub has_garage: Option<bool>,
    /// Defaults to false
    pub has_garden: Option<bool>,
    /// Garden area in square meters
    pub garden_area_sqm: Option<i32>,
    /// Which way the garden faces
    pub garden_orientation: Option<GardenOrientation>,
    /// Defaults to active
    pub is_active: Option<bool>,
    /// Defaults to [`PropertyState::New`]
    pub status: Option<PropertyState>,
}

impl NewProperty {
    /// Creates the minimal set of values a property needs: a title and an asking price.
    #[must_use]
    pub fn new(title: impl Into<String>, expected_price: f64) -> Self {
        Self {
            title: title.into(),
            expected_price: Some(expected_price),
            ..Default::default()
        }
    }

    fn into_active_model(self) -> property::ActiveModel {
        property::ActiveModel {
            title: Set(self.title.trim().to_string()),
            description: Set(self.description),
            postcode: Set(normalize_postcode(self.postcode)),
            availability_date: set_or_default(self.availability_date.map(Some)),
            expected_price: set_or_default(self.expected_price),
            bedrooms: set_or_default(self.bedrooms),
            living_area_sqm: Set(self.living_area_sqm),
            facade_count: Set(self.facade_count),
            has_garage: set_or_default(self.has_garage),
            has_garden: set_or_default(self.has_garden),
            garden_area_sqm: Set(self.garden_area_sqm),
            garden_orientation: Set(self.garden_orientation),
            is_active: set_or_default(self.is_active),
            status: set_or_default(self.status),
            ..Default::default()
        }
    }
}

/// Partial update of a property's writable fields.
///
/// Outer `None` leaves a field unchanged; for nullable fields `Some(None)` clears it.
/// `selling_price` is not writable here, see [`record_selling_price`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyUpdate {
    /// New title, trimmed; must not be blank
    pub title: Option<String>,
    /// New description
    pub description: Option<Option<String>>,
    /// New postcode; blank values clear it
    pub postcode: Option<Option<String>>,
    /// New availability date
    pub availability_date: Option<Option<NaiveDate>>,
    /// New asking price
    pub expected_price: Option<f64>,
    /// New number of bedrooms
    pub bedrooms: Option<i32>,
    /// New living area in square meters
    pub living_area_sqm: Option<Option<i32>>,
    /// New number of facades
    pub facade_count: Option<Option<i32>>,
    /// Whether the property has a garage
    pub has_garage: Option<bool>,
    /// Whether the property has a garden
    pub has_garden: Option<bool>,
    /// New garden area in square meters
    pub garden_area_sqm: Option<Option<i32>>,
    /// New garden orientation
    pub garden_orientation: Option<Option<GardenOrientation>>,
    /// New sales status
    pub status: Option<PropertyState>,
}

impl PropertyUpdate {
    /// Converts the update into the set of column changes accepted by [`write_property`].
    #[must_use]
    pub fn into_changes(self) -> property::ActiveModel {
        property::ActiveModel {
            title: set_or_default(self.title.map(|title| title.trim().to_string())),
            description: set_or_default(self.description),
            postcode: set_or_default(self.postcode.map(normalize_postcode)),
            availability_date: set_or_default(self.availability_date),
            expected_price: set_or_default(self.expected_price),
            bedrooms: set_or_default(self.bedrooms),
            living_area_sqm: set_or_default(self.living_area_sqm),
            facade_count: set_or_default(self.facade_count),
            has_garage: set_or_default(self.has_garage),
            has_garden: set_or_default(self.has_garden),
            garden_area_sqm: set_or_default(self.garden_area_sqm),
            garden_orientation: set_or_default(self.garden_orientation),
            status: set_or_default(self.status),
            ..Default::default()
        }
    }
}

fn set_or_default<V>(value: Option<V>) -> ActiveValue<V>
where
    V: Into<Value>,
{
    value.map_or(ActiveValue::NotSet, ActiveValue::Set)
}

// Blank postcodes are stored as NULL
fn normalize_postcode(postcode: Option<String>) -> Option<String> {
    postcode
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}

/// Creates a new property, filling unset fields with their defaults.
///
/// The availability date defaults to three months after the creation date and the
/// status to [`PropertyState::New`].
///
/// # Errors
/// Returns an error if:
/// - The title is empty or whitespace-only, or the expected price is missing
/// - The postcode is longer than 10 characters
/// - The expected price is NaN or infinite
/// - The database insert operation fails
#[instrument(skip(db))]
pub async fn create_property<C>(db: &C, new_property: NewProperty) -> Result<property::Model>
where
    C: ConnectionTrait,
{
    let now = Utc::now().naive_utc();

    let mut model = new_property.into_active_model();
    model.refresh_search_keys();
    fields::apply_defaults(&mut model, now.date())?;
    fields::validate(&model)?;
    model.created_at = Set(now);
    model.updated_at = Set(now);

    let created = model.insert(db).await?;
    info!(id = created.id, "Created property '{}'", created.display_name());
    Ok(created)
}

/// Finds a property by its unique ID, archived or not.
pub async fn get_property_by_id<C>(db: &C, property_id: i64) -> Result<Option<property::Model>>
where
    C: ConnectionTrait,
{
    Property::find_by_id(property_id)
        .one(db)
        .await
        .map_err(Into::into)
}

async fn find_existing<C>(db: &C, property_id: i64) -> Result<property::Model>
where
    C: ConnectionTrait,
{
    get_property_by_id(db, property_id)
        .await?
        .ok_or(Error::PropertyNotFound { id: property_id })
}

/// Retrieves all active (non-archived) properties, most recently created first.
pub async fn list_properties(db: &DatabaseConnection) -> Result<Vec<property::Model>> {
    Property::find()
        .filter(property::Column::IsActive.eq(true))
        .order_by_desc(property::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every property including archived ones, most recently created first.
pub async fn list_all_properties(db: &DatabaseConnection) -> Result<Vec<property::Model>> {
    Property::find()
        .order_by_desc(property::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update to an existing property and revalidates it.
///
/// # Errors
/// Returns an error if:
/// - The property does not exist
/// - The updated record fails validation (e.g. a blank title)
/// - The database update operation fails
#[instrument(skip(db))]
pub async fn update_property(
    db: &DatabaseConnection,
    property_id: i64,
    changes: PropertyUpdate,
) -> Result<property::Model> {
    write_property(db, property_id, changes.into_changes()).await
}

/// Writes the columns set in `changes` onto an existing property.
///
/// Only the fields listed in [`fields::PROPERTY_FIELDS`] are taken from `changes`;
/// identity, timestamps and search keys are maintained here.
///
/// # Errors
/// Returns an error if:
/// - `changes` sets a read-only field such as `selling_price`
/// - The property does not exist
/// - The merged record fails validation
/// - The database update operation fails
#[instrument(skip(db, changes))]
pub async fn write_property<C>(
    db: &C,
    property_id: i64,
    changes: property::ActiveModel,
) -> Result<property::Model>
where
    C: ConnectionTrait,
{
    fields::ensure_writable(&changes)?;

    let mut model: property::ActiveModel = find_existing(db, property_id).await?.into();
    for meta in &fields::PROPERTY_FIELDS {
        if let ActiveValue::Set(value) = changes.get(meta.column) {
            model.set(meta.column, value);
        }
    }
    model.refresh_search_keys();
    fields::validate(&model)?;
    model.updated_at = Set(Utc::now().naive_utc());

    let updated = model.update(db).await?;
    debug!(id = updated.id, "Updated property '{}'", updated.display_name());
    Ok(updated)
}

async fn set_active(
    db: &DatabaseConnection,
    property_id: i64,
    is_active: bool,
) -> Result<property::Model> {
    let mut model: property::ActiveModel = find_existing(db, property_id).await?.into();
    model.is_active = Set(is_active);
    model.updated_at = Set(Utc::now().naive_utc());
    model.update(db).await.map_err(Into::into)
}

/// Archives a property: it disappears from default listings but keeps all its data.
#[instrument(skip(db))]
pub async fn archive_property(
    db: &DatabaseConnection,
    property_id: i64,
) -> Result<property::Model> {
    let archived = set_active(db, property_id, false).await?;
    info!(id = property_id, "Archived property");
    Ok(archived)
}

/// Restores an archived property to the default listings.
#[instrument(skip(db))]
pub async fn unarchive_property(
    db: &DatabaseConnection,
    property_id: i64,
) -> Result<property::Model> {
    let restored = set_active(db, property_id, true).await?;
    info!(id = property_id, "Unarchived property");
    Ok(restored)
}

/// Duplicates a property under a new ID.
///
/// Fields marked as not copied (availability date, selling price and status) are
/// reset to their defaults, computed against the duplication date.
///
/// # Errors
/// Returns an error if the source property does not exist or the insert fails.
#[instrument(skip(db))]
pub async fn duplicate_property(
    db: &DatabaseConnection,
    property_id: i64,
) -> Result<property::Model> {
    let source = find_existing(db, property_id).await?;
    let now = Utc::now().naive_utc();

    let mut copy = property::ActiveModel {
        title: Set(source.title),
        description: Set(source.description),
        postcode: Set(source.postcode),
        availability_date: Set(source.availability_date),
        expected_price: Set(source.expected_price),
        selling_price: Set(source.selling_price),
        bedrooms: Set(source.bedrooms),
        living_area_sqm: Set(source.living_area_sqm),
        facade_count: Set(source.facade_count),
        has_garage: Set(source.has_garage),
        has_garden: Set(source.has_garden),
        garden_area_sqm: Set(source.garden_area_sqm),
        garden_orientation: Set(source.garden_orientation),
        is_active: Set(source.is_active),
        status: Set(source.status),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    copy.refresh_search_keys();
    fields::reset_uncopied(&mut copy, now.date())?;
    fields::validate(&copy)?;

    let duplicated = copy.insert(db).await?;
    info!(
        source = property_id,
        id = duplicated.id,
        "Duplicated property '{}'",
        duplicated.display_name()
    );
    Ok(duplicated)
}

/// Records the final selling price of a property.
///
/// This is the only write path for `selling_price`; it is meant for the offer
/// workflow that accepts a sale and leaves `status` untouched.
///
/// # Errors
/// Returns an error if the price is NaN or infinite, the property does not exist,
/// or the database update fails.
#[instrument(skip(db))]
pub async fn record_selling_price<C>(
    db: &C,
    property_id: i64,
    selling_price: f64,
) -> Result<property::Model>
where
    C: ConnectionTrait,
{
    if !selling_price.is_finite() {
        return Err(Error::InvalidAmount {
            field: "selling_price",
            amount: selling_price,
        });
    }

    let mut model: property::ActiveModel = find_existing(db, property_id).await?.into();
    model.selling_price = Set(Some(selling_price));
    model.updated_at = Set(Utc::now().naive_utc());

    let updated = model.update(db).await?;
    info!(id = property_id, selling_price, "Recorded selling price");
    Ok(updated)
}

/// Inserts seed listings whose title does not exist yet (archived properties count).
///
/// All inserts run in a single transaction. Returns the number of properties created.
#[instrument(skip_all, fields(count = listings.len()))]
pub async fn seed_properties(db: &DatabaseConnection, listings: &[NewProperty]) -> Result<usize> {
    info!(
        "Starting to seed properties. Found {} listings in configuration.",
        listings.len()
    );
    let txn = db.begin().await?;
    let mut created = 0;

    for listing in listings {
        let title = listing.title.trim();
        let existing = Property::find()
            .filter(property::Column::Title.eq(title))
            .one(&txn)
            .await?;
        if existing.is_some() {
            debug!("Property '{}' already exists. Skipping.", title);
            continue;
        }

        create_property(&txn, listing.clone()).await?;
        created += 1;
    }

    txn.commit().await?;
    info!("Finished seeding properties: {} created.", created);
    Ok(created)
}
