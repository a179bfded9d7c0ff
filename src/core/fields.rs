//! Declarative field metadata for the property schema.
//!
//! Each writable column of [`property::Model`] is described once in
//! [`PROPERTY_FIELDS`]: its label and help text, whether it is required, whether it
//! survives duplication, whether callers may write it, its size limit and its default.
//! Validation, default filling and copy-reset all walk this table instead of
//! hard-coding per-field checks.

use crate::{
    entities::property::{self, POSTCODE_MAX_LEN, PropertyState},
    errors::{Error, Result},
};
use chrono::{Months, NaiveDate};
use sea_orm::{ActiveEnum, ActiveModelTrait, Value};

/// Default applied to a field when a record is created without a value for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// No default; the column stays NULL
    None,
    /// A fixed integer
    Integer(i32),
    /// A fixed flag
    Boolean(bool),
    /// A fixed sales status
    State(PropertyState),
    /// A date this many months after the record's creation date
    MonthsAfterCreation(u32),
}

/// Metadata for a single property field
#[derive(Debug, Clone, Copy)]
pub struct FieldMeta {
    /// Entity column the metadata applies to
    pub column: property::Column,
    /// Column name, as stored
    pub name: &'static str,
    /// Label shown to users
    pub label: &'static str,
    /// Contextual help text
    pub help: &'static str,
    /// A record cannot be written without a non-blank value
    pub required: bool,
    /// The value is carried over when a record is duplicated
    pub copy: bool,
    /// Only internal logic may write the value
    pub readonly: bool,
    /// Maximum length in characters, for string fields
    pub size: Option<usize>,
    /// Value used when a record is created without one
    pub default: FieldDefault,
}

impl FieldMeta {
    const fn new(
        column: property::Column,
        name: &'static str,
        label: &'static str,
        help: &'static str,
    ) -> Self {
        Self {
            column,
            name,
            label,
            help,
            required: false,
            copy: true,
            readonly: false,
            size: None,
            default: FieldDefault::None,
        }
    }

    const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    const fn no_copy(self) -> Self {
        Self {
            copy: false,
            ..self
        }
    }

    const fn readonly(self) -> Self {
        Self {
            readonly: true,
            ..self
        }
    }

    const fn size(self, max: usize) -> Self {
        Self {
            size: Some(max),
            ..self
        }
    }

    const fn default(self, default: FieldDefault) -> Self {
        Self { default, ..self }
    }
}

/// Months between creation and the default availability date
pub const AVAILABILITY_DELAY_MONTHS: u32 = 3;

/// Metadata for every user-facing property field, in form order.
pub static PROPERTY_FIELDS: [FieldMeta; 15] = [
    FieldMeta::new(
        property::Column::Title,
        "title",
        "Title",
        "Enter the property title",
    )
    .required(),
    FieldMeta::new(
        property::Column::Description,
        "description",
        "Description",
        "Detailed description of the property",
    ),
    FieldMeta::new(
        property::Column::Postcode,
        "postcode",
        "Postcode",
        "Postal code of the property location",
    )
    .size(POSTCODE_MAX_LEN),
    FieldMeta::new(
        property::Column::AvailabilityDate,
        "availability_date",
        "Available From",
        "Date when the property becomes available",
    )
    .no_copy()
    .default(FieldDefault::MonthsAfterCreation(AVAILABILITY_DELAY_MONTHS)),
    FieldMeta::new(
        property::Column::ExpectedPrice,
        "expected_price",
        "Expected Price",
        "Expected selling price in company currency",
    )
    .required(),
    FieldMeta::new(
        property::Column::SellingPrice,
        "selling_price",
        "Selling Price",
        "Final selling price (filled automatically when offer accepted)",
    )
    .readonly()
    .no_copy(),
    FieldMeta::new(
        property::Column::Bedrooms,
        "bedrooms",
        "Bedrooms",
        "Number of bedrooms",
    )
    .default(FieldDefault::Integer(2)),
    FieldMeta::new(
        property::Column::LivingAreaSqm,
        "living_area_sqm",
        "Living Area (sqm)",
        "Living area in square meters",
    ),
    FieldMeta::new(
        property::Column::FacadeCount,
        "facade_count",
        "Facades",
        "Number of facades",
    ),
    FieldMeta::new(
        property::Column::HasGarage,
        "has_garage",
        "Garage",
        "Does the property have a garage?",
    )
    .default(FieldDefault::Boolean(false)),
    FieldMeta::new(
        property::Column::HasGarden,
        "has_garden",
        "Garden",
        "Does the property have a garden?",
    )
    .default(FieldDefault::Boolean(false)),
    FieldMeta::new(
        property::Column::GardenAreaSqm,
        "garden_area_sqm",
        "Garden Area (sqm)",
        "Garden area in square meters",
    ),
    FieldMeta::new(
        property::Column::GardenOrientation,
        "garden_orientation",
        "Garden Orientation",
        "Orientation of the garden",
    ),
    FieldMeta::new(
        property::Column::IsActive,
        "is_active",
        "Active",
        "Uncheck to archive the property (won't be visible in normal views)",
    )
    .default(FieldDefault::Boolean(true)),
    FieldMeta::new(
        property::Column::Status,
        "status",
        "Status",
        "Status of the property in the sales process",
    )
    .required()
    .no_copy()
    .default(FieldDefault::State(PropertyState::New)),
];

/// Default availability date for a record created on `created_on`.
///
/// Month arithmetic clamps to the end of the target month, so a record created on
/// November 30th becomes available on the last day of February.
pub fn default_availability_date(created_on: NaiveDate) -> Result<NaiveDate> {
    months_after(created_on, AVAILABILITY_DELAY_MONTHS)
}

fn months_after(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| Error::InvalidDate {
            message: format!("{date} + {months} months is out of range"),
        })
}

/// Computes the default value of a field for a record created on `created_on`.
///
/// Returns `None` for fields without a default.
pub fn default_value(meta: &FieldMeta, created_on: NaiveDate) -> Result<Option<Value>> {
    let value = match meta.default {
        FieldDefault::None => None,
        FieldDefault::Integer(n) => Some(Value::from(n)),
        FieldDefault::Boolean(b) => Some(Value::from(b)),
        FieldDefault::State(state) => Some(Value::from(state.to_value())),
        FieldDefault::MonthsAfterCreation(months) => {
            Some(Value::from(months_after(created_on, months)?))
        }
    };
    Ok(value)
}

/// Fills every field the caller left unset with its declared default.
pub fn apply_defaults(model: &mut property::ActiveModel, created_on: NaiveDate) -> Result<()> {
    for meta in &PROPERTY_FIELDS {
        if model.get(meta.column).is_set() {
            continue;
        }
        if let Some(value) = default_value(meta, created_on)? {
            model.set(meta.column, value);
        }
    }
    Ok(())
}

/// Resets every copy-excluded field to its default, or to unset when it has none.
///
/// Used on a record being duplicated, after its values were copied from the source.
pub fn reset_uncopied(model: &mut property::ActiveModel, created_on: NaiveDate) -> Result<()> {
    for meta in PROPERTY_FIELDS.iter().filter(|meta| !meta.copy) {
        match default_value(meta, created_on)? {
            Some(value) => model.set(meta.column, value),
            None => model.not_set(meta.column),
        }
    }
    Ok(())
}

/// Rejects writes to read-only fields.
pub fn ensure_writable(model: &property::ActiveModel) -> Result<()> {
    match PROPERTY_FIELDS
        .iter()
        .find(|meta| meta.readonly && model.get(meta.column).is_set())
    {
        Some(meta) => Err(Error::ReadOnlyField { field: meta.name }),
        None => Ok(()),
    }
}

/// Checks a record against the field metadata before it is written.
///
/// # Errors
/// - [`Error::MissingRequired`] when a required field is unset, NULL or blank
/// - [`Error::FieldTooLong`] when a sized string exceeds its limit
/// - [`Error::InvalidAmount`] when a floating-point field is NaN or infinite
pub fn validate(model: &property::ActiveModel) -> Result<()> {
    for meta in &PROPERTY_FIELDS {
        let value = model.get(meta.column).into_value();

        if meta.required && value.as_ref().is_none_or(is_blank) {
            return Err(Error::MissingRequired { field: meta.name });
        }

        match value {
            Some(Value::String(Some(text))) => {
                if let Some(max) = meta.size {
                    let len = text.chars().count();
                    if len > max {
                        return Err(Error::FieldTooLong {
                            field: meta.name,
                            max,
                            len,
                        });
                    }
                }
            }
            Some(Value::Double(Some(amount))) if !amount.is_finite() => {
                return Err(Error::InvalidAmount {
                    field: meta.name,
                    amount,
                });
            }
            _ => {}
        }
    }
    Ok(())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::String(text) => text.as_deref().is_none_or(|s| s.trim().is_empty()),
        Value::Double(v) => v.is_none(),
        Value::Int(v) => v.is_none(),
        Value::BigInt(v) => v.is_none(),
        Value::Bool(v) => v.is_none(),
        Value::ChronoDate(v) => v.is_none(),
        Value::ChronoDateTime(v) => v.is_none(),
        _ => false,
    }
}
