//! Core business logic - framework-agnostic property operations.

/// Declarative field metadata: defaults, required fields, copy rules
pub mod fields;
/// Property creation, updates, archiving and duplication
pub mod property;
/// Display names and name-or-postcode search
pub mod search;

pub use property::{
    NewProperty, PropertyUpdate, archive_property, create_property, duplicate_property,
    get_property_by_id, list_all_properties, list_properties, record_selling_price,
    seed_properties, unarchive_property, update_property, write_property,
};
pub use search::{NameSearch, SearchOperator, display_names, name_search, name_search_labels};
