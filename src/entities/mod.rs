//! Entity module - Contains the SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod property;

// Re-export specific types to avoid conflicts
pub use property::{
    Column as PropertyColumn, Entity as Property, GardenOrientation, Model as PropertyModel,
    PropertyState,
};
