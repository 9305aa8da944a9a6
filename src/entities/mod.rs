//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod document;
pub mod line_item;
pub mod settings;
pub mod user;

// Re-export specific types to avoid conflicts
pub use document::{Column as DocumentColumn, Entity as Document, Model as DocumentModel};
pub use line_item::{Column as LineItemColumn, Entity as LineItem, Model as LineItemModel};
pub use settings::{Column as SettingsColumn, Entity as Settings, Model as SettingsModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
