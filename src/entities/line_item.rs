//! Line item entity - The billable rows of a document.
//!
//! Keyed by `(document_id, id)`: item ids only need to be unique within a
//! document. `position` keeps the display order the editor produced.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Line item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "line_items")]
pub struct Model {
    /// Owning document
    #[sea_orm(primary_key, auto_increment = false)]
    pub document_id: String,
    /// Item id generated by the editor, unique within its document
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Zero-based display position
    pub position: i32,
    /// What is being billed
    pub description: String,
    /// Number of units
    pub quantity: f64,
    /// Price per unit
    pub rate: f64,
}

/// Defines relationships between `LineItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line item belongs to one document
    #[sea_orm(
        belongs_to = "super::document::Entity",
        from = "Column::DocumentId",
        to = "super::document::Column::Id"
    )]
    Document,
}

impl Related<super::document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Document.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
