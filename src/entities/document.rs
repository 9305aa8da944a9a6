//! Document entity - One row per invoice or quotation.
//!
//! Invoices and quotations share a table and are told apart by `kind`.
//! Totals are never stored; they are derived from the line items.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Document database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    /// UUID assigned on first save
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// `"invoice"` or `"quotation"`
    pub kind: String,
    /// Human-readable number, free text
    pub number: String,
    /// Status string, valid for `kind`
    pub status: String,
    /// Date the document was issued
    pub issue_date: Date,
    /// Due date (invoices) or valid-until date (quotations)
    pub secondary_date: Date,
    /// Client name
    pub client_name: String,
    /// Client postal address
    pub client_address: String,
    /// Client e-mail address
    pub client_email: String,
    /// Currency unit shown next to amounts
    pub currency: String,
    /// Tax rate in percent
    pub tax_rate: f64,
    /// Free-form notes
    pub notes: String,
    /// Payment or acceptance terms
    pub terms: String,
    /// When the row was first written
    pub created_at: DateTimeUtc,
    /// When the row was last overwritten
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Document and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One document has many line items
    #[sea_orm(has_many = "super::line_item::Entity")]
    LineItems,
}

impl Related<super::line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
