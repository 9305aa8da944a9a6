//! Settings entity - The single company settings row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Settings database model - always stored under id 1
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    /// Fixed singleton key
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// Company name printed on documents
    pub company_name: String,
    /// Company postal address
    pub company_address: String,
    /// Company e-mail address
    pub company_email: String,
    /// Company tax identification number
    pub company_tax_id: String,
    /// Tax rate applied to new documents, in percent
    pub default_tax_rate: f64,
    /// Currency symbol applied to new documents
    pub currency_symbol: String,
    /// Reference to an uploaded logo
    pub logo_url: Option<String>,
}

/// `Settings` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
