//! Company settings - the singleton record printed on every document.

use crate::entities::settings;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// Key under which the single settings row is stored.
pub const SETTINGS_ROW_ID: i32 = 1;

/// Company-wide settings.
///
/// Exactly one instance exists per deployment. Saving replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Company name printed on documents
    pub company_name: String,
    /// Company postal address
    pub company_address: String,
    /// Company e-mail address
    pub company_email: String,
    /// Company tax identification number
    pub company_tax_id: String,
    /// Tax rate given to new documents, in percent
    pub default_tax_rate: f64,
    /// Currency symbol given to new documents
    pub currency_symbol: String,
    /// Reference to an uploaded logo
    pub logo_url: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            company_name: "My Company".to_string(),
            company_address: String::new(),
            company_email: String::new(),
            company_tax_id: String::new(),
            default_tax_rate: 0.0,
            currency_symbol: "$".to_string(),
            logo_url: None,
        }
    }
}

impl From<settings::Model> for AppSettings {
    fn from(model: settings::Model) -> Self {
        Self {
            company_name: model.company_name,
            company_address: model.company_address,
            company_email: model.company_email,
            company_tax_id: model.company_tax_id,
            default_tax_rate: model.default_tax_rate,
            currency_symbol: model.currency_symbol,
            logo_url: model.logo_url,
        }
    }
}

impl From<&AppSettings> for settings::ActiveModel {
    fn from(value: &AppSettings) -> Self {
        Self {
            id: Set(SETTINGS_ROW_ID),
            company_name: Set(value.company_name.clone()),
            company_address: Set(value.company_address.clone()),
            company_email: Set(value.company_email.clone()),
            company_tax_id: Set(value.company_tax_id.clone()),
            default_tax_rate: Set(value.default_tax_rate),
            currency_symbol: Set(value.currency_symbol.clone()),
            logo_url: Set(value.logo_url.clone()),
        }
    }
}
