//! User entity - The staff roster.
//!
//! Passwords are stored as entered and compared by equality when signing in.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name, also accepted as a login identifier
    pub name: String,
    /// E-mail address, also accepted as a login identifier
    pub email: String,
    /// `"admin"`, `"editor"` or `"viewer"`
    pub role: String,
    /// Plaintext password, if one has been set
    pub password: Option<String>,
    /// `Some(false)` disables the account; absent means active
    pub active: Option<bool>,
}

/// `User` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
