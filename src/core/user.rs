//! Staff users and their roles.

use crate::{
    core::access::Role,
    entities::user,
    errors::{Error, Result},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A member of staff who can sign in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// Display name, accepted as a login identifier
    pub name: String,
    /// E-mail address, accepted as a login identifier
    pub email: String,
    /// Access role
    pub role: Role,
    /// Plaintext password, if set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// `Some(false)` disables the account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl User {
    /// Creates an active user with a fresh id.
    #[must_use]
    pub fn new(name: &str, email: &str, role: Role, password: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            password: password.map(ToString::to_string),
            active: None,
        }
    }

    /// Absent or `true` means active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }

    /// Copy of the user without the password, as kept in the session blob.
    #[must_use]
    pub fn without_password(&self) -> Self {
        Self {
            password: None,
            ..self.clone()
        }
    }
}

impl TryFrom<user::Model> for User {
    type Error = Error;

    fn try_from(model: user::Model) -> Result<Self> {
        let role = Role::parse(&model.role).ok_or_else(|| Error::InvalidStoredValue {
            field: "users.role",
            value: model.role.clone(),
        })?;

        Ok(Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role,
            password: model.password,
            active: model.active,
        })
    }
}

impl From<&User> for user::ActiveModel {
    fn from(value: &User) -> Self {
        Self {
            id: Set(value.id.clone()),
            name: Set(value.name.clone()),
            email: Set(value.email.clone()),
            role: Set(value.role.as_str().to_string()),
            password: Set(value.password.clone()),
            active: Set(value.active),
        }
    }
}
