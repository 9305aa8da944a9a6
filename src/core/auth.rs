//! Sign-in checks against the user roster.
//!
//! A login identifier matches a user's name or e-mail exactly, and the password
//! must equal the stored one. A disabled account is only reported as disabled
//! once the credentials themselves match.

use crate::{
    core::user::User,
    entities::{User as UserEntity, user},
    errors::Result,
};
use sea_orm::{Condition, prelude::*};
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Why a sign-in attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    /// No user matches the identifier and password
    #[error("Invalid username/email or password")]
    InvalidCredentials,
    /// The credentials match an account that has been disabled
    #[error("This account has been disabled")]
    AccountDisabled,
}

/// Checks credentials against an in-memory roster.
///
/// # Errors
/// Returns [`AuthFailure::InvalidCredentials`] when no user has this name or
/// e-mail together with this password, and [`AuthFailure::AccountDisabled`] when
/// the matching user is inactive.
pub fn authenticate(
    users: &[User],
    identifier: &str,
    password: &str,
) -> std::result::Result<User, AuthFailure> {
    let user = users
        .iter()
        .find(|u| {
            (u.name == identifier || u.email == identifier)
                && u.password.as_deref() == Some(password)
        })
        .ok_or(AuthFailure::InvalidCredentials)?;

    if user.is_active() {
        Ok(user.clone())
    } else {
        Err(AuthFailure::AccountDisabled)
    }
}

/// Checks credentials with a filtered lookup in the users table.
///
/// # Errors
/// Returns [`crate::errors::Error::Auth`] when the credentials are refused, or a
/// database error if the lookup fails.
#[instrument(skip(db, password))]
pub async fn authenticate_in_store(
    db: &DatabaseConnection,
    identifier: &str,
    password: &str,
) -> Result<User> {
    let row = UserEntity::find()
        .filter(
            Condition::any()
                .add(user::Column::Name.eq(identifier))
                .add(user::Column::Email.eq(identifier)),
        )
        .filter(user::Column::Password.eq(password))
        .one(db)
        .await?;

    let Some(row) = row else {
        warn!("Rejected sign-in: invalid credentials");
        return Err(AuthFailure::InvalidCredentials.into());
    };

    let signed_in = User::try_from(row)?;
    if !signed_in.is_active() {
        warn!("Rejected sign-in for disabled account {}", signed_in.id);
        return Err(AuthFailure::AccountDisabled.into());
    }

    info!("User {} signed in as {}", signed_in.name, signed_in.role);
    Ok(signed_in)
}
