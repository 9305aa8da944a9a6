//! Bootstrap administrator from environment variables.
//!
//! Lets a fresh deployment be signed into without editing `config.toml`. The
//! account is only created when the users table is empty; see
//! [`crate::config::defaults::seed_defaults`].

use crate::{config::defaults::SeedUser, core::access::Role};

/// Reads `ADMIN_NAME`, `ADMIN_EMAIL` and `ADMIN_PASSWORD`.
///
/// Returns `None` unless all three are set and non-empty.
#[must_use]
pub fn bootstrap_admin() -> Option<SeedUser> {
    bootstrap_admin_from(|key| std::env::var(key).ok())
}

fn bootstrap_admin_from<F>(lookup: F) -> Option<SeedUser>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    Some(SeedUser {
        name: read("ADMIN_NAME")?,
        email: read("ADMIN_EMAIL")?,
        role: Role::Admin,
        password: Some(read("ADMIN_PASSWORD")?),
    })
}
