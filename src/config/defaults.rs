//! Initial settings and users loaded from `config.toml`.
//!
//! The file is only used to seed an empty store: settings are written when no
//! settings row exists, and users when the users table is empty. Afterwards
//! the store is authoritative and the file is ignored.
//!
//! ```toml
//! [settings]
//! company_name = "Kedai Runcit"
//! default_tax_rate = 6.0
//! currency_symbol = "RM"
//!
//! [[users]]
//! name = "Amir"
//! email = "amir@example.com"
//! role = "admin"
//! password = "change-me"
//! ```

use crate::{
    core::{access::Role, persistence, settings::AppSettings, user::User},
    entities::{Settings, User as UserEntity},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Location of the seed file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings written on first run
    pub settings: AppSettings,
    /// Users created on first run
    pub users: Vec<SeedUser>,
}

/// A user entry in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedUser {
    /// Display name
    pub name: String,
    /// E-mail address
    pub email: String,
    /// Access role
    pub role: Role,
    /// Initial password; without one the user cannot sign in
    #[serde(default)]
    pub password: Option<String>,
}

impl From<&SeedUser> for User {
    fn from(seed: &SeedUser) -> Self {
        Self::new(&seed.name, &seed.email, seed.role, seed.password.as_deref())
    }
}

/// Loads seed configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads `path`, or built-in defaults if the file does not exist.
///
/// A file that exists but cannot be parsed is still an error.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Config> {
    if path.as_ref().exists() {
        load_config(path)
    } else {
        warn!(
            "{} not found, using built-in defaults",
            path.as_ref().display()
        );
        Ok(Config::default())
    }
}

/// Seeds an empty store from `config`.
///
/// `bootstrap_admin` is added to the configured users when the users table is
/// empty. Returns the number of users created.
pub async fn seed_defaults(
    db: &DatabaseConnection,
    config: &Config,
    bootstrap_admin: Option<SeedUser>,
) -> Result<usize> {
    if Settings::find().count(db).await? == 0 {
        persistence::upsert_settings(db, &config.settings).await?;
        info!("Seeded settings for {}", config.settings.company_name);
    }

    if UserEntity::find().count(db).await? > 0 {
        return Ok(0);
    }

    let users: Vec<User> = config
        .users
        .iter()
        .chain(bootstrap_admin.as_ref())
        .map(User::from)
        .collect();
    if users.is_empty() {
        warn!("No users configured; nobody will be able to sign in");
        return Ok(0);
    }

    persistence::upsert_users(db, &users).await?;
    info!("Seeded {} users", users.len());
    Ok(users.len())
}
