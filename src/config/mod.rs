/// Database configuration and connection management
pub mod database;

/// Seed settings and users from config.toml
pub mod defaults;

/// Session file location from environment variables
pub mod session;

/// Bootstrap administrator from environment variables
pub mod users;
