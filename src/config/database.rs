//! Database configuration for the invoice desk.
//!
//! Handles the `SQLite` connection and table creation with `SeaORM`. Tables are
//! generated from the entity definitions via `Schema::create_table_from_entity`
//! and created only if they do not exist yet, so startup is idempotent.

use crate::entities::{Document, LineItem, Settings, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::debug;

/// Database used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/invoice_desk.sqlite?mode=rwc";

/// Gets the database URL from `DATABASE_URL`, falling back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Connects to the database named by [`get_database_url`].
///
/// The parent directory of a file-backed `SQLite` URL is created first.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(dir) = sqlite_parent_dir(&database_url) {
        tokio::fs::create_dir_all(dir).await?;
    }

    Database::connect(&database_url).await.map_err(Into::into)
}

// "sqlite://data/x.sqlite?mode=rwc" -> "data"
fn sqlite_parent_dir(url: &str) -> Option<&str> {
    let path = url.strip_prefix("sqlite://")?;
    let path = path.split('?').next()?;
    let (dir, _) = path.rsplit_once('/')?;
    (!dir.is_empty()).then_some(dir)
}

/// Creates the settings, users, documents and line item tables if missing.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    create_table(db, Settings).await?;
    create_table(db, User).await?;
    create_table(db, Document).await?;
    create_table(db, LineItem).await?;
    debug!("Database tables ready");
    Ok(())
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();

    db.execute(builder.build(&table)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DocumentModel, LineItemModel, SettingsModel, UserModel};
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<DocumentModel> = Document::find().limit(1).all(&db).await?;
        let _: Vec<LineItemModel> = LineItem::find().limit(1).all(&db).await?;
        let _: Vec<SettingsModel> = Settings::find().limit(1).all(&db).await?;
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_twice_is_harmless() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[test]
    fn test_sqlite_parent_dir() {
        assert_eq!(sqlite_parent_dir(DEFAULT_DATABASE_URL), Some("data"));
        assert_eq!(sqlite_parent_dir("sqlite://local.sqlite"), None);
        assert_eq!(sqlite_parent_dir("sqlite::memory:"), None);
        assert_eq!(
            sqlite_parent_dir("sqlite:///var/lib/desk/db.sqlite"),
            Some("/var/lib/desk")
        );
    }
}
