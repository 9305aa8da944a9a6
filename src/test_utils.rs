//! Shared test utilities for the invoice desk.
//!
//! Helpers for setting up test databases and building documents and users
//! with sensible defaults.

use crate::{
    core::{
        access::Role,
        document::{DocumentField, DocumentKind, FinancialDocument, LineItemField},
        settings::AppSettings,
        user::User,
    },
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds an unsaved document with default settings.
///
/// # Arguments
/// * `kind` - Invoice or quotation
/// * `client` - Client name
/// * `issue_date` - Issue date as `YYYY-MM-DD`
/// * `lines` - `(quantity, rate)` per line item; an empty slice keeps the
///   single blank item
#[allow(clippy::missing_panics_doc)]
pub fn sample_document(
    kind: DocumentKind,
    client: &str,
    issue_date: &str,
    lines: &[(f64, f64)],
) -> FinancialDocument {
    let today = chrono::NaiveDate::parse_from_str(issue_date, "%Y-%m-%d")
        .unwrap_or_else(|e| panic!("bad test date {issue_date}: {e}"));
    let mut doc = FinancialDocument::new(kind, &AppSettings::default(), today);
    doc.set_field(DocumentField::ClientName, client);

    for (index, (quantity, rate)) in lines.iter().enumerate() {
        let item_id = if index == 0 {
            doc.items()[0].id.clone()
        } else {
            doc.add_line_item()
        };
        doc.update_line_item(&item_id, LineItemField::Description, &format!("Line {}", index + 1));
        doc.update_line_item(&item_id, LineItemField::Quantity, &quantity.to_string());
        doc.update_line_item(&item_id, LineItemField::Rate, &rate.to_string());
    }
    doc
}

/// Creates an active user with a derived e-mail and password `"pw"`.
pub fn test_user(name: &str, role: Role) -> User {
    let email = format!("{}@example.com", name.to_lowercase());
    User::new(name, &email, role, Some("pw"))
}
