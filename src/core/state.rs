//! In-memory mirror of the store.
//!
//! [`AppState`] is passed explicitly to whoever needs it. After any write the
//! owner calls [`AppState::refresh`] so that lists and reports reflect the store.

use crate::{
    core::{
        document::{DocumentKind, FinancialDocument, suggest_number},
        persistence::{self, Snapshot},
        report::{DateRange, DocumentReport, generate_report},
        settings::AppSettings,
        user::User,
    },
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing::{debug, instrument};

/// Settings, users and documents as last fetched from the store.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Company settings
    pub settings: AppSettings,
    /// All users, ordered by name
    pub users: Vec<User>,
    /// All invoices, newest first
    pub invoices: Vec<FinancialDocument>,
    /// All quotations, newest first
    pub quotations: Vec<FinancialDocument>,
}

impl From<Snapshot> for AppState {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            settings: snapshot.settings,
            users: snapshot.users,
            invoices: snapshot.invoices,
            quotations: snapshot.quotations,
        }
    }
}

impl AppState {
    /// Fetches everything from the store.
    pub async fn load(db: &DatabaseConnection) -> Result<Self> {
        persistence::fetch_all(db).await.map(Into::into)
    }

    /// Re-fetches everything, replacing the current contents.
    ///
    /// On error the previous contents are kept.
    #[instrument(skip(self, db))]
    pub async fn refresh(&mut self, db: &DatabaseConnection) -> Result<()> {
        *self = Self::load(db).await?;
        debug!(
            "State refreshed: {} invoices, {} quotations",
            self.invoices.len(),
            self.quotations.len()
        );
        Ok(())
    }

    /// Documents of one kind, newest first.
    #[must_use]
    pub fn documents(&self, kind: DocumentKind) -> &[FinancialDocument] {
        match kind {
            DocumentKind::Invoice => &self.invoices,
            DocumentKind::Quotation => &self.quotations,
        }
    }

    /// Looks up a stored document by id.
    #[must_use]
    pub fn find_document(&self, kind: DocumentKind, id: &str) -> Option<&FinancialDocument> {
        self.documents(kind)
            .iter()
            .find(|doc| doc.id.as_persisted() == Some(id))
    }

    /// A fresh draft with defaults from the settings and the next free number.
    #[must_use]
    pub fn new_document(&self, kind: DocumentKind, today: NaiveDate) -> FinancialDocument {
        let mut doc = FinancialDocument::new(kind, &self.settings, today);
        doc.number = suggest_number(kind, self.documents(kind));
        doc
    }

    /// Invoice report for the given range.
    #[must_use]
    pub fn invoice_report(&self, range: DateRange) -> DocumentReport {
        generate_report(&self.invoices, range)
    }

    /// Quotation report for the given range.
    #[must_use]
    pub fn quotation_report(&self, range: DateRange) -> DocumentReport {
        generate_report(&self.quotations, range)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::persistence::upsert_document;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_refresh_picks_up_new_documents() -> Result<()> {
        let db = setup_test_db().await?;
        let mut state = AppState::load(&db).await?;
        assert!(state.invoices.is_empty());

        let id = upsert_document(
            &db,
            &sample_document(DocumentKind::Invoice, "Acme", "2024-01-10", &[(1.0, 100.0)]),
        )
        .await?;
        assert!(state.find_document(DocumentKind::Invoice, &id).is_none());

        state.refresh(&db).await?;
        let found = state.find_document(DocumentKind::Invoice, &id).unwrap();
        assert_eq!(found.client_name, "Acme");
        assert!(state.find_document(DocumentKind::Quotation, &id).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_new_document_suggests_next_number() -> Result<()> {
        let db = setup_test_db().await?;
        let first = sample_document(DocumentKind::Quotation, "A", "2024-01-10", &[]);
        upsert_document(&db, &first).await?;
        let state = AppState::load(&db).await?;

        let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let draft = state.new_document(DocumentKind::Quotation, today);

        assert_eq!(draft.number, "QUO-0002");
        assert_eq!(draft.issue_date, today);
        assert!(!draft.id.is_persisted());
        Ok(())
    }

    #[tokio::test]
    async fn test_invoice_report_uses_invoices_only() -> Result<()> {
        let db = setup_test_db().await?;
        for (kind, issued) in [
            (DocumentKind::Invoice, "2024-01-05"),
            (DocumentKind::Quotation, "2024-01-06"),
            (DocumentKind::Invoice, "2024-02-01"),
        ] {
            upsert_document(&db, &sample_document(kind, "C", issued, &[(1.0, 10.0)])).await?;
        }
        let state = AppState::load(&db).await?;

        let january = DateRange::month_of(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());
        let report = state.invoice_report(january);
        assert_eq!(report.count, 1);
        assert_eq!(report.total_amount, 10.0);

        assert_eq!(state.quotation_report(january).count, 1);
        Ok(())
    }
}
