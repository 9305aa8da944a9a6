//! Financial document model - invoices and quotations.
//!
//! A [`FinancialDocument`] is the in-memory draft the editor mutates. It always
//! holds at least one [`LineItem`], keeps items in insertion order, and knows
//! whether it has been saved through [`DocumentId`] rather than by guessing from
//! the shape of its identifier.

use crate::{
    core::{
        money::{Totals, calculate_totals},
        settings::AppSettings,
    },
    entities::{document, line_item},
    errors::{Error, Result},
};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use uuid::Uuid;

/// Days between issue date and due / valid-until date on a new document.
pub const DEFAULT_TERM_DAYS: u64 = 30;

/// Which kind of financial document this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// A request for payment
    Invoice,
    /// A priced offer the client can accept or reject
    Quotation,
}

impl DocumentKind {
    /// Returns the stored name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Quotation => "quotation",
        }
    }

    /// Parses a stored kind name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "invoice" => Some(Self::Invoice),
            "quotation" => Some(Self::Quotation),
            _ => None,
        }
    }

    /// Prefix used when suggesting document numbers.
    #[must_use]
    pub const fn number_prefix(self) -> &'static str {
        match self {
            Self::Invoice => "INV",
            Self::Quotation => "QUO",
        }
    }

    /// Statuses a document of this kind may carry.
    #[must_use]
    pub const fn statuses(self) -> &'static [DocumentStatus] {
        match self {
            Self::Invoice => &[
                DocumentStatus::Draft,
                DocumentStatus::Pending,
                DocumentStatus::Paid,
            ],
            Self::Quotation => &[
                DocumentStatus::Draft,
                DocumentStatus::Sent,
                DocumentStatus::Accepted,
                DocumentStatus::Rejected,
            ],
        }
    }

    /// Whether `status` belongs to this kind.
    #[must_use]
    pub fn allows(self, status: DocumentStatus) -> bool {
        self.statuses().contains(&status)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invoice => f.write_str("Invoice"),
            Self::Quotation => f.write_str("Quotation"),
        }
    }
}

/// Lifecycle status of a document.
///
/// Any status of a kind is reachable from any other status of that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Still being prepared
    Draft,
    /// Invoice issued, awaiting payment
    Pending,
    /// Invoice settled
    Paid,
    /// Quotation sent to the client
    Sent,
    /// Quotation accepted by the client
    Accepted,
    /// Quotation declined by the client
    Rejected,
}

impl DocumentStatus {
    /// Returns the stored name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Sent => "sent",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a stored status name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "sent" => Some(Self::Sent),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a document exists in the store yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentId {
    /// Created locally, never saved
    Draft,
    /// Saved under this id
    Persisted(String),
}

impl DocumentId {
    /// The stored id, if any.
    #[must_use]
    pub fn as_persisted(&self) -> Option<&str> {
        match self {
            Self::Draft => None,
            Self::Persisted(id) => Some(id),
        }
    }

    /// Whether the document has been saved at least once.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted(_))
    }
}

/// One billable row of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique within the document
    pub id: String,
    /// What is being billed
    pub description: String,
    /// Number of units
    pub quantity: f64,
    /// Price per unit
    pub rate: f64,
}

impl LineItem {
    /// A fresh item with a new id, empty description, quantity 1 and rate 0.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description: String::new(),
            quantity: 1.0,
            rate: 0.0,
        }
    }

    /// `quantity * rate`
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.quantity * self.rate
    }
}

impl From<line_item::Model> for LineItem {
    fn from(model: line_item::Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            quantity: model.quantity,
            rate: model.rate,
        }
    }
}

/// Editable fields of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineItemField {
    /// Free text
    Description,
    /// Parsed as a number, 0 on failure
    Quantity,
    /// Parsed as a number, 0 on failure
    Rate,
}

/// Editable top-level fields of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentField {
    /// Human-readable number
    Number,
    /// Must name a status valid for the document kind
    Status,
    /// `YYYY-MM-DD`
    IssueDate,
    /// Due date or valid-until date, `YYYY-MM-DD`
    SecondaryDate,
    /// Client name
    ClientName,
    /// Client address
    ClientAddress,
    /// Client e-mail
    ClientEmail,
    /// Currency unit
    Currency,
    /// Parsed as a number, 0 on failure
    TaxRate,
    /// Notes
    Notes,
    /// Terms
    Terms,
}

/// An invoice or quotation being viewed or edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DocumentFields")]
pub struct FinancialDocument {
    /// Invoice or quotation
    pub kind: DocumentKind,
    /// Draft or persisted id
    pub id: DocumentId,
    /// Human-readable number, not guaranteed unique
    pub number: String,
    /// Current status, always valid for `kind`
    pub status: DocumentStatus,
    /// Issue date
    pub issue_date: NaiveDate,
    /// Due date for invoices, valid-until date for quotations
    pub secondary_date: NaiveDate,
    /// Client name
    pub client_name: String,
    /// Client address
    pub client_address: String,
    /// Client e-mail
    pub client_email: String,
    /// Currency unit
    pub currency: String,
    /// Tax rate in percent
    pub tax_rate: f64,
    /// Notes
    pub notes: String,
    /// Terms
    pub terms: String,
    items: Vec<LineItem>,
}

// Unchecked shape of a serialized document
#[derive(Deserialize)]
struct DocumentFields {
    kind: DocumentKind,
    id: DocumentId,
    number: String,
    status: DocumentStatus,
    issue_date: NaiveDate,
    secondary_date: NaiveDate,
    client_name: String,
    client_address: String,
    client_email: String,
    currency: String,
    tax_rate: f64,
    notes: String,
    terms: String,
    #[serde(default)]
    items: Vec<LineItem>,
}

impl TryFrom<DocumentFields> for FinancialDocument {
    type Error = String;

    fn try_from(fields: DocumentFields) -> std::result::Result<Self, Self::Error> {
        if !fields.kind.allows(fields.status) {
            return Err(format!(
                "status {} is not valid for {}",
                fields.status, fields.kind
            ));
        }

        Ok(Self {
            kind: fields.kind,
            id: fields.id,
            number: fields.number,
            status: fields.status,
            issue_date: fields.issue_date,
            secondary_date: fields.secondary_date,
            client_name: fields.client_name,
            client_address: fields.client_address,
            client_email: fields.client_email,
            currency: fields.currency,
            tax_rate: fields.tax_rate,
            notes: fields.notes,
            terms: fields.terms,
            items: non_empty(fields.items),
        })
    }
}

fn non_empty(items: Vec<LineItem>) -> Vec<LineItem> {
    if items.is_empty() {
        vec![LineItem::blank()]
    } else {
        items
    }
}

impl FinancialDocument {
    /// Starts a new unsaved document with one blank line item.
    ///
    /// Tax rate and currency come from the company settings; the secondary date
    /// is [`DEFAULT_TERM_DAYS`] after `today`.
    #[must_use]
    pub fn new(kind: DocumentKind, settings: &AppSettings, today: NaiveDate) -> Self {
        let secondary_date = today
            .checked_add_days(Days::new(DEFAULT_TERM_DAYS))
            .unwrap_or(today);

        Self {
            kind,
            id: DocumentId::Draft,
            number: String::new(),
            status: DocumentStatus::Draft,
            issue_date: today,
            secondary_date,
            client_name: String::new(),
            client_address: String::new(),
            client_email: String::new(),
            currency: settings.currency_symbol.clone(),
            tax_rate: settings.default_tax_rate,
            notes: String::new(),
            terms: String::new(),
            items: vec![LineItem::blank()],
        }
    }

    /// Rebuilds a document from its stored row and items.
    ///
    /// An empty item list is topped up with one blank item so the
    /// at-least-one-item invariant holds even for damaged rows.
    pub(crate) fn from_row(row: document::Model, items: Vec<LineItem>) -> Result<Self> {
        let kind = DocumentKind::parse(&row.kind).ok_or_else(|| Error::InvalidStoredValue {
            field: "documents.kind",
            value: row.kind.clone(),
        })?;
        let status = DocumentStatus::parse(&row.status)
            .filter(|status| kind.allows(*status))
            .ok_or_else(|| Error::InvalidStoredValue {
                field: "documents.status",
                value: row.status.clone(),
            })?;

        Ok(Self {
            kind,
            id: DocumentId::Persisted(row.id),
            number: row.number,
            status,
            issue_date: row.issue_date,
            secondary_date: row.secondary_date,
            client_name: row.client_name,
            client_address: row.client_address,
            client_email: row.client_email,
            currency: row.currency,
            tax_rate: row.tax_rate,
            notes: row.notes,
            terms: row.terms,
            items: non_empty(items),
        })
    }

    /// Line items in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Derived subtotal, tax and total.
    #[must_use]
    pub fn totals(&self) -> Totals {
        calculate_totals(&self.items, self.tax_rate)
    }

    /// Appends a blank line item and returns its id.
    pub fn add_line_item(&mut self) -> String {
        let item = LineItem::blank();
        let id = item.id.clone();
        self.items.push(item);
        id
    }

    /// Removes the item with `item_id` unless it is the last remaining item.
    ///
    /// Both the last-item case and an unknown id are silent no-ops.
    pub fn remove_line_item(&mut self, item_id: &str) {
        if self.items.len() <= 1 {
            return;
        }
        self.items.retain(|item| item.id != item_id);
    }

    /// Replaces one field of the item with `item_id`; unknown ids are ignored.
    pub fn update_line_item(&mut self, item_id: &str, field: LineItemField, value: &str) {
        let Some(item) = self.items.iter_mut().find(|item| item.id == item_id) else {
            debug!("Ignoring update for unknown line item {item_id}");
            return;
        };

        match field {
            LineItemField::Description => item.description = value.to_string(),
            LineItemField::Quantity => item.quantity = parse_number(value),
            LineItemField::Rate => item.rate = parse_number(value),
        }
    }

    /// Replaces one top-level field from its text form.
    ///
    /// Numbers that fail to parse become 0. Dates that fail to parse and
    /// statuses that do not belong to this kind leave the field unchanged.
    pub fn set_field(&mut self, field: DocumentField, value: &str) {
        match field {
            DocumentField::Number => self.number = value.to_string(),
            DocumentField::Status => match DocumentStatus::parse(value.trim()) {
                Some(status) if self.kind.allows(status) => self.status = status,
                _ => debug!("Ignoring status {value:?} for {}", self.kind),
            },
            DocumentField::IssueDate => {
                if let Some(date) = parse_date(value) {
                    self.issue_date = date;
                }
            }
            DocumentField::SecondaryDate => {
                if let Some(date) = parse_date(value) {
                    self.secondary_date = date;
                }
            }
            DocumentField::ClientName => self.client_name = value.to_string(),
            DocumentField::ClientAddress => self.client_address = value.to_string(),
            DocumentField::ClientEmail => self.client_email = value.to_string(),
            DocumentField::Currency => self.currency = value.to_string(),
            DocumentField::TaxRate => self.tax_rate = parse_number(value),
            DocumentField::Notes => self.notes = value.to_string(),
            DocumentField::Terms => self.terms = value.to_string(),
        }
    }
}

/// Suggests the next number for a new document, e.g. `INV-0004`.
///
/// The suggestion is the count of existing documents of the kind plus one; it is
/// not checked for uniqueness.
#[must_use]
pub fn suggest_number(kind: DocumentKind, existing: &[FinancialDocument]) -> String {
    let count = existing.iter().filter(|doc| doc.kind == kind).count();
    format!("{}-{:04}", kind.number_prefix(), count + 1)
}

fn parse_number(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok();
    if parsed.is_none() {
        debug!("Ignoring unparseable date {value:?}");
    }
    parsed
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn new_invoice() -> FinancialDocument {
        FinancialDocument::new(DocumentKind::Invoice, &AppSettings::default(), today())
    }

    #[test]
    fn test_new_document_defaults() {
        let settings = AppSettings {
            default_tax_rate: 6.0,
            currency_symbol: "RM".to_string(),
            ..AppSettings::default()
        };
        let doc = FinancialDocument::new(DocumentKind::Quotation, &settings, today());

        assert_eq!(doc.id, DocumentId::Draft);
        assert_eq!(doc.status, DocumentStatus::Draft);
        assert_eq!(doc.tax_rate, 6.0);
        assert_eq!(doc.currency, "RM");
        assert_eq!(doc.issue_date, today());
        assert_eq!(
            doc.secondary_date,
            NaiveDate::from_ymd_opt(2024, 4, 14).unwrap()
        );
        assert_eq!(doc.items().len(), 1);
        assert_eq!(doc.items()[0].quantity, 1.0);
        assert_eq!(doc.items()[0].rate, 0.0);
        assert!(doc.items()[0].description.is_empty());
    }

    #[test]
    fn test_add_line_item_appends_and_preserves_order() {
        let mut doc = new_invoice();
        let first = doc.items()[0].id.clone();
        let second = doc.add_line_item();
        let third = doc.add_line_item();

        let ids: Vec<&str> = doc.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec![first.as_str(), second.as_str(), third.as_str()]);
        assert_ne!(second, third);
    }

    #[test]
    fn test_remove_last_item_is_noop() {
        let mut doc = new_invoice();
        let only = doc.items()[0].id.clone();

        doc.remove_line_item(&only);

        assert_eq!(doc.items().len(), 1);
        assert_eq!(doc.items()[0].id, only);
    }

    #[test]
    fn test_add_then_remove_round_trip() {
        let mut doc = new_invoice();
        let first = doc.items()[0].id.clone();
        doc.update_line_item(&first, LineItemField::Description, "Design work");
        doc.update_line_item(&first, LineItemField::Rate, "80");
        let before = doc.items().to_vec();

        let added = doc.add_line_item();
        doc.remove_line_item(&added);

        assert_eq!(doc.items(), before.as_slice());
    }

    #[test]
    fn test_remove_unknown_item_is_noop() {
        let mut doc = new_invoice();
        doc.add_line_item();
        let before = doc.items().to_vec();

        doc.remove_line_item("missing");

        assert_eq!(doc.items(), before.as_slice());
    }

    #[test]
    fn test_update_line_item_parses_numbers() {
        let mut doc = new_invoice();
        let id = doc.items()[0].id.clone();

        doc.update_line_item(&id, LineItemField::Quantity, " 2.5 ");
        doc.update_line_item(&id, LineItemField::Rate, "40");
        assert_eq!(doc.items()[0].amount(), 100.0);

        doc.update_line_item(&id, LineItemField::Rate, "forty");
        assert_eq!(doc.items()[0].rate, 0.0);
    }

    #[test]
    fn test_update_unknown_item_is_noop() {
        let mut doc = new_invoice();
        let before = doc.clone();
        doc.update_line_item("missing", LineItemField::Description, "x");
        assert_eq!(doc, before);
    }

    #[test]
    fn test_set_field_text_and_numbers() {
        let mut doc = new_invoice();
        doc.set_field(DocumentField::ClientName, "Acme Sdn Bhd");
        doc.set_field(DocumentField::Number, "INV-0042");
        doc.set_field(DocumentField::TaxRate, "8");
        assert_eq!(doc.client_name, "Acme Sdn Bhd");
        assert_eq!(doc.number, "INV-0042");
        assert_eq!(doc.tax_rate, 8.0);

        doc.set_field(DocumentField::TaxRate, "");
        assert_eq!(doc.tax_rate, 0.0);
    }

    #[test]
    fn test_set_field_status_respects_kind() {
        let mut invoice = new_invoice();
        invoice.set_field(DocumentField::Status, "paid");
        assert_eq!(invoice.status, DocumentStatus::Paid);

        // Any status is reachable from any other
        invoice.set_field(DocumentField::Status, "draft");
        assert_eq!(invoice.status, DocumentStatus::Draft);

        // Quotation-only status is ignored on an invoice
        invoice.set_field(DocumentField::Status, "accepted");
        assert_eq!(invoice.status, DocumentStatus::Draft);

        let mut quote =
            FinancialDocument::new(DocumentKind::Quotation, &AppSettings::default(), today());
        quote.set_field(DocumentField::Status, "accepted");
        assert_eq!(quote.status, DocumentStatus::Accepted);
        quote.set_field(DocumentField::Status, "paid");
        assert_eq!(quote.status, DocumentStatus::Accepted);
    }

    #[test]
    fn test_set_field_dates() {
        let mut doc = new_invoice();
        doc.set_field(DocumentField::IssueDate, "2024-05-01");
        assert_eq!(doc.issue_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());

        doc.set_field(DocumentField::SecondaryDate, "not a date");
        assert_eq!(
            doc.secondary_date,
            NaiveDate::from_ymd_opt(2024, 4, 14).unwrap()
        );
    }

    #[test]
    fn test_totals_follow_items_and_tax_rate() {
        let mut doc = new_invoice();
        let first = doc.items()[0].id.clone();
        doc.update_line_item(&first, LineItemField::Quantity, "2");
        doc.update_line_item(&first, LineItemField::Rate, "50");
        let second = doc.add_line_item();
        doc.update_line_item(&second, LineItemField::Rate, "25");
        doc.set_field(DocumentField::TaxRate, "6");

        let totals = doc.totals();
        assert_eq!(totals.subtotal, 125.0);
        assert_eq!(totals.tax_amount, 7.5);
        assert_eq!(totals.total, 132.5);

        doc.remove_line_item(&second);
        assert_eq!(doc.totals().subtotal, 100.0);
    }

    fn stored_row(kind: &str, status: &str) -> document::Model {
        let now = chrono::Utc::now();
        document::Model {
            id: "doc-1".to_string(),
            kind: kind.to_string(),
            number: "INV-0001".to_string(),
            status: status.to_string(),
            issue_date: today(),
            secondary_date: today(),
            client_name: "Acme".to_string(),
            client_address: String::new(),
            client_email: String::new(),
            currency: "$".to_string(),
            tax_rate: 6.0,
            notes: String::new(),
            terms: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_from_row_tops_up_empty_item_list() {
        let doc = FinancialDocument::from_row(stored_row("invoice", "pending"), Vec::new()).unwrap();
        assert_eq!(doc.id, DocumentId::Persisted("doc-1".to_string()));
        assert_eq!(doc.status, DocumentStatus::Pending);
        assert_eq!(doc.items().len(), 1);
    }

    #[test]
    fn test_from_row_rejects_status_of_other_kind() {
        let result = FinancialDocument::from_row(stored_row("invoice", "accepted"), Vec::new());
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidStoredValue { field: "documents.status", .. }
        ));

        let result = FinancialDocument::from_row(stored_row("receipt", "draft"), Vec::new());
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidStoredValue { field: "documents.kind", .. }
        ));
    }

    #[test]
    fn test_suggest_number_counts_per_kind() {
        let invoice = new_invoice();
        let quote =
            FinancialDocument::new(DocumentKind::Quotation, &AppSettings::default(), today());
        let existing = vec![invoice.clone(), invoice, quote];

        assert_eq!(suggest_number(DocumentKind::Invoice, &existing), "INV-0003");
        assert_eq!(suggest_number(DocumentKind::Quotation, &existing), "QUO-0002");
        assert_eq!(suggest_number(DocumentKind::Invoice, &[]), "INV-0001");
    }

    #[test]
    fn test_document_id_variants() {
        assert!(!DocumentId::Draft.is_persisted());
        assert_eq!(DocumentId::Draft.as_persisted(), None);
        let id = DocumentId::Persisted("abc".to_string());
        assert!(id.is_persisted());
        assert_eq!(id.as_persisted(), Some("abc"));
    }

    #[test]
    fn test_kind_and_status_names_round_trip() {
        for kind in [DocumentKind::Invoice, DocumentKind::Quotation] {
            assert_eq!(DocumentKind::parse(kind.as_str()), Some(kind));
            for status in kind.statuses() {
                assert_eq!(DocumentStatus::parse(status.as_str()), Some(*status));
            }
        }
        assert_eq!(DocumentStatus::parse("overdue"), None);
    }

    #[test]
    fn test_deserialize_tops_up_empty_items() {
        let mut value = serde_json::to_value(new_invoice()).unwrap();
        value["items"] = serde_json::json!([]);

        let doc: FinancialDocument = serde_json::from_value(value).unwrap();

        assert_eq!(doc.items().len(), 1);
        assert_eq!(doc.items()[0].quantity, 1.0);
    }

    #[test]
    fn test_deserialize_keeps_items_in_order() {
        let mut original = new_invoice();
        let second = original.add_line_item();
        let value = serde_json::to_value(&original).unwrap();

        let doc: FinancialDocument = serde_json::from_value(value).unwrap();

        assert_eq!(doc, original);
        assert_eq!(doc.items()[1].id, second);
    }

    #[test]
    fn test_deserialize_rejects_status_of_other_kind() {
        let mut value = serde_json::to_value(new_invoice()).unwrap();
        value["status"] = serde_json::json!("accepted");

        assert!(serde_json::from_value::<FinancialDocument>(value).is_err());
    }
}
