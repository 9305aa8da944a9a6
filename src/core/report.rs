//! Financial report aggregation.
//!
//! This module filters a snapshot of documents by issue date and sums their
//! totals into status buckets. It only reads the snapshot: the returned
//! [`DocumentReport`] owns its rows and keeps no reference to the input.

use crate::core::{
    document::{DocumentId, DocumentKind, DocumentStatus, FinancialDocument},
    money::format_money,
};
use chrono::{Datelike, Local, Months, NaiveDate};

/// Inclusive range of issue dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day included
    pub start: NaiveDate,
    /// Last day included
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range from `start` to `end`, both inclusive.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// First through last calendar day of the month containing `today`.
    #[must_use]
    pub fn month_of(today: NaiveDate) -> Self {
        let start = today.with_day(1).unwrap_or(today);
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(today);
        Self { start, end }
    }

    /// The default report range: the current month in local time.
    #[must_use]
    pub fn current_month() -> Self {
        Self::month_of(Local::now().date_naive())
    }

    /// Whether `date` falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::current_month()
    }
}

/// One document as listed in a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Invoice or quotation
    pub kind: DocumentKind,
    /// Stored id, `None` for unsaved drafts
    pub id: Option<String>,
    /// Human-readable number
    pub number: String,
    /// Client name
    pub client_name: String,
    /// Issue date
    pub issue_date: NaiveDate,
    /// Status at the time of the report
    pub status: DocumentStatus,
    /// Derived grand total
    pub total: f64,
}

impl From<&FinancialDocument> for ReportRow {
    fn from(doc: &FinancialDocument) -> Self {
        Self {
            kind: doc.kind,
            id: match &doc.id {
                DocumentId::Draft => None,
                DocumentId::Persisted(id) => Some(id.clone()),
            },
            number: doc.number.clone(),
            client_name: doc.client_name.clone(),
            issue_date: doc.issue_date,
            status: doc.status,
            total: doc.totals().total,
        }
    }
}

/// Summary statistics over a date range.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentReport {
    /// Range the report covers
    pub range: DateRange,
    /// Documents issued in range, ascending by issue date
    pub rows: Vec<ReportRow>,
    /// Number of rows
    pub count: usize,
    /// Sum of all row totals
    pub total_amount: f64,
    /// Sum of totals with status paid
    pub collected: f64,
    /// Sum of totals with status pending
    pub pending: f64,
    /// Sum of totals with status draft
    pub draft: f64,
}

impl DocumentReport {
    /// Sum of the three named buckets.
    ///
    /// Never exceeds `total_amount` for non-negative totals; equal when every
    /// row is paid, pending or draft.
    #[must_use]
    pub fn bucketed_amount(&self) -> f64 {
        self.collected + self.pending + self.draft
    }

    /// One-line summary used in logs.
    #[must_use]
    pub fn summary_line(&self, currency_symbol: &str) -> String {
        format!(
            "{} to {}: {} documents, total {}, collected {}, pending {}, draft {}",
            self.range.start,
            self.range.end,
            self.count,
            format_money(self.total_amount, currency_symbol),
            format_money(self.collected, currency_symbol),
            format_money(self.pending, currency_symbol),
            format_money(self.draft, currency_symbol),
        )
    }
}

/// Builds a report over the documents issued within `range`.
///
/// Rows are sorted ascending by issue date; documents on the same date keep
/// their input order. Statuses other than paid, pending and draft count toward
/// `count` and `total_amount` only.
#[must_use]
pub fn generate_report(documents: &[FinancialDocument], range: DateRange) -> DocumentReport {
    let mut rows: Vec<ReportRow> = documents
        .iter()
        .filter(|doc| range.contains(doc.issue_date))
        .map(ReportRow::from)
        .collect();
    rows.sort_by_key(|row| row.issue_date);

    let sum_with = |status: DocumentStatus| -> f64 {
        rows.iter()
            .filter(|row| row.status == status)
            .map(|row| row.total)
            .sum()
    };
    let collected = sum_with(DocumentStatus::Paid);
    let pending = sum_with(DocumentStatus::Pending);
    let draft = sum_with(DocumentStatus::Draft);
    let other: f64 = rows
        .iter()
        .filter(|row| !is_bucketed(row.status))
        .map(|row| row.total)
        .sum();
    // Same addition order as `bucketed_amount`, so the two agree exactly
    let total_amount = collected + pending + draft + other;

    DocumentReport {
        range,
        count: rows.len(),
        rows,
        total_amount,
        collected,
        pending,
        draft,
    }
}

const fn is_bucketed(status: DocumentStatus) -> bool {
    matches!(
        status,
        DocumentStatus::Paid | DocumentStatus::Pending | DocumentStatus::Draft
    )
}
