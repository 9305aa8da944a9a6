//! Prefilled e-mail drafts for sending a document to its client.
//!
//! Nothing is sent from here and no attachment is produced: the draft is handed
//! to the host's default mail handler as a `mailto:` URI.

use crate::core::{
    document::{DocumentKind, FinancialDocument},
    money::format_money,
    settings::AppSettings,
};
use url::form_urlencoded::byte_serialize;

/// A message ready to be opened in a mail client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailDraft {
    /// Recipient, the client's e-mail address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

impl MailDraft {
    /// Encodes the draft as an RFC 6068 `mailto:` URI.
    #[must_use]
    pub fn to_mailto_uri(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            encode_component(&self.to),
            encode_component(&self.subject),
            encode_component(&self.body),
        )
    }
}

/// Builds the client e-mail for a document.
#[must_use]
pub fn compose_email(document: &FinancialDocument, settings: &AppSettings) -> MailDraft {
    let kind_name = match document.kind {
        DocumentKind::Invoice => "invoice",
        DocumentKind::Quotation => "quotation",
    };
    let amount = format_money(document.totals().total, &document.currency);
    let date_line = match document.kind {
        DocumentKind::Invoice => format!("Payment is due by {}.", document.secondary_date),
        DocumentKind::Quotation => {
            format!("This quotation is valid until {}.", document.secondary_date)
        }
    };

    let subject = format!(
        "{} {} from {}",
        document.kind, document.number, settings.company_name
    );
    let body = format!(
        "Dear {client},\n\n\
         Please find {kind_name} {number} dated {date} for the amount of {amount}.\n\
         {date_line}\n\n\
         Best regards,\n\
         {company}",
        client = document.client_name,
        number = document.number,
        date = document.issue_date,
        company = settings.company_name,
    );

    MailDraft {
        to: document.client_email.clone(),
        subject,
        body,
    }
}

// form encoding writes spaces as '+', which mail clients show literally
fn encode_component(value: &str) -> String {
    byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
