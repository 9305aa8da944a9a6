//! Money and tax arithmetic for financial documents.
//!
//! Totals are always derived from the current line items and tax rate; nothing
//! here is stored. Values stay unrounded `f64` until they are formatted for
//! display, which is the only place two-decimal rounding happens.

use crate::core::document::LineItem;

/// Derived totals of a document.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    /// Sum of `quantity * rate` over all items
    pub subtotal: f64,
    /// `subtotal * tax_rate / 100`
    pub tax_amount: f64,
    /// `subtotal + tax_amount`
    pub total: f64,
}

/// Computes subtotal, tax and grand total for a set of line items.
///
/// An empty item list yields all zeroes. Negative quantities or rates are not
/// rejected; they flow through the arithmetic and can be used for credits.
#[must_use]
pub fn calculate_totals(items: &[LineItem], tax_rate: f64) -> Totals {
    let subtotal: f64 = items.iter().map(LineItem::amount).sum();
    let tax_amount = subtotal * tax_rate / 100.0;

    Totals {
        subtotal,
        tax_amount,
        total: subtotal + tax_amount,
    }
}

/// Formats an amount with two decimals and the given currency symbol.
///
/// # Returns
/// Strings like `"$132.50"` or `"-$5.00"`
#[must_use]
pub fn format_money(amount: f64, symbol: &str) -> String {
    // Avoid printing "-$0.00" for tiny negative rounding noise
    if amount < 0.0 && format!("{:.2}", amount.abs()) != "0.00" {
        format!("-{symbol}{:.2}", amount.abs())
    } else {
        format!("{symbol}{:.2}", amount.abs())
    }
}
