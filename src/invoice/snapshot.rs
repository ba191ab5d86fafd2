use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use serde::Serialize;

use crate::config::{default_date_format, Config, Draft, SchoolInfo};
use crate::error::Result;
use crate::invoice::calculator::compute_total;
use crate::invoice::item::LineItem;
use crate::invoice::student::StudentInfo;

/// Point-in-time invoice data handed to the renderer
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceSnapshot {
    pub date: String,
    pub school: SchoolInfo,
    pub student: StudentInfo,
    pub items: Vec<LineItem>,
    pub remark: String,
    pub total: f64,
    pub currency_symbol: String,
    pub currency_code: String,
    pub placeholder: String,
}

impl InvoiceSnapshot {
    /// Validate the draft and freeze it for rendering.
    ///
    /// Nothing is captured when validation fails, so a half-filled
    /// invoice never reaches the renderer.
    pub fn capture(draft: &Draft, config: &Config, date: NaiveDate) -> Result<Self> {
        draft.student.validate(&config.validation)?;

        let items: Vec<LineItem> = draft.items.iter().cloned().collect();
        let total = compute_total(&items);

        Ok(Self {
            date: format_date(date, &config.invoice.date_format),
            school: config.school.clone(),
            student: draft.student.clone(),
            remark: draft.remark_or(&config.school.remark).to_string(),
            items,
            total,
            currency_symbol: config.invoice.currency_symbol.clone(),
            currency_code: config.invoice.currency_code.clone(),
            placeholder: config.invoice.placeholder.clone(),
        })
    }
}

/// Format a date with a user supplied strftime pattern, falling back to the
/// default pattern when it contains an invalid specifier
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        tracing::warn!(pattern, "invalid date format, using the default");
        return date.format(&default_date_format()).to_string();
    }
    date.format(pattern).to_string()
}
