use serde::{Deserialize, Serialize};

use crate::invoice::ValidationRules;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub school: SchoolInfo,
    #[serde(default)]
    pub invoice: InvoiceSettings,
    #[serde(default)]
    pub validation: ValidationRules,
    #[serde(default)]
    pub print: PrintSettings,
}

/// Fixed details printed on every invoice
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SchoolInfo {
    pub name: String,
    pub phone: String,
    pub telegram: String,
    pub telegram_url: String,
    pub email: String,
    pub website: String,
    pub website_url: String,
    pub slogan: String,
    pub remark: String,
    pub logo_url: String,
    pub signature_url: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct InvoiceSettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Printed in the amount column headers, e.g. "Amount (USD)"
    #[serde(default = "default_currency_code")]
    pub currency_code: String,
    /// chrono strftime pattern for the invoice date
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Shown in place of missing student details
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl Default for InvoiceSettings {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            currency_code: default_currency_code(),
            date_format: default_date_format(),
            placeholder: default_placeholder(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PrintSettings {
    /// How long the print surface is kept after handing it to the browser.
    /// The file is deleted once this runs out, loaded or not.
    #[serde(default = "default_cleanup_delay_ms")]
    pub cleanup_delay_ms: u64,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            cleanup_delay_ms: default_cleanup_delay_ms(),
        }
    }
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_currency_code() -> String {
    "USD".to_string()
}

pub(crate) fn default_date_format() -> String {
    "%-d %B %Y".to_string()
}

fn default_placeholder() -> String {
    "N/A".to_string()
}

fn default_cleanup_delay_ms() -> u64 {
    1500
}
