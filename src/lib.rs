pub mod config;
pub mod error;
pub mod invoice;
pub mod print;
pub mod render;

pub use config::{Config, Draft, SchoolInfo};
pub use error::{FieldError, InvoiceError, Result};
pub use invoice::{
    coerce_number, compute_total, discounted_value, InvoiceSnapshot, ItemEdit, LineItem,
    LineItems, StudentInfo, ValidationRules,
};
pub use print::{present_for_print, PrintHost, PrintSurface, SystemBrowser};
pub use render::{escape_html, render};
