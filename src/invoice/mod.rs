mod calculator;
mod item;
mod snapshot;
mod student;

pub use calculator::{compute_total, discounted_value};
pub use item::{coerce_number, ItemEdit, LineItem, LineItems};
pub use snapshot::{format_date, InvoiceSnapshot};
pub use student::{StudentInfo, ValidationRules};
