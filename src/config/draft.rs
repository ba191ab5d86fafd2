use serde::{Deserialize, Serialize};

use crate::invoice::{LineItem, LineItems, StudentInfo};

/// The invoice being edited: everything the user fills in before printing
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Draft {
    /// Overrides the school's default remark when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default)]
    pub student: StudentInfo,
    pub items: LineItems,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            remark: None,
            student: StudentInfo::default(),
            items: LineItems::new(LineItem::placeholder(1)),
        }
    }
}

impl Draft {
    /// Remark to print, falling back to the school's default
    pub fn remark_or<'a>(&'a self, school_remark: &'a str) -> &'a str {
        self.remark
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or(school_remark)
    }
}
