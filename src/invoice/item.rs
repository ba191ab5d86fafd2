use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

use crate::error::{InvoiceError, Result};

/// One billable row on the invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: u64,
    #[serde(default)]
    pub description: String,
    /// Percent off the amount, 0-100 expected but not enforced
    #[serde(default, deserialize_with = "lenient_number")]
    pub discount: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: f64,
}

/// What a hand-edited draft may hold in a number field
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberField {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Read a number field the same way form input is read: anything that is
/// not a finite number, quoted or not, becomes 0
fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match NumberField::deserialize(deserializer)? {
        NumberField::Number(n) if n.is_finite() => n,
        NumberField::Number(_) | NumberField::Other(_) => 0.0,
        NumberField::Text(text) => coerce_number(&text),
    };
    Ok(value)
}

impl LineItem {
    /// A fresh row as created by "add item"
    pub fn placeholder(id: u64) -> Self {
        Self {
            id,
            description: String::new(),
            discount: 0.0,
            amount: 0.0,
        }
    }
}

/// Field edits for a single item. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ItemEdit {
    pub description: Option<String>,
    pub discount: Option<f64>,
    pub amount: Option<f64>,
}

impl ItemEdit {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.discount.is_none() && self.amount.is_none()
    }

    fn apply(&self, item: &LineItem) -> LineItem {
        LineItem {
            id: item.id,
            description: self
                .description
                .clone()
                .unwrap_or_else(|| item.description.clone()),
            discount: self.discount.unwrap_or(item.discount),
            amount: self.amount.unwrap_or(item.amount),
        }
    }
}

/// Ordered line items; never empty and ids are unique.
///
/// Every edit returns a new collection and leaves `self` as it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct LineItems(Vec<LineItem>);

impl LineItems {
    pub fn new(first: LineItem) -> Self {
        Self(vec![first])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[LineItem] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true once built: a list holds at least one item
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&LineItem> {
        self.0.iter().find(|item| item.id == id)
    }

    fn next_id(&self) -> u64 {
        self.0.iter().map(|item| item.id).max().unwrap_or(0) + 1
    }

    /// Append a placeholder item, returning the new collection and the new id
    pub fn add(&self) -> (Self, u64) {
        let id = self.next_id();
        let mut items = self.0.clone();
        items.push(LineItem::placeholder(id));
        (Self(items), id)
    }

    pub fn update(&self, id: u64, edit: &ItemEdit) -> Result<Self> {
        if self.get(id).is_none() {
            return Err(InvoiceError::ItemNotFound(id));
        }

        let items = self
            .0
            .iter()
            .map(|item| if item.id == id { edit.apply(item) } else { item.clone() })
            .collect();
        Ok(Self(items))
    }

    pub fn remove(&self, id: u64) -> Result<Self> {
        if self.get(id).is_none() {
            return Err(InvoiceError::ItemNotFound(id));
        }
        if self.0.len() == 1 {
            return Err(InvoiceError::LastItem(id));
        }

        let items = self.0.iter().filter(|item| item.id != id).cloned().collect();
        Ok(Self(items))
    }
}

impl TryFrom<Vec<LineItem>> for LineItems {
    type Error = String;

    fn try_from(items: Vec<LineItem>) -> std::result::Result<Self, Self::Error> {
        if items.is_empty() {
            return Err("an invoice needs at least one item".to_string());
        }

        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id) {
                return Err(format!("duplicate item id {}", item.id));
            }
        }

        Ok(Self(items))
    }
}

impl From<LineItems> for Vec<LineItem> {
    fn from(items: LineItems) -> Self {
        items.0
    }
}

impl<'a> IntoIterator for &'a LineItems {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Parse a numeric form field. Anything that is not a finite number counts as 0.
pub fn coerce_number(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> LineItem {
        LineItem {
            id: 1,
            description: "Basic Web Development course".to_string(),
            discount: 0.0,
            amount: 60.0,
        }
    }

    #[test]
    fn test_add_uses_placeholder_and_next_id() {
        let items = LineItems::new(course());
        let (added, id) = items.add();

        assert_eq!(id, 2);
        assert_eq!(added.len(), 2);
        assert_eq!(added.get(2), Some(&LineItem::placeholder(2)));
        // the original collection is untouched
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_ids_stay_unique_after_removal() {
        let (items, _) = LineItems::new(course()).add();
        let (items, third) = items.add();
        let items = items.remove(2).unwrap();
        let (items, fourth) = items.add();

        assert_eq!(third, 3);
        assert_eq!(fourth, 4);
        let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_update_changes_only_given_fields() {
        let items = LineItems::new(course());
        let edit = ItemEdit {
            discount: Some(10.0),
            ..Default::default()
        };

        let updated = items.update(1, &edit).unwrap();
        let item = updated.get(1).unwrap();
        assert_eq!(item.description, "Basic Web Development course");
        assert_eq!(item.discount, 10.0);
        assert_eq!(item.amount, 60.0);
    }

    #[test]
    fn test_update_unknown_id() {
        let items = LineItems::new(course());
        let err = items.update(7, &ItemEdit::default()).unwrap_err();
        assert!(matches!(err, InvoiceError::ItemNotFound(7)));
    }

    #[test]
    fn test_remove_last_item_is_rejected() {
        let items = LineItems::new(course());
        let err = items.remove(1).unwrap_err();

        assert!(matches!(err, InvoiceError::LastItem(1)));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_remove_keeps_order() {
        let (items, _) = LineItems::new(course()).add();
        let (items, _) = items.add();
        let items = items.remove(1).unwrap();

        let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_empty_list_cannot_be_built() {
        assert!(LineItems::try_from(Vec::new()).is_err());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let err = LineItems::try_from(vec![course(), course()]).unwrap_err();
        assert_eq!(err, "duplicate item id 1");
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number("60"), 60.0);
        assert_eq!(coerce_number(" 12.5 "), 12.5);
        assert_eq!(coerce_number("-5"), -5.0);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("abc"), 0.0);
        assert_eq!(coerce_number("NaN"), 0.0);
        assert_eq!(coerce_number("inf"), 0.0);
    }
}
