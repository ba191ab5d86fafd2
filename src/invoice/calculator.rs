use crate::invoice::item::LineItem;

/// What a single item contributes to the total once its discount is applied
pub fn discounted_value(item: &LineItem) -> f64 {
    item.amount - item.amount * item.discount / 100.0
}

/// Invoice total: the sum of every item's discounted value
pub fn compute_total<'a, I>(items: I) -> f64
where
    I: IntoIterator<Item = &'a LineItem>,
{
    items.into_iter().map(discounted_value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::item::coerce_number;

    fn item(id: u64, discount: f64, amount: f64) -> LineItem {
        LineItem {
            id,
            description: format!("Item {id}"),
            discount,
            amount,
        }
    }

    #[test]
    fn test_single_undiscounted_item() {
        let items = [item(1, 0.0, 60.0)];
        assert_eq!(compute_total(&items), 60.0);
    }

    #[test]
    fn test_discount_is_applied() {
        let items = [item(1, 10.0, 100.0)];
        assert_eq!(compute_total(&items), 90.0);
    }

    #[test]
    fn test_total_differs_from_plain_sum_when_discounted() {
        let items = [item(1, 10.0, 100.0), item(2, 50.0, 40.0), item(3, 0.0, 25.0)];
        let plain: f64 = items.iter().map(|i| i.amount).sum();

        assert_eq!(plain, 165.0);
        assert_eq!(compute_total(&items), 90.0 + 20.0 + 25.0);
    }

    #[test]
    fn test_total_matches_plain_sum_without_discounts() {
        let items = [item(1, 0.0, 12.5), item(2, 0.0, 7.5)];
        let plain: f64 = items.iter().map(|i| i.amount).sum();
        assert_eq!(compute_total(&items), plain);
    }

    #[test]
    fn test_malformed_fields_contribute_nothing() {
        let empty_amount = item(1, coerce_number("10"), coerce_number(""));
        let bad_discount = item(2, coerce_number("ten"), coerce_number("30"));

        assert_eq!(discounted_value(&empty_amount), 0.0);
        assert_eq!(discounted_value(&bad_discount), 30.0);
        assert_eq!(compute_total(&[empty_amount, bad_discount]), 30.0);
    }

    #[test]
    fn test_negative_values_pass_through() {
        let refund = item(1, 0.0, -20.0);
        let markup = item(2, -10.0, 100.0);

        assert_eq!(discounted_value(&refund), -20.0);
        assert_eq!(discounted_value(&markup), 110.0);
    }

    #[test]
    fn test_full_discount() {
        assert_eq!(discounted_value(&item(1, 100.0, 80.0)), 0.0);
    }
}
