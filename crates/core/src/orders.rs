use chrono::Utc;
use nanoid::nanoid;

use crate::types::OrderItem;

const ORDER_NUMBER_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H',
    'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Product {0} not found or inactive")]
    UnavailableProduct(String),
    #[error("Invalid quantity for product {0}")]
    InvalidQuantity(String),
}

/// A line as submitted by the customer, before pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: i32,
}

/// Human-readable order reference, e.g. `ORD-1704067200000-7K2Q9XAZ1`.
pub fn generate_order_number() -> String {
    format!(
        "ORD-{}-{}",
        Utc::now().timestamp_millis(),
        nanoid!(9, &ORDER_NUMBER_ALPHABET)
    )
}

pub fn validate_lines(lines: &[OrderLine]) -> Result<(), OrderError> {
    if lines.is_empty() {
        return Err(OrderError::MissingFields);
    }
    for line in lines {
        if line.product_id.trim().is_empty() {
            return Err(OrderError::MissingFields);
        }
        if line.quantity <= 0 {
            return Err(OrderError::InvalidQuantity(line.product_id.clone()));
        }
    }
    Ok(())
}

/// Pairs each line with its catalog price and numbers the items `item-0..`.
pub fn price_items<I>(priced: I) -> Vec<OrderItem>
where
    I: IntoIterator<Item = (OrderLine, i64)>,
{
    priced
        .into_iter()
        .enumerate()
        .map(|(idx, (line, price_cents))| OrderItem {
            id: format!("item-{}", idx),
            product_id: line.product_id,
            quantity: line.quantity,
            price_cents,
        })
        .collect()
}

pub fn order_total(items: &[OrderItem]) -> i64 {
    items
        .iter()
        .map(|item| item.price_cents.saturating_mul(i64::from(item.quantity)))
        .fold(0i64, i64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: &str, quantity: i32) -> OrderLine {
        OrderLine {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_order_number_format() {
        let number = generate_order_number();
        let parts: Vec<&str> = number.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_order_numbers_unique() {
        assert_ne!(generate_order_number(), generate_order_number());
    }

    #[test]
    fn test_validate_lines() {
        assert_eq!(validate_lines(&[]), Err(OrderError::MissingFields));
        assert_eq!(validate_lines(&[line(" ", 1)]), Err(OrderError::MissingFields));
        assert_eq!(
            validate_lines(&[line("prd_1", 0)]),
            Err(OrderError::InvalidQuantity("prd_1".to_string()))
        );
        assert!(validate_lines(&[line("prd_1", 2), line("prd_2", 1)]).is_ok());
    }

    #[test]
    fn test_price_items_numbers_lines() {
        let items = price_items(vec![(line("prd_a", 2), 1500), (line("prd_b", 1), 999)]);

        assert_eq!(items[0].id, "item-0");
        assert_eq!(items[1].id, "item-1");
        assert_eq!(items[1].product_id, "prd_b");
        assert_eq!(items[0].price_cents, 1500);
    }

    #[test]
    fn test_order_total() {
        let items = price_items(vec![(line("a", 2), 1500), (line("b", 3), 250)]);
        assert_eq!(order_total(&items), 3750);
        assert_eq!(order_total(&[]), 0);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(OrderError::MissingFields.to_string(), "Missing required fields");
        assert_eq!(
            OrderError::UnavailableProduct("prd_x".to_string()).to_string(),
            "Product prd_x not found or inactive"
        );
    }
}
