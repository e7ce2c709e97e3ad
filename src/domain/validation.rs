use std::collections::{BTreeMap, HashMap};

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use super::errors::DomainError;

/// Upper bound for a single product, in kilograms.
pub const MAX_PRODUCT_WEIGHT_KG: u32 = 25;

/// Upper bound for the cumulative weight of one order, in kilograms.
pub const MAX_ORDER_WEIGHT_KG: u32 = 150;

/// Fractional digits the `NUMERIC(5, 2)` weight column keeps.
pub const WEIGHT_DECIMAL_PLACES: i64 = 2;

/// Accepts a product weight within `0..=25` kg with at most two decimal
/// places and returns it unchanged. Trailing zeros do not count as places.
pub fn validate_weight(weight: BigDecimal) -> Result<BigDecimal, DomainError> {
    let (_, scale) = weight.normalized().as_bigint_and_exponent();
    if scale > WEIGHT_DECIMAL_PLACES {
        return Err(DomainError::validation(
            "weight",
            format!("Weight must have at most {WEIGHT_DECIMAL_PLACES} decimal places."),
        ));
    }
    if weight < BigDecimal::from(0) || weight > BigDecimal::from(MAX_PRODUCT_WEIGHT_KG) {
        return Err(DomainError::validation(
            "weight",
            format!("Weight must be a positive decimal not exceeding {MAX_PRODUCT_WEIGHT_KG}kg."),
        ));
    }
    Ok(weight)
}

/// Accepts an order date that is not earlier than `today`.
pub fn validate_order_date(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, DomainError> {
    if date < today {
        return Err(DomainError::validation(
            "order_date",
            "Order date cannot be in the past.",
        ));
    }
    Ok(date)
}

pub fn validate_quantity(quantity: i32) -> Result<i32, DomainError> {
    if quantity < 1 {
        return Err(DomainError::validation(
            "order_item",
            format!("Quantity must be a positive integer, got {quantity}."),
        ));
    }
    Ok(quantity)
}

/// Checks that `sum(quantity * weight)` over `items` stays within the order
/// cap. Quantities are aggregated per product name first; `weights` holds the
/// stored weight of every referenced product. Returns the total on success.
pub fn check_cumulative_weight<'a, I>(
    items: I,
    weights: &HashMap<String, BigDecimal>,
) -> Result<BigDecimal, DomainError>
where
    I: IntoIterator<Item = (&'a str, i32)>,
{
    let mut quantities: BTreeMap<&str, i64> = BTreeMap::new();
    for (product, quantity) in items {
        *quantities.entry(product).or_default() += i64::from(quantity);
    }

    let mut total = BigDecimal::from(0);
    for (product, quantity) in quantities {
        let weight = weights.get(product).ok_or_else(|| {
            DomainError::validation("order_item", format!("Product '{product}' does not exist."))
        })?;
        total += weight * BigDecimal::from(quantity);
    }

    if total > BigDecimal::from(MAX_ORDER_WEIGHT_KG) {
        let message = format!(
            "Order cumulative weight must be under {MAX_ORDER_WEIGHT_KG}kg (got {total}kg)."
        );
        return Err(DomainError::validation("order_item", message));
    }
    Ok(total)
}
