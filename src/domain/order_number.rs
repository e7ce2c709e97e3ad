pub const ORDER_NUMBER_PREFIX: &str = "ORD";

/// Formats the order number that follows the highest existing order id.
///
/// `next_order_number(None)` is `"ORD00001"`. The sequence is zero padded to
/// five digits and widens past 99999.
pub fn next_order_number(highest_id: Option<i32>) -> String {
    let next = i64::from(highest_id.unwrap_or(0)) + 1;
    format!("{ORDER_NUMBER_PREFIX}{next:05}")
}
