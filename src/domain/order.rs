use chrono::NaiveDate;

/// A line item as submitted by a client. Products are referenced by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemInput {
    /// Existing item id; only meaningful on update.
    pub id: Option<i32>,
    pub product: String,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Generated when absent.
    pub order_number: Option<String>,
    pub customer_id: i32,
    pub order_date: NaiveDate,
    pub address: String,
    pub items: Vec<OrderItemInput>,
}

/// Update payload. Absent fields keep their stored value; the item list
/// replaces the stored one.
#[derive(Debug, Clone)]
pub struct OrderChanges {
    pub order_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub items: Vec<OrderItemInput>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemView {
    pub id: i32,
    pub product_id: i32,
    pub product: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderView {
    pub id: i32,
    pub order_number: String,
    pub customer_id: i32,
    pub order_date: NaiveDate,
    pub address: String,
    pub items: Vec<OrderItemView>,
}

// ── Repository records (products already resolved to ids) ────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRecord {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct NewOrderRecord {
    pub order_number: Option<String>,
    pub customer_id: i32,
    pub order_date: NaiveDate,
    pub address: String,
    pub items: Vec<ItemRecord>,
}

/// Item changes to apply in one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPlan {
    pub update: Vec<(i32, ItemRecord)>,
    pub insert: Vec<ItemRecord>,
    pub delete: Vec<i32>,
}

#[derive(Debug, Clone)]
pub struct OrderUpdateRecord {
    pub order_date: NaiveDate,
    pub address: String,
    pub items: ItemPlan,
}

// ── Listing filter ───────────────────────────────────────────────────────────

/// Narrows an order listing. Both criteria must hold when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Orders with at least one item for any of these product names.
    pub products: Option<Vec<String>>,
    /// Exact customer name.
    pub customer: Option<String>,
}

impl OrderFilter {
    /// Builds a filter from the raw `products` (comma separated) and
    /// `customer` query parameters. Blank parameters are treated as absent.
    pub fn from_params(products: Option<&str>, customer: Option<&str>) -> Self {
        let products = products
            .map(|csv| {
                csv.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|names| !names.is_empty());
        let customer = customer
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Self { products, customer }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_none() && self.customer.is_none()
    }
}
