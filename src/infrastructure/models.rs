use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::customer::Customer;
use crate::domain::product::Product;
use crate::schema::{customers, order_items, orders, products};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerRow {
    pub id: i32,
    pub name: String,
    pub contact_number: String,
    pub email: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            contact_number: row.contact_number,
            email: row.email,
        }
    }
}

/// Used for both insert and full update.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = customers)]
pub struct CustomerFields<'a> {
    pub name: &'a str,
    pub contact_number: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub weight: BigDecimal,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            weight: row.weight,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow<'a> {
    pub name: &'a str,
    pub weight: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i32,
    pub order_number: String,
    pub customer_id: i32,
    pub order_date: NaiveDate,
    pub address: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow<'a> {
    pub order_number: &'a str,
    pub customer_id: i32,
    pub order_date: NaiveDate,
    pub address: &'a str,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

/// An order item joined with its product name.
#[derive(Debug, Clone, Queryable)]
pub struct OrderItemWithProduct {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub product: String,
    pub quantity: i32,
}
