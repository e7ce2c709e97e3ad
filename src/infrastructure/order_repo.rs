use std::collections::HashMap;

use diesel::dsl::max;
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    ItemRecord, NewOrderRecord, OrderFilter, OrderItemView, OrderUpdateRecord, OrderView,
};
use crate::domain::order_number::next_order_number;
use crate::domain::ports::OrderRepository;
use crate::schema::{customers, order_items, orders, products};

use super::models::{NewOrderItemRow, NewOrderRow, OrderItemWithProduct, OrderRow};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn new_item_rows(order_id: i32, items: &[ItemRecord]) -> Vec<NewOrderItemRow> {
    items
        .iter()
        .map(|item| NewOrderItemRow {
            order_id,
            product_id: item.product_id,
            quantity: item.quantity,
        })
        .collect()
}

/// Loads the items of `order_ids` with their product names, grouped by order.
fn load_items(
    conn: &mut PgConnection,
    order_ids: Vec<i32>,
) -> QueryResult<HashMap<i32, Vec<OrderItemView>>> {
    let rows: Vec<OrderItemWithProduct> = order_items::table
        .inner_join(products::table)
        .filter(order_items::order_id.eq_any(order_ids))
        .select((
            order_items::id,
            order_items::order_id,
            products::id,
            products::name,
            order_items::quantity,
        ))
        .order(order_items::id.asc())
        .load(conn)?;

    let mut grouped: HashMap<i32, Vec<OrderItemView>> = HashMap::new();
    for row in rows {
        grouped.entry(row.order_id).or_default().push(OrderItemView {
            id: row.id,
            product_id: row.product_id,
            product: row.product,
            quantity: row.quantity,
        });
    }
    Ok(grouped)
}

fn into_views(conn: &mut PgConnection, rows: Vec<OrderRow>) -> QueryResult<Vec<OrderView>> {
    let mut items = load_items(conn, rows.iter().map(|o| o.id).collect())?;
    Ok(rows
        .into_iter()
        .map(|o| OrderView {
            items: items.remove(&o.id).unwrap_or_default(),
            id: o.id,
            order_number: o.order_number,
            customer_id: o.customer_id,
            order_date: o.order_date,
            address: o.address,
        })
        .collect())
}

fn load_order(conn: &mut PgConnection, id: i32) -> QueryResult<Option<OrderView>> {
    let order = orders::table
        .find(id)
        .select(OrderRow::as_select())
        .first(conn)
        .optional()?;

    let Some(order) = order else {
        return Ok(None);
    };
    Ok(into_views(conn, vec![order])?.pop())
}

/// Computes the next order number. Holds a lock on `orders` until the
/// surrounding transaction ends so concurrent creators cannot read the same
/// highest id.
fn generate_order_number(conn: &mut PgConnection) -> QueryResult<String> {
    diesel::sql_query("LOCK TABLE orders IN SHARE ROW EXCLUSIVE MODE").execute(conn)?;
    let highest_id: Option<i32> = orders::table.select(max(orders::id)).first(conn)?;
    Ok(next_order_number(highest_id))
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrderRecord) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Order number, unless the caller supplied one
            let order_number = match order.order_number {
                Some(number) => number,
                None => generate_order_number(conn)?,
            };

            // 2. Insert the order
            let order_id: i32 = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    order_number: &order_number,
                    customer_id: order.customer_id,
                    order_date: order.order_date,
                    address: &order.address,
                })
                .returning(orders::id)
                .get_result(conn)?;

            // 3. Insert its items
            if !order.items.is_empty() {
                diesel::insert_into(order_items::table)
                    .values(&new_item_rows(order_id, &order.items))
                    .execute(conn)?;
            }

            load_order(conn, order_id)?
                .ok_or_else(|| DomainError::Internal(format!("order {order_id} vanished")))
        })
    }

    fn find_by_id(&self, id: i32) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(load_order(&mut conn, id)?)
    }

    fn list(&self, filter: &OrderFilter) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = orders::table
            .select(OrderRow::as_select())
            .order(orders::id.asc())
            .into_boxed();

        if let Some(names) = &filter.products {
            query = query.filter(
                orders::id.eq_any(
                    order_items::table
                        .inner_join(products::table)
                        .filter(products::name.eq_any(names.clone()))
                        .select(order_items::order_id),
                ),
            );
        }
        if let Some(customer) = &filter.customer {
            query = query.filter(
                orders::customer_id.eq_any(
                    customers::table
                        .filter(customers::name.eq(customer.clone()))
                        .select(customers::id),
                ),
            );
        }

        conn.transaction::<_, DomainError, _>(|conn| {
            let rows = query.load(conn)?;
            Ok(into_views(conn, rows)?)
        })
    }

    fn update(&self, id: i32, update: OrderUpdateRecord) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Order fields
            let touched = diesel::update(orders::table.find(id))
                .set((
                    orders::order_date.eq(update.order_date),
                    orders::address.eq(&update.address),
                ))
                .execute(conn)?;
            if touched == 0 {
                return Err(DomainError::not_found(format!("Order {id}")));
            }

            // 2. Items kept by id; a missing row means the plan is stale
            for (item_id, item) in &update.items.update {
                let touched = diesel::update(
                    order_items::table
                        .filter(order_items::id.eq(*item_id))
                        .filter(order_items::order_id.eq(id)),
                )
                .set((
                    order_items::product_id.eq(item.product_id),
                    order_items::quantity.eq(item.quantity),
                ))
                .execute(conn)?;
                if touched == 0 {
                    return Err(DomainError::Conflict(format!(
                        "Order item {item_id} no longer belongs to order {id}"
                    )));
                }
            }

            // 3. New items
            if !update.items.insert.is_empty() {
                diesel::insert_into(order_items::table)
                    .values(&new_item_rows(id, &update.items.insert))
                    .execute(conn)?;
            }

            // 4. Items no longer listed
            if !update.items.delete.is_empty() {
                diesel::delete(
                    order_items::table
                        .filter(order_items::order_id.eq(id))
                        .filter(order_items::id.eq_any(update.items.delete.clone())),
                )
                .execute(conn)?;
            }

            load_order(conn, id)?.ok_or_else(|| DomainError::not_found(format!("Order {id}")))
        })
    }
}
