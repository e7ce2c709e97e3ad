use std::collections::{BTreeSet, HashMap};

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};

use crate::domain::errors::DomainError;
use crate::domain::order::{
    ItemPlan, ItemRecord, NewOrder, NewOrderRecord, OrderChanges, OrderFilter, OrderItemInput,
    OrderUpdateRecord, OrderView,
};
use crate::domain::ports::{CustomerRepository, OrderRepository, ProductRepository};
use crate::domain::reconcile::{diff_by_key, DiffError};
use crate::domain::validation::{check_cumulative_weight, validate_order_date, validate_quantity};

/// Coordinates an order with its line items. Every write validates the whole
/// item list before anything is persisted.
pub struct OrderService<O, P, C> {
    orders: O,
    products: P,
    customers: C,
}

impl<O, P, C> OrderService<O, P, C>
where
    O: OrderRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    pub fn new(orders: O, products: P, customers: C) -> Self {
        Self {
            orders,
            products,
            customers,
        }
    }

    pub fn create_order(&self, order: NewOrder) -> Result<OrderView, DomainError> {
        validate_order_date(order.order_date, today())?;
        if self.customers.find_by_id(order.customer_id)?.is_none() {
            return Err(DomainError::validation(
                "customer",
                format!("Customer {} does not exist.", order.customer_id),
            ));
        }
        let product_ids = self.resolve_items(&order.items)?;

        let items = order
            .items
            .iter()
            .map(|item| item_record(&product_ids, item))
            .collect::<Result<Vec<_>, _>>()?;

        let view = self.orders.create(NewOrderRecord {
            order_number: order.order_number,
            customer_id: order.customer_id,
            order_date: order.order_date,
            address: order.address,
            items,
        })?;
        log::info!(
            "Created order {} ({} items) for customer {}",
            view.order_number,
            view.items.len(),
            view.customer_id
        );
        Ok(view)
    }

    pub fn get_order(&self, id: i32) -> Result<OrderView, DomainError> {
        self.orders
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found(format!("Order {id}")))
    }

    pub fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<OrderView>, DomainError> {
        self.orders.list(filter)
    }

    /// Updates date and address and makes the stored item set match
    /// `changes.items`: entries with an id update that item, entries without
    /// one are added, and stored items left out are deleted.
    pub fn update_order(&self, id: i32, changes: OrderChanges) -> Result<OrderView, DomainError> {
        let current = self.get_order(id)?;
        if let Some(order_date) = changes.order_date {
            validate_order_date(order_date, today())?;
        }
        let product_ids = self.resolve_items(&changes.items)?;

        let diff = diff_by_key(
            current.items.iter().map(|item| item.id),
            changes.items,
            |item| item.id,
        )
        .map_err(|e| match e {
            DiffError::Unknown(item_id) => DomainError::validation(
                "order_item",
                format!("Order item {item_id} does not belong to order {id}."),
            ),
            DiffError::Duplicate(item_id) => DomainError::validation(
                "order_item",
                format!("Order item {item_id} is listed more than once."),
            ),
        })?;

        let items = ItemPlan {
            update: diff
                .update
                .iter()
                .map(|(item_id, item)| {
                    item_record(&product_ids, item).map(|record| (*item_id, record))
                })
                .collect::<Result<_, _>>()?,
            insert: diff
                .insert
                .iter()
                .map(|item| item_record(&product_ids, item))
                .collect::<Result<_, _>>()?,
            delete: diff.delete,
        };
        log::debug!(
            "Order {id}: updating {} items, adding {}, removing {}",
            items.update.len(),
            items.insert.len(),
            items.delete.len()
        );

        let view = self.orders.update(
            id,
            OrderUpdateRecord {
                order_date: changes.order_date.unwrap_or(current.order_date),
                address: changes.address.unwrap_or(current.address),
                items,
            },
        )?;
        log::info!("Updated order {}", view.order_number);
        Ok(view)
    }

    /// Validates quantities and the cumulative weight of `items`, returning
    /// the id of every referenced product keyed by name.
    fn resolve_items(&self, items: &[OrderItemInput]) -> Result<HashMap<String, i32>, DomainError> {
        for item in items {
            validate_quantity(item.quantity)?;
        }

        let names: Vec<String> = items
            .iter()
            .map(|item| item.product.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let products = if names.is_empty() {
            Vec::new()
        } else {
            self.products.find_by_names(&names)?
        };

        let weights: HashMap<String, BigDecimal> = products
            .iter()
            .map(|p| (p.name.clone(), p.weight.clone()))
            .collect();
        let total = check_cumulative_weight(
            items.iter().map(|item| (item.product.as_str(), item.quantity)),
            &weights,
        )?;
        log::debug!("Order cumulative weight {total}kg");

        Ok(products.into_iter().map(|p| (p.name, p.id)).collect())
    }
}

fn item_record(
    product_ids: &HashMap<String, i32>,
    item: &OrderItemInput,
) -> Result<ItemRecord, DomainError> {
    let product_id = product_ids.get(&item.product).copied().ok_or_else(|| {
        DomainError::validation(
            "order_item",
            format!("Product '{}' does not exist.", item.product),
        )
    })?;
    Ok(ItemRecord {
        product_id,
        quantity: item.quantity,
    })
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::Days;

    use super::*;
    use crate::application::fakes::InMemoryStore;
    use crate::domain::customer::CustomerInput;
    use crate::domain::product::NewProduct;

    type Service = OrderService<InMemoryStore, InMemoryStore, InMemoryStore>;

    struct Fixture {
        store: InMemoryStore,
        service: Service,
        acme: i32,
    }

    fn fixture() -> Fixture {
        let store = InMemoryStore::default();
        let acme = store
            .add_customer(CustomerInput {
                name: "Acme".to_string(),
                contact_number: "555-0100".to_string(),
                email: "orders@acme.test".to_string(),
            })
            .id;
        store.add_product(NewProduct {
            name: "Widget".to_string(),
            weight: BigDecimal::from(10),
        });
        store.add_product(NewProduct {
            name: "Feather".to_string(),
            weight: BigDecimal::from_str("0.5").expect("valid decimal"),
        });
        let service = OrderService::new(store.clone(), store.clone(), store.clone());
        Fixture {
            store,
            service,
            acme,
        }
    }

    fn tomorrow() -> NaiveDate {
        today() + Days::new(1)
    }

    fn item(product: &str, quantity: i32) -> OrderItemInput {
        OrderItemInput {
            id: None,
            product: product.to_string(),
            quantity,
        }
    }

    fn existing(id: i32, product: &str, quantity: i32) -> OrderItemInput {
        OrderItemInput {
            id: Some(id),
            ..item(product, quantity)
        }
    }

    fn new_order(customer_id: i32, items: Vec<OrderItemInput>) -> NewOrder {
        NewOrder {
            order_number: None,
            customer_id,
            order_date: tomorrow(),
            address: "1 Main Street".to_string(),
            items,
        }
    }

    #[test]
    fn create_accepts_weight_up_to_cap() {
        let f = fixture();

        let two = f
            .service
            .create_order(new_order(f.acme, vec![item("Widget", 10), item("Widget", 10)]))
            .expect("100kg order");
        assert_eq!(two.items.len(), 2);

        let three = f
            .service
            .create_order(new_order(
                f.acme,
                vec![item("Widget", 10), item("Widget", 10), item("Widget", 10)],
            ))
            .expect("150kg order");
        assert_eq!(three.items.len(), 3);
    }

    #[test]
    fn create_rejects_weight_over_cap_and_stores_nothing() {
        let f = fixture();

        let err = f
            .service
            .create_order(new_order(
                f.acme,
                vec![
                    item("Widget", 10),
                    item("Widget", 10),
                    item("Widget", 10),
                    item("Widget", 1),
                ],
            ))
            .expect_err("160kg order");

        assert!(matches!(err, DomainError::Validation { field, .. } if field == "order_item"));
        assert_eq!(f.store.order_count(), 0);
    }

    #[test]
    fn create_generates_sequential_order_numbers() {
        let f = fixture();

        let numbers: Vec<String> = (0..3)
            .map(|_| {
                f.service
                    .create_order(new_order(f.acme, vec![item("Feather", 1)]))
                    .expect("create")
                    .order_number
            })
            .collect();

        assert_eq!(numbers, ["ORD00001", "ORD00002", "ORD00003"]);
    }

    #[test]
    fn create_keeps_explicit_order_number() {
        let f = fixture();
        let mut order = new_order(f.acme, vec![item("Feather", 1)]);
        order.order_number = Some("ORD-MANUAL".to_string());

        let view = f.service.create_order(order).expect("create");

        assert_eq!(view.order_number, "ORD-MANUAL");
    }

    #[test]
    fn create_rejects_past_date() {
        let f = fixture();
        let mut order = new_order(f.acme, vec![item("Widget", 1)]);
        order.order_date = today() - Days::new(1);

        let err = f.service.create_order(order).expect_err("past date");

        assert!(matches!(err, DomainError::Validation { field, .. } if field == "order_date"));
        assert_eq!(f.store.order_count(), 0);
    }

    #[test]
    fn create_accepts_today() {
        let f = fixture();
        let mut order = new_order(f.acme, vec![item("Widget", 1)]);
        order.order_date = today();

        assert!(f.service.create_order(order).is_ok());
    }

    #[test]
    fn create_rejects_unknown_product_and_customer() {
        let f = fixture();

        let err = f
            .service
            .create_order(new_order(f.acme, vec![item("Gizmo", 1)]))
            .expect_err("unknown product");
        assert!(matches!(err, DomainError::Validation { field, .. } if field == "order_item"));

        let err = f
            .service
            .create_order(new_order(f.acme + 100, vec![item("Widget", 1)]))
            .expect_err("unknown customer");
        assert!(matches!(err, DomainError::Validation { field, .. } if field == "customer"));
    }

    #[test]
    fn create_rejects_non_positive_quantity() {
        let f = fixture();
        let err = f
            .service
            .create_order(new_order(f.acme, vec![item("Widget", 0)]))
            .expect_err("zero quantity");
        assert!(matches!(err, DomainError::Validation { field, .. } if field == "order_item"));
    }

    #[test]
    fn update_reconciles_item_set() {
        let f = fixture();
        let order = f
            .service
            .create_order(new_order(f.acme, vec![item("Widget", 2), item("Feather", 4)]))
            .expect("create");
        let widget_item = order.items[0].id;
        let feather_item = order.items[1].id;

        let updated = f
            .service
            .update_order(
                order.id,
                OrderChanges {
                    order_date: None,
                    address: Some("2 Side Road".to_string()),
                    items: vec![existing(widget_item, "Feather", 3), item("Widget", 1)],
                },
            )
            .expect("update");

        assert_eq!(updated.order_number, order.order_number);
        assert_eq!(updated.order_date, order.order_date);
        assert_eq!(updated.address, "2 Side Road");
        assert_eq!(updated.items.len(), 2);
        assert!(updated.items.iter().all(|i| i.id != feather_item));
        let kept = updated
            .items
            .iter()
            .find(|i| i.id == widget_item)
            .expect("updated in place");
        assert_eq!((kept.product.as_str(), kept.quantity), ("Feather", 3));
        assert!(updated
            .items
            .iter()
            .any(|i| i.id != widget_item && i.product == "Widget" && i.quantity == 1));
        assert!(!f.store.item_exists(feather_item));
    }

    #[test]
    fn update_rejects_overweight_items_and_keeps_order() {
        let f = fixture();
        let order = f
            .service
            .create_order(new_order(f.acme, vec![item("Widget", 1)]))
            .expect("create");

        let err = f
            .service
            .update_order(
                order.id,
                OrderChanges {
                    order_date: None,
                    address: None,
                    items: vec![existing(order.items[0].id, "Widget", 16)],
                },
            )
            .expect_err("160kg");

        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(f.service.get_order(order.id).expect("get"), order);
    }

    #[test]
    fn update_rejects_foreign_item_id() {
        let f = fixture();
        let first = f
            .service
            .create_order(new_order(f.acme, vec![item("Widget", 1)]))
            .expect("create");
        let second = f
            .service
            .create_order(new_order(f.acme, vec![item("Widget", 1)]))
            .expect("create");

        let err = f
            .service
            .update_order(
                second.id,
                OrderChanges {
                    order_date: None,
                    address: None,
                    items: vec![existing(first.items[0].id, "Widget", 2)],
                },
            )
            .expect_err("foreign item");

        assert!(err.to_string().contains("does not belong"));
    }

    #[test]
    fn update_rejects_past_date() {
        let f = fixture();
        let order = f
            .service
            .create_order(new_order(f.acme, vec![item("Widget", 1)]))
            .expect("create");

        let err = f
            .service
            .update_order(
                order.id,
                OrderChanges {
                    order_date: Some(today() - Days::new(3)),
                    address: None,
                    items: vec![],
                },
            )
            .expect_err("past date");

        assert!(matches!(err, DomainError::Validation { field, .. } if field == "order_date"));
    }

    #[test]
    fn update_unknown_order_is_not_found() {
        let f = fixture();
        let err = f
            .service
            .update_order(
                99,
                OrderChanges {
                    order_date: None,
                    address: None,
                    items: vec![],
                },
            )
            .expect_err("missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn list_applies_filter() {
        let f = fixture();
        let globex = f
            .store
            .add_customer(CustomerInput {
                name: "Globex".to_string(),
                contact_number: "555-0199".to_string(),
                email: "buy@globex.test".to_string(),
            })
            .id;
        let acme_widget = f
            .service
            .create_order(new_order(f.acme, vec![item("Widget", 1)]))
            .expect("create");
        f.service
            .create_order(new_order(f.acme, vec![item("Feather", 1)]))
            .expect("create");
        f.service
            .create_order(new_order(globex, vec![item("Widget", 1)]))
            .expect("create");

        let all = f
            .service
            .list_orders(&OrderFilter::default())
            .expect("list");
        assert_eq!(all.len(), 3);

        let filtered = f
            .service
            .list_orders(&OrderFilter::from_params(Some("Widget"), Some("Acme")))
            .expect("list");
        assert_eq!(filtered, vec![acme_widget]);
    }
}
