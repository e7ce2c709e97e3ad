//! In-memory repositories for service tests.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::customer::{Customer, CustomerInput};
use crate::domain::errors::DomainError;
use crate::domain::order::{
    ItemRecord, NewOrderRecord, OrderFilter, OrderItemView, OrderUpdateRecord, OrderView,
};
use crate::domain::order_number::next_order_number;
use crate::domain::ports::{CustomerRepository, OrderRepository, ProductRepository};
use crate::domain::product::{NewProduct, Product};

#[derive(Default)]
struct Store {
    customers: Vec<Customer>,
    products: Vec<Product>,
    orders: Vec<OrderView>,
    next_item_id: i32,
}

impl Store {
    fn item_view(&mut self, item: ItemRecord) -> Result<OrderItemView, DomainError> {
        let product = self
            .products
            .iter()
            .find(|p| p.id == item.product_id)
            .ok_or_else(|| DomainError::Internal("foreign key violation".to_string()))?;
        let view = OrderItemView {
            id: self.next_item_id + 1,
            product_id: product.id,
            product: product.name.clone(),
            quantity: item.quantity,
        };
        self.next_item_id += 1;
        Ok(view)
    }
}

/// Shared state behind every repository port; clone it to hand the same
/// store to several services.
#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    inner: Arc<Mutex<Store>>,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, Store> {
        self.inner.lock().expect("store lock poisoned")
    }

    pub(crate) fn add_customer(&self, input: CustomerInput) -> Customer {
        CustomerRepository::create(self, input).expect("add customer")
    }

    pub(crate) fn add_product(&self, product: NewProduct) -> Product {
        ProductRepository::create(self, product).expect("add product")
    }

    pub(crate) fn order_count(&self) -> usize {
        self.lock().orders.len()
    }

    pub(crate) fn item_exists(&self, item_id: i32) -> bool {
        self.lock()
            .orders
            .iter()
            .any(|o| o.items.iter().any(|i| i.id == item_id))
    }
}

impl CustomerRepository for InMemoryStore {
    fn list(&self) -> Result<Vec<Customer>, DomainError> {
        Ok(self.lock().customers.clone())
    }

    fn create(&self, input: CustomerInput) -> Result<Customer, DomainError> {
        let mut store = self.lock();
        let customer = Customer {
            id: store.customers.len() as i32 + 1,
            name: input.name,
            contact_number: input.contact_number,
            email: input.email,
        };
        store.customers.push(customer.clone());
        Ok(customer)
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Customer>, DomainError> {
        Ok(self.lock().customers.iter().find(|c| c.id == id).cloned())
    }

    fn update(&self, id: i32, input: CustomerInput) -> Result<Option<Customer>, DomainError> {
        let mut store = self.lock();
        let Some(customer) = store.customers.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        customer.name = input.name;
        customer.contact_number = input.contact_number;
        customer.email = input.email;
        Ok(Some(customer.clone()))
    }
}

impl ProductRepository for InMemoryStore {
    fn list(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.lock().products.clone())
    }

    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut store = self.lock();
        if store.products.iter().any(|p| p.name == product.name) {
            return Err(DomainError::validation(
                "name",
                "product with this name already exists.",
            ));
        }
        let product = Product {
            id: store.products.len() as i32 + 1,
            name: product.name,
            weight: product.weight,
        };
        store.products.push(product.clone());
        Ok(product)
    }

    fn find_by_names(&self, names: &[String]) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .lock()
            .products
            .iter()
            .filter(|p| names.contains(&p.name))
            .cloned()
            .collect())
    }
}

impl OrderRepository for InMemoryStore {
    fn create(&self, order: NewOrderRecord) -> Result<OrderView, DomainError> {
        let mut store = self.lock();
        let id = store.orders.iter().map(|o| o.id).max().unwrap_or(0) + 1;
        let order_number = order
            .order_number
            .unwrap_or_else(|| next_order_number(store.orders.iter().map(|o| o.id).max()));
        let items = order
            .items
            .into_iter()
            .map(|item| store.item_view(item))
            .collect::<Result<Vec<_>, _>>()?;
        let view = OrderView {
            id,
            order_number,
            customer_id: order.customer_id,
            order_date: order.order_date,
            address: order.address,
            items,
        };
        store.orders.push(view.clone());
        Ok(view)
    }

    fn find_by_id(&self, id: i32) -> Result<Option<OrderView>, DomainError> {
        Ok(self.lock().orders.iter().find(|o| o.id == id).cloned())
    }

    fn list(&self, filter: &OrderFilter) -> Result<Vec<OrderView>, DomainError> {
        let store = self.lock();
        let customer_name = |id: i32| {
            store
                .customers
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.name.as_str())
        };
        Ok(store
            .orders
            .iter()
            .filter(|o| match &filter.products {
                Some(names) => o.items.iter().any(|i| names.contains(&i.product)),
                None => true,
            })
            .filter(|o| match &filter.customer {
                Some(name) => customer_name(o.customer_id) == Some(name.as_str()),
                None => true,
            })
            .cloned()
            .collect())
    }

    fn update(&self, id: i32, update: OrderUpdateRecord) -> Result<OrderView, DomainError> {
        let mut store = self.lock();
        let position = store
            .orders
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| DomainError::not_found(format!("Order {id}")))?;

        let mut items = Vec::new();
        for item in &store.orders[position].items {
            if update.items.delete.contains(&item.id) {
                continue;
            }
            match update.items.update.iter().find(|(item_id, _)| *item_id == item.id) {
                Some((_, record)) => {
                    let product = store
                        .products
                        .iter()
                        .find(|p| p.id == record.product_id)
                        .ok_or_else(|| DomainError::Internal("foreign key violation".to_string()))?;
                    items.push(OrderItemView {
                        id: item.id,
                        product_id: product.id,
                        product: product.name.clone(),
                        quantity: record.quantity,
                    });
                }
                None => items.push(item.clone()),
            }
        }
        for record in update.items.insert {
            items.push(store.item_view(record)?);
        }

        let order = &mut store.orders[position];
        order.order_date = update.order_date;
        order.address = update.address;
        order.items = items;
        Ok(order.clone())
    }
}
