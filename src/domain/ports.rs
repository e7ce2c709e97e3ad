use super::customer::{Customer, CustomerInput};
use super::errors::DomainError;
use super::order::{NewOrderRecord, OrderFilter, OrderUpdateRecord, OrderView};
use super::product::{NewProduct, Product};

pub trait CustomerRepository: Send + Sync + 'static {
    fn list(&self) -> Result<Vec<Customer>, DomainError>;
    fn create(&self, input: CustomerInput) -> Result<Customer, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<Customer>, DomainError>;
    /// Returns `None` when no customer has this id.
    fn update(&self, id: i32, input: CustomerInput) -> Result<Option<Customer>, DomainError>;
}

pub trait ProductRepository: Send + Sync + 'static {
    fn list(&self) -> Result<Vec<Product>, DomainError>;
    fn create(&self, product: NewProduct) -> Result<Product, DomainError>;
    fn find_by_names(&self, names: &[String]) -> Result<Vec<Product>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Inserts the order and its items atomically, generating the order
    /// number when the record carries none.
    fn create(&self, order: NewOrderRecord) -> Result<OrderView, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<OrderView>, DomainError>;
    fn list(&self, filter: &OrderFilter) -> Result<Vec<OrderView>, DomainError>;
    /// Applies field and item changes atomically.
    fn update(&self, id: i32, update: OrderUpdateRecord) -> Result<OrderView, DomainError>;
}
