pub mod customer;
pub mod errors;
pub mod order;
pub mod order_number;
pub mod ports;
pub mod product;
pub mod reconcile;
pub mod validation;
