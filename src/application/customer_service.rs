use crate::domain::customer::{Customer, CustomerInput};
use crate::domain::errors::DomainError;
use crate::domain::ports::CustomerRepository;

pub struct CustomerService<R> {
    repo: R,
}

impl<R: CustomerRepository> CustomerService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_customers(&self) -> Result<Vec<Customer>, DomainError> {
        self.repo.list()
    }

    pub fn create_customer(&self, input: CustomerInput) -> Result<Customer, DomainError> {
        let customer = self.repo.create(input)?;
        log::info!("Created customer {} ({})", customer.id, customer.name);
        Ok(customer)
    }

    pub fn get_customer(&self, id: i32) -> Result<Customer, DomainError> {
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found(format!("Customer {id}")))
    }

    pub fn update_customer(&self, id: i32, input: CustomerInput) -> Result<Customer, DomainError> {
        let customer = self
            .repo
            .update(id, input)?
            .ok_or_else(|| DomainError::not_found(format!("Customer {id}")))?;
        log::info!("Updated customer {}", customer.id);
        Ok(customer)
    }
}
