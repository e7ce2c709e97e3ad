use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::customer::{Customer, CustomerInput};
use crate::domain::errors::DomainError;
use crate::domain::ports::CustomerRepository;
use crate::schema::customers;

use super::models::{CustomerFields, CustomerRow};

#[derive(Clone)]
pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn fields(input: &CustomerInput) -> CustomerFields<'_> {
    CustomerFields {
        name: &input.name,
        contact_number: &input.contact_number,
        email: &input.email,
    }
}

impl CustomerRepository for DieselCustomerRepository {
    fn list(&self) -> Result<Vec<Customer>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = customers::table
            .select(CustomerRow::as_select())
            .order(customers::id.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    fn create(&self, input: CustomerInput) -> Result<Customer, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(customers::table)
            .values(&fields(&input))
            .returning(CustomerRow::as_returning())
            .get_result(&mut conn)?;

        Ok(row.into())
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Customer>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = customers::table
            .find(id)
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Customer::from))
    }

    fn update(&self, id: i32, input: CustomerInput) -> Result<Option<Customer>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(customers::table.find(id))
            .set(&fields(&input))
            .returning(CustomerRow::as_returning())
            .get_result(&mut conn)
            .optional()?;

        Ok(row.map(Customer::from))
    }
}
