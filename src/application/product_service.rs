use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{NewProduct, Product};
use crate::domain::validation::validate_weight;

pub struct ProductService<R> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        self.repo.list()
    }

    pub fn create_product(&self, product: NewProduct) -> Result<Product, DomainError> {
        let weight = validate_weight(product.weight)?;
        let product = self.repo.create(NewProduct {
            name: product.name,
            weight,
        })?;
        log::info!("Created product {} ({}kg)", product.name, product.weight);
        Ok(product)
    }
}
