use bigdecimal::BigDecimal;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i32,
    pub name: String,
    /// Kilograms.
    pub weight: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub weight: BigDecimal,
}
