use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::product::{NewProduct, Product};
use crate::errors::AppError;
use crate::AppProductService;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// A decimal given either as a JSON string (`"10.50"`) or a JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DecimalInput {
    Text(String),
    Number(serde_json::Number),
}

impl DecimalInput {
    pub fn to_decimal(&self, field: &str) -> Result<BigDecimal, AppError> {
        let raw = match self {
            DecimalInput::Text(s) => s.trim().to_string(),
            DecimalInput::Number(n) => n.to_string(),
        };
        BigDecimal::from_str(&raw)
            .map_err(|_| AppError::field(field, format!("'{raw}' is not a valid decimal.")))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters."))]
    pub name: String,
    /// Kilograms, between 0 and 25.
    #[schema(value_type = String, example = "10.00")]
    pub weight: DecimalInput,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    #[schema(example = "10.00")]
    pub weight: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            name: p.name,
            weight: p.weight.with_scale(2).to_string(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /products/
#[utoipa::path(
    get,
    path = "/products/",
    responses(
        (status = 200, description = "All products", body = [ProductResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn list_products(
    service: web::Data<AppProductService>,
) -> Result<HttpResponse, AppError> {
    let products = web::block(move || service.list_products())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<ProductResponse> = products.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /products/
///
/// Product names are unique; the weight must lie within 0 to 25 kg.
#[utoipa::path(
    post,
    path = "/products/",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid name or weight"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn create_product(
    service: web::Data<AppProductService>,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;
    let product = NewProduct {
        weight: body.weight.to_decimal("weight")?,
        name: body.name,
    };

    let product = web::block(move || service.create_product(product))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}
