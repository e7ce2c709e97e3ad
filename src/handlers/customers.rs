use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::customer::{Customer, CustomerInput};
use crate::errors::AppError;
use crate::AppCustomerService;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CustomerRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters."))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "Contact number must be 1 to 20 characters."))]
    pub contact_number: String,
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Email must be at most 254 characters.")
    )]
    pub email: String,
}

impl From<CustomerRequest> for CustomerInput {
    fn from(req: CustomerRequest) -> Self {
        CustomerInput {
            name: req.name,
            contact_number: req.contact_number,
            email: req.email,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerResponse {
    pub id: i32,
    pub name: String,
    pub contact_number: String,
    pub email: String,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        CustomerResponse {
            id: c.id,
            name: c.name,
            contact_number: c.contact_number,
            email: c.email,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /customers/
#[utoipa::path(
    get,
    path = "/customers/",
    responses(
        (status = 200, description = "All customers", body = [CustomerResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn list_customers(
    service: web::Data<AppCustomerService>,
) -> Result<HttpResponse, AppError> {
    let customers = web::block(move || service.list_customers())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<CustomerResponse> = customers.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /customers/
#[utoipa::path(
    post,
    path = "/customers/",
    request_body = CustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 400, description = "Invalid field values"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn create_customer(
    service: web::Data<AppCustomerService>,
    body: web::Json<CustomerRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let customer = web::block(move || service.create_customer(body.into()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CustomerResponse::from(customer)))
}

/// GET /customers/{id}/
#[utoipa::path(
    get,
    path = "/customers/{id}/",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer found", body = CustomerResponse),
        (status = 404, description = "Customer not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn get_customer(
    service: web::Data<AppCustomerService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let customer = web::block(move || service.get_customer(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CustomerResponse::from(customer)))
}

/// PUT /customers/{id}/
///
/// Replaces every field of the customer.
#[utoipa::path(
    put,
    path = "/customers/{id}/",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = CustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Invalid field values"),
        (status = 404, description = "Customer not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn update_customer(
    service: web::Data<AppCustomerService>,
    path: web::Path<i32>,
    body: web::Json<CustomerRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let customer = web::block(move || service.update_customer(id, body.into()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CustomerResponse::from(customer)))
}
