use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::order::{NewOrder, OrderChanges, OrderFilter, OrderItemInput, OrderView};
use crate::errors::AppError;
use crate::AppOrderService;

use super::date_format::{format_date, parse_date};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    /// Existing item id. Only honoured on update; items without one are added.
    #[serde(default)]
    pub id: Option<i32>,
    /// Product name.
    #[schema(example = "Widget")]
    pub product: String,
    pub quantity: i32,
}

impl From<OrderItemRequest> for OrderItemInput {
    fn from(item: OrderItemRequest) -> Self {
        OrderItemInput {
            id: item.id,
            product: item.product,
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    /// Customer id.
    pub customer: i32,
    #[schema(example = "31/12/2026")]
    pub order_date: String,
    pub address: String,
    pub order_item: Vec<OrderItemRequest>,
}

impl CreateOrderRequest {
    pub fn into_new_order(self) -> Result<NewOrder, AppError> {
        Ok(NewOrder {
            order_number: None,
            customer_id: self.customer,
            order_date: parse_date("order_date", &self.order_date)?,
            address: self.address,
            items: self
                .order_item
                .into_iter()
                .map(|item| OrderItemInput {
                    id: None,
                    ..OrderItemInput::from(item)
                })
                .collect(),
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    /// Keeps the stored date when absent.
    #[schema(example = "31/12/2026")]
    pub order_date: Option<String>,
    /// Keeps the stored address when absent.
    pub address: Option<String>,
    /// The complete item list after the update.
    pub order_item: Vec<OrderItemRequest>,
}

impl UpdateOrderRequest {
    pub fn into_changes(self) -> Result<OrderChanges, AppError> {
        Ok(OrderChanges {
            order_date: self
                .order_date
                .map(|d| parse_date("order_date", &d))
                .transpose()?,
            address: self.address,
            items: self.order_item.into_iter().map(Into::into).collect(),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i32,
    pub product: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    #[schema(example = "ORD00001")]
    pub order_number: String,
    pub customer: i32,
    #[schema(example = "31/12/2026")]
    pub order_date: String,
    pub address: String,
    pub order_item: Vec<OrderItemResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        OrderResponse {
            id: o.id,
            order_number: o.order_number,
            customer: o.customer_id,
            order_date: format_date(o.order_date),
            address: o.address,
            order_item: o
                .items
                .into_iter()
                .map(|i| OrderItemResponse {
                    id: i.id,
                    product: i.product,
                    quantity: i.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersParams {
    /// Comma separated product names; matches orders with any of them.
    pub products: Option<String>,
    /// Exact customer name.
    pub customer: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders/
///
/// Lists orders with their items, optionally narrowed by product names and
/// customer name. Both filters must match when both are given.
#[utoipa::path(
    get,
    path = "/orders/",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "Matching orders", body = [OrderResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    service: web::Data<AppOrderService>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let filter = OrderFilter::from_params(params.products.as_deref(), params.customer.as_deref());

    let orders = web::block(move || service.list_orders(&filter))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /orders/
///
/// Creates an order together with its items in a single transaction. The
/// order number is generated, the order date may not be in the past and the
/// items may weigh at most 150 kg in total.
#[utoipa::path(
    post,
    path = "/orders/",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid date, customer, product or weight"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<AppOrderService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let order = body.into_inner().into_new_order()?;

    let order = web::block(move || service.create_order(order))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /orders/{id}/
#[utoipa::path(
    get,
    path = "/orders/{id}/",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<AppOrderService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let order = web::block(move || service.get_order(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PUT /orders/{id}/
///
/// Updates date and address and replaces the item list: items carrying an id
/// are updated in place, items without one are added and stored items left
/// out are deleted.
#[utoipa::path(
    put,
    path = "/orders/{id}/",
    params(("id" = i32, Path, description = "Order id")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Invalid date, item, product or weight"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    service: web::Data<AppOrderService>,
    path: web::Path<i32>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let changes = body.into_inner().into_changes()?;

    let order = web::block(move || service.update_order(id, changes))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}
