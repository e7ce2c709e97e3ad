pub mod customers;
pub mod date_format;
pub mod orders;
pub mod products;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        customers::list_customers,
        customers::create_customer,
        customers::get_customer,
        customers::update_customer,
        products::list_products,
        products::create_product,
        orders::list_orders,
        orders::create_order,
        orders::get_order,
        orders::update_order,
    ),
    components(schemas(
        customers::CustomerRequest,
        customers::CustomerResponse,
        products::CreateProductRequest,
        products::ProductResponse,
        orders::OrderItemRequest,
        orders::CreateOrderRequest,
        orders::UpdateOrderRequest,
        orders::OrderItemResponse,
        orders::OrderResponse,
    )),
    tags(
        (name = "customers", description = "Customer records"),
        (name = "products", description = "Products and their weights"),
        (name = "orders", description = "Orders and their items"),
    )
)]
pub struct ApiDoc;
