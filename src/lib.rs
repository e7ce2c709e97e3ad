pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::customer_service::CustomerService;
use application::order_service::OrderService;
use application::product_service::ProductService;
use errors::AppError;
use handlers::{customers, orders, products, ApiDoc};
use infrastructure::customer_repo::DieselCustomerRepository;
use infrastructure::order_repo::DieselOrderRepository;
use infrastructure::product_repo::DieselProductRepository;

pub use config::Config;
pub use db::{create_pool, DbPool};

pub type AppCustomerService = CustomerService<DieselCustomerRepository>;
pub type AppProductService = ProductService<DieselProductRepository>;
pub type AppOrderService =
    OrderService<DieselOrderRepository, DieselProductRepository, DieselCustomerRepository>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for version in applied {
        log::info!("Applied migration {}", version);
    }
    Ok(())
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let customer_service = web::Data::new(CustomerService::new(DieselCustomerRepository::new(
        pool.clone(),
    )));
    let product_service = web::Data::new(ProductService::new(DieselProductRepository::new(
        pool.clone(),
    )));
    let order_service = web::Data::new(OrderService::new(
        DieselOrderRepository::new(pool.clone()),
        DieselProductRepository::new(pool.clone()),
        DieselCustomerRepository::new(pool),
    ));
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(customer_service.clone())
            .app_data(product_service.clone())
            .app_data(order_service.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::field("body", err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                AppError::field("query", err.to_string()).into()
            }))
            .wrap(Logger::default())
            .service(
                web::scope("/customers")
                    .route("/", web::get().to(customers::list_customers))
                    .route("/", web::post().to(customers::create_customer))
                    .route("/{id}/", web::get().to(customers::get_customer))
                    .route("/{id}/", web::put().to(customers::update_customer)),
            )
            .service(
                web::scope("/products")
                    .route("/", web::get().to(products::list_products))
                    .route("/", web::post().to(products::create_product)),
            )
            .service(
                web::scope("/orders")
                    .route("/", web::get().to(orders::list_orders))
                    .route("/", web::post().to(orders::create_order))
                    .route("/{id}/", web::get().to(orders::get_order))
                    .route("/{id}/", web::put().to(orders::update_order)),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
