pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod payment;
pub mod scheduler;
pub mod schema;
pub mod validation;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::{CatalogService, OrderService, PromotionService};
use domain::errors::DomainError;
use domain::ports::{
    CatalogRepository, CustomerRepository, FeedbackRepository, OrderRepository,
    PromotionRepository,
};
use infrastructure::{
    DieselCatalogRepository, DieselCustomerRepository, DieselFeedbackRepository,
    DieselOrderRepository, DieselPromotionRepository,
};
use payment::{PaymentService, Reconciler, ZaloPayClient};

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), DomainError> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DomainError::Internal(format!("failed to run migrations: {e}")))?;
    for version in applied {
        log::info!("Applied migration {version}");
    }
    Ok(())
}

/// Everything a request handler needs, shared across actix workers.
#[derive(Clone)]
pub struct AppState {
    pub orders: OrderService,
    pub promotions: PromotionService,
    pub catalog: CatalogService,
    pub payments: PaymentService,
}

/// Repository implementations backing the services.
pub struct Repositories {
    pub orders: Arc<dyn OrderRepository>,
    pub promotions: Arc<dyn PromotionRepository>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
    pub customers: Arc<dyn CustomerRepository>,
}

impl Repositories {
    pub fn postgres(pool: DbPool) -> Self {
        Self {
            orders: Arc::new(DieselOrderRepository::new(pool.clone())),
            promotions: Arc::new(DieselPromotionRepository::new(pool.clone())),
            catalog: Arc::new(DieselCatalogRepository::new(pool.clone())),
            feedback: Arc::new(DieselFeedbackRepository::new(pool.clone())),
            customers: Arc::new(DieselCustomerRepository::new(pool)),
        }
    }
}

impl AppState {
    pub fn new(repos: Repositories, reconciler: Reconciler, gateway: Arc<ZaloPayClient>) -> Self {
        Self {
            orders: OrderService::new(
                Arc::clone(&repos.orders),
                Arc::clone(&repos.promotions),
                Arc::clone(&repos.catalog),
            ),
            promotions: PromotionService::new(repos.promotions),
            catalog: CatalogService::new(repos.catalog, repos.feedback, repos.customers),
            payments: PaymentService::new(gateway, repos.orders, reconciler),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::list_orders,
        handlers::orders::create_order,
        handlers::orders::get_order,
        handlers::orders::update_order,
        handlers::orders::order_items,
        handlers::promotions::list_promotions,
        handlers::promotions::create_promotion,
        handlers::promotions::get_promotion,
        handlers::promotions::update_promotion,
        handlers::promotions::delete_promotion,
        handlers::promotions::toggle_promotion,
        handlers::promotions::apply_promotion,
        handlers::payment::create_payment,
        handlers::payment::check_order_status,
        handlers::payment::check_pending_orders,
        handlers::payment::callback,
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::product_feedback,
        handlers::feedback::create_feedback,
        handlers::feedback::update_feedback,
        handlers::feedback::delete_feedback,
        handlers::skin_types::list_skin_types,
        handlers::skin_types::get_skin_type,
        handlers::skin_types::create_skin_type,
        handlers::skin_types::update_skin_type,
        handlers::skin_types::delete_skin_type,
    ),
    tags(
        (name = "orders", description = "Checkout and staff order management"),
        (name = "promotions", description = "Discount codes"),
        (name = "payment", description = "ZaloPay payments and reconciliation"),
        (name = "customers"),
        (name = "products"),
        (name = "feedback"),
        (name = "skin-types"),
    )
)]
pub struct ApiDoc;

/// Registers the API routes, Swagger UI and access logging on an `App`.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .configure(handlers::configure);
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(state);
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure_app)
    })
    .bind((host.to_string(), port))?
    .run())
}
