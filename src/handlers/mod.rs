pub mod customers;
pub mod feedback;
pub mod orders;
pub mod payment;
pub mod products;
pub mod promotions;
pub mod skin_types;

use actix_web::{web, HttpResponse};
use bigdecimal::{BigDecimal, Zero};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::ValidationError;

use crate::domain::errors::DomainError;
use crate::domain::pagination::{PageRequest, Sort, SortOrder};
use crate::errors::AppError;

/// Runs a synchronous service call on actix's blocking pool.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    Ok(web::block(f).await??)
}

/// Plain `page`/`limit` for routes without sorting or filters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// 1-based page number (default 1).
    pub page: Option<i64>,
    /// Page size (default 10, max 100).
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// Builds a sort from raw `sortBy`/`sortOrder` query values.
pub(crate) fn sort_from<F>(
    sort_by: Option<&str>,
    sort_order: Option<&str>,
    parse: impl FnOnce(Option<&str>) -> F,
) -> Sort<F> {
    Sort {
        field: parse(sort_by),
        order: SortOrder::parse(sort_order),
    }
}

pub(crate) fn positive_amount(value: &BigDecimal) -> Result<(), ValidationError> {
    if value > &BigDecimal::zero() {
        Ok(())
    } else {
        Err(ValidationError::new("positive").with_message("must be greater than zero".into()))
    }
}

pub(crate) fn non_negative_amount(value: &BigDecimal) -> Result<(), ValidationError> {
    if value >= &BigDecimal::zero() {
        Ok(())
    } else {
        Err(ValidationError::new("non_negative").with_message("must not be negative".into()))
    }
}

pub(crate) fn no_content() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Registers every `/api` route plus JSON, query and path extractor
/// configs that answer malformed input with a JSON 400.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid request body: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid query string: {err}")).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid path parameter: {err}")).into()
    }))
    .service(
        web::scope("/api")
            .service(
                web::scope("/orders")
                    .route("", web::get().to(orders::list_orders))
                    .route("", web::post().to(orders::create_order))
                    .route("/{id}", web::get().to(orders::get_order))
                    .route("/{id}", web::put().to(orders::update_order))
                    .route("/{id}/items", web::get().to(orders::order_items)),
            )
            .service(
                web::scope("/promotions")
                    .route("", web::get().to(promotions::list_promotions))
                    .route("", web::post().to(promotions::create_promotion))
                    .route("/apply", web::post().to(promotions::apply_promotion))
                    .route("/{id}", web::get().to(promotions::get_promotion))
                    .route("/{id}", web::put().to(promotions::update_promotion))
                    .route("/{id}", web::delete().to(promotions::delete_promotion))
                    .route(
                        "/{id}/toggle-active",
                        web::post().to(promotions::toggle_promotion),
                    ),
            )
            .service(
                web::scope("/payment")
                    .route("/zalopay", web::post().to(payment::create_payment))
                    .route(
                        "/zalopay/orders/{id}/check",
                        web::post().to(payment::check_order_status),
                    )
                    .route(
                        "/zalopay/check-pending-orders",
                        web::get().to(payment::check_pending_orders),
                    )
                    .route("/callback", web::post().to(payment::callback)),
            )
            .service(
                web::scope("/customers")
                    .route("", web::get().to(customers::list_customers))
                    .route("/{id}", web::get().to(customers::get_customer)),
            )
            .service(
                web::scope("/products")
                    .route("", web::get().to(products::list_products))
                    .route("/{id}", web::get().to(products::get_product))
                    .route("/{id}/feedback", web::get().to(products::product_feedback)),
            )
            .service(
                web::scope("/feedback")
                    .route("", web::post().to(feedback::create_feedback))
                    .route("/{id}", web::put().to(feedback::update_feedback))
                    .route("/{id}", web::delete().to(feedback::delete_feedback)),
            )
            .service(
                web::scope("/skin-types")
                    .route("", web::get().to(skin_types::list_skin_types))
                    .route("", web::post().to(skin_types::create_skin_type))
                    .route("/{id}", web::get().to(skin_types::get_skin_type))
                    .route("/{id}", web::put().to(skin_types::update_skin_type))
                    .route("/{id}", web::delete().to(skin_types::delete_skin_type)),
            ),
    );
}
