use actix_web::{web, HttpResponse};
use uuid::Uuid;

use super::{run_blocking, PageParams};
use crate::domain::catalog::Customer;
use crate::domain::pagination::Paginated;
use crate::errors::AppError;
use crate::AppState;

/// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    params(PageParams),
    responses((status = 200, description = "Paginated customers", body = Paginated<Customer>)),
    tag = "customers"
)]
pub async fn list_customers(
    state: web::Data<AppState>,
    query: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let page = query.page_request();
    let catalog = state.catalog.clone();
    let customers = run_blocking(move || catalog.list_customers(page)).await?;
    Ok(HttpResponse::Ok().json(customers))
}

/// GET /api/customers/{id}
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer UUID")),
    responses(
        (status = 200, description = "Customer found", body = Customer),
        (status = 404, description = "Customer not found"),
    ),
    tag = "customers"
)]
pub async fn get_customer(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let catalog = state.catalog.clone();
    let customer = run_blocking(move || catalog.get_customer(id)).await?;
    Ok(HttpResponse::Ok().json(customer))
}
