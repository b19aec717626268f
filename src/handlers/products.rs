use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use super::{run_blocking, sort_from};
use crate::domain::catalog::{Feedback, Product, ProductDetail, ProductQuery, ProductSortField};
use crate::domain::pagination::{PageRequest, Paginated};
use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListProductsParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// `createdAt` (default), `name` or `price`.
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub category_id: Option<Uuid>,
    pub skin_type_id: Option<Uuid>,
    #[param(value_type = Option<String>)]
    pub min_price: Option<BigDecimal>,
    #[param(value_type = Option<String>)]
    pub max_price: Option<BigDecimal>,
    pub name: Option<String>,
}

/// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    params(ListProductsParams),
    responses(
        (status = 200, description = "Paginated products", body = Paginated<Product>),
        (status = 400, description = "Invalid price range"),
    ),
    tag = "products"
)]
pub async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ListProductsParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let query = ProductQuery {
        page: PageRequest::new(params.page, params.limit),
        sort: sort_from(
            params.sort_by.as_deref(),
            params.sort_order.as_deref(),
            ProductSortField::parse,
        ),
        category_id: params.category_id,
        skin_type_id: params.skin_type_id,
        min_price: params.min_price,
        max_price: params.max_price,
        name: params.name,
    };
    let catalog = state.catalog.clone();
    let page = run_blocking(move || catalog.list_products(&query)).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/products/{id}
///
/// Product with its feedback, category, skin type and related products.
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product detail", body = ProductDetail),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let catalog = state.catalog.clone();
    let detail = run_blocking(move || catalog.product_detail(id)).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// GET /api/products/{id}/feedback
#[utoipa::path(
    get,
    path = "/api/products/{id}/feedback",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Feedback, newest first", body = Vec<Feedback>),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn product_feedback(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let catalog = state.catalog.clone();
    let feedback = run_blocking(move || catalog.product_feedback(id)).await?;
    Ok(HttpResponse::Ok().json(feedback))
}
