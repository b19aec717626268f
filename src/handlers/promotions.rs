use actix_web::{web, HttpResponse};
use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{no_content, non_negative_amount, positive_amount, run_blocking, sort_from};
use crate::domain::pagination::{PageRequest, Paginated};
use crate::domain::promotion::{
    DiscountQuote, DiscountType, NewPromotion, Promotion, PromotionPatch, PromotionQuery,
    PromotionSortField,
};
use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePromotionRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "code must be 1-50 characters"))]
    pub code: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub discount_type: DiscountType,
    #[validate(custom(function = "positive_amount"))]
    #[schema(value_type = String)]
    pub discount_value: BigDecimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[validate(custom(function = "non_negative_amount"))]
    #[schema(value_type = Option<String>)]
    pub min_order_value: Option<BigDecimal>,
    /// Zero or absent means uncapped.
    #[validate(custom(function = "non_negative_amount"))]
    #[schema(value_type = Option<String>)]
    pub max_discount_amount: Option<BigDecimal>,
    #[validate(range(min = 1, message = "usage limit must be at least 1"))]
    pub usage_limit: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePromotionRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "code must be 1-50 characters"))]
    pub code: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub discount_type: Option<DiscountType>,
    #[validate(custom(function = "positive_amount"))]
    #[schema(value_type = Option<String>)]
    pub discount_value: Option<BigDecimal>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[validate(custom(function = "non_negative_amount"))]
    #[schema(value_type = Option<String>)]
    pub min_order_value: Option<BigDecimal>,
    #[validate(custom(function = "non_negative_amount"))]
    #[schema(value_type = Option<String>)]
    pub max_discount_amount: Option<BigDecimal>,
    #[validate(range(min = 1, message = "usage limit must be at least 1"))]
    pub usage_limit: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ApplyPromotionRequest {
    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
    #[validate(custom(function = "non_negative_amount"))]
    #[schema(value_type = String)]
    pub subtotal: BigDecimal,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListPromotionsParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// `createdAt` (default), `start_date`, `end_date` or `name`.
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    /// Case-insensitive match on name or code.
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

/// GET /api/promotions
#[utoipa::path(
    get,
    path = "/api/promotions",
    params(ListPromotionsParams),
    responses((status = 200, description = "Paginated promotions", body = Paginated<Promotion>)),
    tag = "promotions"
)]
pub async fn list_promotions(
    state: web::Data<AppState>,
    query: web::Query<ListPromotionsParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let query = PromotionQuery {
        page: PageRequest::new(params.page, params.limit),
        sort: sort_from(
            params.sort_by.as_deref(),
            params.sort_order.as_deref(),
            PromotionSortField::parse,
        ),
        search: params.search,
        is_active: params.is_active,
    };
    let promotions = state.promotions.clone();
    let page = run_blocking(move || promotions.list(&query)).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// POST /api/promotions
#[utoipa::path(
    post,
    path = "/api/promotions",
    request_body = CreatePromotionRequest,
    responses(
        (status = 201, description = "Promotion created", body = Promotion),
        (status = 400, description = "Invalid promotion terms"),
        (status = 409, description = "Code already in use"),
    ),
    tag = "promotions"
)]
pub async fn create_promotion(
    state: web::Data<AppState>,
    body: web::Json<CreatePromotionRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let new_promotion = NewPromotion {
        name: body.name.trim().to_string(),
        code: body.code.trim().to_string(),
        description: body.description,
        discount_type: body.discount_type,
        discount_value: body.discount_value,
        start_date: body.start_date,
        end_date: body.end_date,
        min_order_value: body.min_order_value.unwrap_or_else(BigDecimal::zero),
        max_discount_amount: body.max_discount_amount.unwrap_or_else(BigDecimal::zero),
        usage_limit: body.usage_limit,
    };
    let promotions = state.promotions.clone();
    let promotion = run_blocking(move || promotions.create(new_promotion)).await?;
    log::info!("Created promotion {} ({})", promotion.id, promotion.code);

    Ok(HttpResponse::Created().json(promotion))
}

/// GET /api/promotions/{id}
#[utoipa::path(
    get,
    path = "/api/promotions/{id}",
    params(("id" = Uuid, Path, description = "Promotion UUID")),
    responses(
        (status = 200, description = "Promotion found", body = Promotion),
        (status = 404, description = "Promotion not found"),
    ),
    tag = "promotions"
)]
pub async fn get_promotion(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let promotions = state.promotions.clone();
    let promotion = run_blocking(move || promotions.get(id)).await?;
    Ok(HttpResponse::Ok().json(promotion))
}

/// PUT /api/promotions/{id}
#[utoipa::path(
    put,
    path = "/api/promotions/{id}",
    params(("id" = Uuid, Path, description = "Promotion UUID")),
    request_body = UpdatePromotionRequest,
    responses(
        (status = 200, description = "Promotion updated", body = Promotion),
        (status = 400, description = "Invalid promotion terms"),
        (status = 404, description = "Promotion not found"),
    ),
    tag = "promotions"
)]
pub async fn update_promotion(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePromotionRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let patch = PromotionPatch {
        name: body.name.map(|n| n.trim().to_string()),
        code: body.code.map(|c| c.trim().to_string()),
        description: body.description,
        discount_type: body.discount_type,
        discount_value: body.discount_value,
        start_date: body.start_date,
        end_date: body.end_date,
        min_order_value: body.min_order_value,
        max_discount_amount: body.max_discount_amount,
        usage_limit: body.usage_limit,
        is_active: body.is_active,
    };
    let promotions = state.promotions.clone();
    let promotion = run_blocking(move || promotions.update(id, patch)).await?;
    Ok(HttpResponse::Ok().json(promotion))
}

/// DELETE /api/promotions/{id}
#[utoipa::path(
    delete,
    path = "/api/promotions/{id}",
    params(("id" = Uuid, Path, description = "Promotion UUID")),
    responses(
        (status = 204, description = "Promotion deleted"),
        (status = 404, description = "Promotion not found"),
    ),
    tag = "promotions"
)]
pub async fn delete_promotion(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let promotions = state.promotions.clone();
    run_blocking(move || promotions.delete(id)).await?;
    log::info!("Deleted promotion {id}");
    Ok(no_content())
}

/// POST /api/promotions/{id}/toggle-active
#[utoipa::path(
    post,
    path = "/api/promotions/{id}/toggle-active",
    params(("id" = Uuid, Path, description = "Promotion UUID")),
    responses(
        (status = 200, description = "Promotion with flipped is_active", body = Promotion),
        (status = 404, description = "Promotion not found"),
    ),
    tag = "promotions"
)]
pub async fn toggle_promotion(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let promotions = state.promotions.clone();
    let promotion = run_blocking(move || promotions.toggle_active(id)).await?;
    log::info!("Promotion {} is_active={}", promotion.id, promotion.is_active);
    Ok(HttpResponse::Ok().json(promotion))
}

/// POST /api/promotions/apply
///
/// Quotes the discount a code would give a cart subtotal. Does not consume
/// a use of the promotion.
#[utoipa::path(
    post,
    path = "/api/promotions/apply",
    request_body = ApplyPromotionRequest,
    responses(
        (status = 200, description = "Discount quote", body = DiscountQuote),
        (status = 400, description = "Promotion not applicable"),
        (status = 404, description = "Unknown code"),
    ),
    tag = "promotions"
)]
pub async fn apply_promotion(
    state: web::Data<AppState>,
    body: web::Json<ApplyPromotionRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let promotions = state.promotions.clone();
    let quote =
        run_blocking(move || promotions.quote(&body.code, body.subtotal, Utc::now())).await?;
    Ok(HttpResponse::Ok().json(quote))
}
