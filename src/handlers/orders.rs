use actix_web::{web, HttpResponse};
use bigdecimal::{BigDecimal, Zero};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{run_blocking, sort_from};
use crate::application::{Checkout, CheckoutLine};
use crate::domain::order::{
    Order, OrderItems, OrderPatch, OrderQuery, OrderSortField, OrderStatus, PaymentMethod,
};
use crate::domain::pagination::{PageRequest, Paginated};
use crate::errors::AppError;
use crate::AppState;

// ── Request DTOs ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CheckoutItemRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, max = 1000, message = "quantity must be between 1 and 1000"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    #[validate(
        length(min = 1, message = "order must contain at least one item"),
        nested
    )]
    pub items: Vec<CheckoutItemRequest>,
    #[validate(length(min = 1, max = 50, message = "promotion code must be 1-50 characters"))]
    pub promotion_code: Option<String>,
    /// Decimal amount, e.g. "30000". Defaults to zero.
    #[schema(value_type = Option<String>)]
    pub delivery_fee: Option<BigDecimal>,
    /// Defaults to `cod`.
    pub payment_method: Option<PaymentMethod>,
    #[validate(length(max = 500, message = "shipping address is too long"))]
    pub shipping_address: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    #[validate(length(max = 500, message = "canceled reason is too long"))]
    pub canceled_reason: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    #[validate(length(max = 500, message = "shipping address is too long"))]
    pub shipping_address: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListOrdersParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// `createdAt` (default), `updatedAt`, `final_amount` or `status`.
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    /// Comma-separated statuses, e.g. `pending,delivering`.
    pub status: Option<String>,
    pub customer_id: Option<Uuid>,
    /// Case-insensitive search on the customer's name.
    pub name: Option<String>,
}

impl ListOrdersParams {
    fn into_query(self) -> Result<OrderQuery, AppError> {
        let statuses = match self.status.as_deref() {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse::<OrderStatus>)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        Ok(OrderQuery {
            page: PageRequest::new(self.page, self.limit),
            sort: sort_from(
                self.sort_by.as_deref(),
                self.sort_order.as_deref(),
                OrderSortField::parse,
            ),
            statuses,
            customer_id: self.customer_id,
            customer_name: self.name,
        })
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/orders
///
/// Prices the cart from current catalogue prices, applies the promotion
/// code if given and stores the order with its lines.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, description = "Invalid cart or promotion"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let checkout = Checkout {
        customer_id: body.customer_id,
        lines: body
            .items
            .into_iter()
            .map(|i| CheckoutLine {
                product_id: i.product_id,
                quantity: i.quantity,
            })
            .collect(),
        promotion_code: body.promotion_code,
        delivery_fee: body.delivery_fee.unwrap_or_else(BigDecimal::zero),
        payment_method: body.payment_method.unwrap_or(PaymentMethod::Cod),
        shipping_address: body.shipping_address,
    };

    let orders = state.orders.clone();
    let order = run_blocking(move || orders.checkout(checkout, Utc::now())).await?;
    log::info!("Created order {} for customer {}", order.id, order.customer_id);

    Ok(HttpResponse::Created().json(order))
}

/// GET /api/orders/{id}
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let orders = state.orders.clone();
    let order = run_blocking(move || orders.get_order(id)).await?;
    Ok(HttpResponse::Ok().json(order))
}

/// GET /api/orders
#[utoipa::path(
    get,
    path = "/api/orders",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "Paginated list of orders", body = Paginated<Order>),
        (status = 400, description = "Unknown status filter"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner().into_query()?;
    let orders = state.orders.clone();
    let page = run_blocking(move || orders.list_orders(&query)).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// PUT /api/orders/{id}
///
/// Staff edit. Any status may be set; monetary fields cannot change.
#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 400, description = "Empty or invalid update"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let patch = OrderPatch {
        status: body.status,
        canceled_reason: body.canceled_reason,
        payment_method: body.payment_method,
        shipping_address: body.shipping_address,
    };
    let orders = state.orders.clone();
    let order = run_blocking(move || orders.update_order(id, patch)).await?;
    log::info!("Order {} updated (status {})", order.id, order.status);

    Ok(HttpResponse::Ok().json(order))
}

/// GET /api/orders/{id}/items
///
/// Line items joined with product and category, plus the order totals.
#[utoipa::path(
    get,
    path = "/api/orders/{id}/items",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order items", body = OrderItems),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn order_items(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let orders = state.orders.clone();
    let items = run_blocking(move || orders.order_items(id)).await?;
    Ok(HttpResponse::Ok().json(items))
}
