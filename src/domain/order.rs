use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::DomainError;
use super::pagination::{PageRequest, Sort};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Delivering,
    Completed,
    #[serde(alias = "canceled")]
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Delivering,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
        OrderStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "delivering" => Ok(OrderStatus::Delivering),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            "refunded" => Ok(OrderStatus::Refunded),
            other => Err(DomainError::InvalidInput(format!(
                "unknown order status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cod,
    Zalopay,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "cod",
            PaymentMethod::Zalopay => "zalopay",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cod" => Ok(PaymentMethod::Cod),
            "zalopay" => Ok(PaymentMethod::Zalopay),
            other => Err(DomainError::InvalidInput(format!(
                "unknown payment method '{other}'"
            ))),
        }
    }
}

/// Monetary breakdown of an order. `final_amount` is always
/// `subtotal - discount_amount + delivery_fee`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderTotals {
    #[schema(value_type = String)]
    pub subtotal: BigDecimal,
    #[schema(value_type = String)]
    pub discount_amount: BigDecimal,
    #[schema(value_type = String)]
    pub delivery_fee: BigDecimal,
    #[schema(value_type = String)]
    pub final_amount: BigDecimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub promotion_id: Option<Uuid>,
    #[schema(value_type = String)]
    pub subtotal: BigDecimal,
    #[schema(value_type = String)]
    pub discount_amount: BigDecimal,
    #[schema(value_type = String)]
    pub delivery_fee: BigDecimal,
    #[schema(value_type = String)]
    pub final_amount: BigDecimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_ref: Option<String>,
    pub canceled_reason: Option<String>,
    pub shipping_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderDetail {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: Uuid,
    pub promotion_id: Option<Uuid>,
    pub totals: OrderTotals,
    pub payment_method: PaymentMethod,
    pub shipping_address: Option<String>,
    pub lines: Vec<NewOrderLine>,
}

/// Fields staff may change after checkout. Monetary fields are fixed at
/// checkout and deliberately absent.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub canceled_reason: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub shipping_address: Option<String>,
}

impl OrderPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.canceled_reason.is_none()
            && self.payment_method.is_none()
            && self.shipping_address.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    FinalAmount,
    Status,
}

impl OrderSortField {
    /// Unknown fields fall back to `createdAt`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("updatedAt" | "updated_at") => OrderSortField::UpdatedAt,
            Some("final_amount" | "finalAmount") => OrderSortField::FinalAmount,
            Some("status") => OrderSortField::Status,
            _ => OrderSortField::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub page: PageRequest,
    pub sort: Sort<OrderSortField>,
    pub statuses: Vec<OrderStatus>,
    pub customer_id: Option<Uuid>,
    /// Case-insensitive substring match on the customer's name.
    pub customer_name: Option<String>,
}

/// One line of an order joined with its product and category.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderItemDetail {
    pub order_detail_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_image_url: String,
    pub product_category_id: Uuid,
    pub product_category_name: String,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub price: BigDecimal,
    #[schema(value_type = String)]
    pub total_price: BigDecimal,
    #[schema(value_type = String)]
    pub discounted_amount: BigDecimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderItems {
    pub order_id: Uuid,
    pub order_details: Vec<OrderItemDetail>,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    #[schema(value_type = String)]
    pub total_amount: BigDecimal,
    #[schema(value_type = String)]
    pub final_amount: BigDecimal,
}
