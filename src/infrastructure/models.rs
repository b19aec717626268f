use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::catalog::{Category, Customer, Feedback, Product, SkinType};
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderDetail};
use crate::domain::promotion::Promotion;
use crate::schema::{
    categories, customers, feedbacks, order_details, orders, products, promotions, skin_types,
};

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub promotion_id: Option<Uuid>,
    pub subtotal: BigDecimal,
    pub discount_amount: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub final_amount: BigDecimal,
    pub status: String,
    pub payment_method: String,
    pub payment_ref: Option<String>,
    pub canceled_reason: Option<String>,
    pub shipping_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    pub fn into_domain(self) -> Result<Order, DomainError> {
        let status = self
            .status
            .parse()
            .map_err(|e| DomainError::Internal(format!("order {}: {e}", self.id)))?;
        let payment_method = self
            .payment_method
            .parse()
            .map_err(|e| DomainError::Internal(format!("order {}: {e}", self.id)))?;
        Ok(Order {
            id: self.id,
            customer_id: self.customer_id,
            promotion_id: self.promotion_id,
            subtotal: self.subtotal,
            discount_amount: self.discount_amount,
            delivery_fee: self.delivery_fee,
            final_amount: self.final_amount,
            status,
            payment_method,
            payment_ref: self.payment_ref,
            canceled_reason: self.canceled_reason,
            shipping_address: self.shipping_address,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub promotion_id: Option<Uuid>,
    pub subtotal: BigDecimal,
    pub discount_amount: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub final_amount: BigDecimal,
    pub status: String,
    pub payment_method: String,
    pub shipping_address: Option<String>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = orders)]
pub struct OrderChangeset {
    pub status: Option<String>,
    pub canceled_reason: Option<String>,
    pub payment_method: Option<String>,
    pub shipping_address: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_details)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderDetailRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

impl From<OrderDetailRow> for OrderDetail {
    fn from(r: OrderDetailRow) -> Self {
        OrderDetail {
            id: r.id,
            order_id: r.order_id,
            product_id: r.product_id,
            quantity: r.quantity,
            price: r.price,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_details)]
pub struct NewOrderDetailRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: BigDecimal,
}

// ── Promotions ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = promotions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PromotionRow {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: String,
    pub discount_value: BigDecimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub min_order_value: BigDecimal,
    pub max_discount_amount: BigDecimal,
    pub usage_limit: i32,
    pub usage_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PromotionRow {
    pub fn into_domain(self) -> Result<Promotion, DomainError> {
        let discount_type = self
            .discount_type
            .parse()
            .map_err(|e| DomainError::Internal(format!("promotion {}: {e}", self.id)))?;
        Ok(Promotion {
            id: self.id,
            name: self.name,
            code: self.code,
            description: self.description,
            discount_type,
            discount_value: self.discount_value,
            start_date: self.start_date,
            end_date: self.end_date,
            min_order_value: self.min_order_value,
            max_discount_amount: self.max_discount_amount,
            usage_limit: self.usage_limit,
            usage_count: self.usage_count,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = promotions)]
pub struct NewPromotionRow {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: String,
    pub discount_value: BigDecimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub min_order_value: BigDecimal,
    pub max_discount_amount: BigDecimal,
    pub usage_limit: i32,
    pub is_active: bool,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = promotions)]
pub struct PromotionChangeset {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub discount_type: Option<String>,
    pub discount_value: Option<BigDecimal>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub min_order_value: Option<BigDecimal>,
    pub max_discount_amount: Option<BigDecimal>,
    pub usage_limit: Option<i32>,
    pub is_active: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

// ── Catalogue ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub stock_quantity: i32,
    pub image_url: String,
    pub category_id: Uuid,
    pub skin_type_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id,
            name: r.name,
            description: r.description,
            price: r.price,
            stock_quantity: r.stock_quantity,
            image_url: r.image_url,
            category_id: r.category_id,
            skin_type_id: r.skin_type_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
}

impl From<CategoryRow> for Category {
    fn from(r: CategoryRow) -> Self {
        Category { id: r.id, name: r.name }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = skin_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SkinTypeRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SkinTypeRow> for SkinType {
    fn from(r: SkinTypeRow) -> Self {
        SkinType {
            id: r.id,
            name: r.name,
            description: r.description,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = skin_types)]
pub struct NewSkinTypeRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = skin_types)]
pub struct SkinTypeChangeset {
    pub name: Option<String>,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

// ── Feedback ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = feedbacks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FeedbackRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub customer_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FeedbackRow> for Feedback {
    fn from(r: FeedbackRow) -> Self {
        Feedback {
            id: r.id,
            product_id: r.product_id,
            customer_id: r.customer_id,
            rating: r.rating,
            comment: r.comment,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = feedbacks)]
pub struct NewFeedbackRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub customer_id: Uuid,
    pub rating: i32,
    pub comment: String,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = feedbacks)]
pub struct FeedbackChangeset {
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub updated_at: DateTime<Utc>,
}

// ── Customers ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub skin_type_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(r: CustomerRow) -> Self {
        Customer {
            id: r.id,
            name: r.name,
            email: r.email,
            phone: r.phone,
            address: r.address,
            skin_type_id: r.skin_type_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
