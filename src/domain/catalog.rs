use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::pagination::{PageRequest, Sort};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[schema(value_type = String)]
    pub price: BigDecimal,
    pub stock_quantity: i32,
    pub image_url: String,
    pub category_id: Uuid,
    pub skin_type_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SkinType {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSkinType {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct SkinTypePatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Feedback {
    pub id: Uuid,
    pub product_id: Uuid,
    pub customer_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub product_id: Uuid,
    pub customer_id: Uuid,
    pub rating: i32,
    pub comment: String,
}

#[derive(Debug, Clone, Default)]
pub struct FeedbackPatch {
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

/// Product page payload: the product plus everything rendered around it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub feedbacks: Vec<Feedback>,
    pub category: Option<Category>,
    pub skin_type: Option<SkinType>,
    /// Other products recommended for the same skin type.
    pub related_products: Vec<Product>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSortField {
    #[default]
    CreatedAt,
    Name,
    Price,
}

impl ProductSortField {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("name") => ProductSortField::Name,
            Some("price") => ProductSortField::Price,
            _ => ProductSortField::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub page: PageRequest,
    pub sort: Sort<ProductSortField>,
    pub category_id: Option<Uuid>,
    pub skin_type_id: Option<Uuid>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub skin_type_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
