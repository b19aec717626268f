use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::DomainError;
use super::pagination::{PageRequest, Sort};

const MONEY_SCALE: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        }
    }
}

impl FromStr for DiscountType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed" => Ok(DiscountType::Fixed),
            other => Err(DomainError::InvalidInput(format!(
                "unknown discount type '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Promotion {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    #[schema(value_type = String)]
    pub discount_value: BigDecimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[schema(value_type = String)]
    pub min_order_value: BigDecimal,
    /// Zero means uncapped.
    #[schema(value_type = String)]
    pub max_discount_amount: BigDecimal,
    pub usage_limit: i32,
    pub usage_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Why a promotion cannot be applied to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ineligible {
    #[error("promotion is not active")]
    Inactive,
    #[error("promotion has not started yet")]
    NotStarted,
    #[error("promotion has expired")]
    Expired,
    #[error("order subtotal is below the promotion minimum of {0}")]
    BelowMinimum(BigDecimal),
    #[error("promotion usage limit reached")]
    UsageExhausted,
}

impl From<Ineligible> for DomainError {
    fn from(e: Ineligible) -> Self {
        DomainError::InvalidInput(e.to_string())
    }
}

impl Promotion {
    /// Uncapped discount: `percentage → subtotal × value / 100`,
    /// `fixed → value`.
    pub fn raw_discount(&self, subtotal: &BigDecimal) -> BigDecimal {
        match self.discount_type {
            DiscountType::Percentage => subtotal * &self.discount_value / BigDecimal::from(100),
            DiscountType::Fixed => self.discount_value.clone(),
        }
    }

    pub fn check_eligible(&self, subtotal: &BigDecimal, now: DateTime<Utc>) -> Result<(), Ineligible> {
        if !self.is_active {
            return Err(Ineligible::Inactive);
        }
        if now < self.start_date {
            return Err(Ineligible::NotStarted);
        }
        if now > self.end_date {
            return Err(Ineligible::Expired);
        }
        if subtotal < &self.min_order_value {
            return Err(Ineligible::BelowMinimum(self.min_order_value.clone()));
        }
        if self.usage_count >= self.usage_limit {
            return Err(Ineligible::UsageExhausted);
        }
        Ok(())
    }

    /// Discount actually granted at checkout: eligibility checked, capped by
    /// `max_discount_amount` (when positive) and by the subtotal itself.
    /// Truncated to the 2 decimal places money columns hold, so the result
    /// never exceeds the subtotal.
    pub fn applicable_discount(
        &self,
        subtotal: &BigDecimal,
        now: DateTime<Utc>,
    ) -> Result<BigDecimal, Ineligible> {
        self.check_eligible(subtotal, now)?;

        let mut discount = self.raw_discount(subtotal);
        if self.max_discount_amount > BigDecimal::zero() && discount > self.max_discount_amount {
            discount = self.max_discount_amount.clone();
        }
        if &discount > subtotal {
            discount = subtotal.clone();
        }
        Ok(discount.with_scale_round(MONEY_SCALE, RoundingMode::Down))
    }
}

#[derive(Debug, Clone)]
pub struct NewPromotion {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: BigDecimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub min_order_value: BigDecimal,
    pub max_discount_amount: BigDecimal,
    pub usage_limit: i32,
}

#[derive(Debug, Clone, Default)]
pub struct PromotionPatch {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<BigDecimal>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub min_order_value: Option<BigDecimal>,
    pub max_discount_amount: Option<BigDecimal>,
    pub usage_limit: Option<i32>,
    pub is_active: Option<bool>,
}

/// Rejects a window that ends before it starts and percentages above 100.
pub fn validate_terms(
    discount_type: DiscountType,
    discount_value: &BigDecimal,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
) -> Result<(), DomainError> {
    if end_date < start_date {
        return Err(DomainError::InvalidInput(
            "end_date must not be before start_date".to_string(),
        ));
    }
    if discount_type == DiscountType::Percentage && discount_value > &BigDecimal::from(100) {
        return Err(DomainError::InvalidInput(
            "percentage discount cannot exceed 100".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromotionSortField {
    #[default]
    CreatedAt,
    StartDate,
    EndDate,
    Name,
}

impl PromotionSortField {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("start_date" | "startDate") => PromotionSortField::StartDate,
            Some("end_date" | "endDate") => PromotionSortField::EndDate,
            Some("name") => PromotionSortField::Name,
            _ => PromotionSortField::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PromotionQuery {
    pub page: PageRequest,
    pub sort: Sort<PromotionSortField>,
    /// Case-insensitive match on name or code.
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

/// Result of pricing a cart against a promotion code.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DiscountQuote {
    pub promotion_id: Uuid,
    pub code: String,
    #[schema(value_type = String)]
    pub subtotal: BigDecimal,
    #[schema(value_type = String)]
    pub discount_amount: BigDecimal,
    #[schema(value_type = String)]
    pub total: BigDecimal,
}
