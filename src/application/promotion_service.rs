use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::pagination::Paginated;
use crate::domain::ports::PromotionRepository;
use crate::domain::promotion::{
    validate_terms, DiscountQuote, NewPromotion, Promotion, PromotionPatch, PromotionQuery,
};

#[derive(Clone)]
pub struct PromotionService {
    repo: Arc<dyn PromotionRepository>,
}

impl PromotionService {
    pub fn new(repo: Arc<dyn PromotionRepository>) -> Self {
        Self { repo }
    }

    pub fn create(&self, promotion: NewPromotion) -> Result<Promotion, DomainError> {
        validate_terms(
            promotion.discount_type,
            &promotion.discount_value,
            promotion.start_date,
            promotion.end_date,
        )?;
        self.repo.create(promotion)
    }

    pub fn get(&self, id: Uuid) -> Result<Promotion, DomainError> {
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound("Promotion"))
    }

    pub fn list(&self, query: &PromotionQuery) -> Result<Paginated<Promotion>, DomainError> {
        self.repo.list(query)
    }

    /// Validates the terms as they will look after the patch is applied.
    pub fn update(&self, id: Uuid, patch: PromotionPatch) -> Result<Promotion, DomainError> {
        let current = self.get(id)?;
        validate_terms(
            patch.discount_type.unwrap_or(current.discount_type),
            patch.discount_value.as_ref().unwrap_or(&current.discount_value),
            patch.start_date.unwrap_or(current.start_date),
            patch.end_date.unwrap_or(current.end_date),
        )?;
        if let Some(limit) = patch.usage_limit {
            if limit < current.usage_count {
                return Err(DomainError::InvalidInput(format!(
                    "usage_limit cannot be lower than the {} uses already recorded",
                    current.usage_count
                )));
            }
        }
        self.repo
            .update(id, patch)?
            .ok_or(DomainError::NotFound("Promotion"))
    }

    pub fn toggle_active(&self, id: Uuid) -> Result<Promotion, DomainError> {
        self.repo
            .toggle_active(id)?
            .ok_or(DomainError::NotFound("Promotion"))
    }

    pub fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if self.repo.delete(id)? {
            Ok(())
        } else {
            Err(DomainError::NotFound("Promotion"))
        }
    }

    /// Prices a cart subtotal against a code without consuming a use.
    pub fn quote(
        &self,
        code: &str,
        subtotal: BigDecimal,
        now: DateTime<Utc>,
    ) -> Result<DiscountQuote, DomainError> {
        let promotion = self
            .repo
            .find_by_code(code.trim())?
            .ok_or(DomainError::NotFound("Promotion"))?;
        let discount = promotion.applicable_discount(&subtotal, now)?;
        let total = &subtotal - &discount;
        Ok(DiscountQuote {
            promotion_id: promotion.id,
            code: promotion.code,
            subtotal,
            discount_amount: discount,
            total,
        })
    }
}
