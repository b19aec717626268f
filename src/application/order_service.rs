use std::collections::HashMap;
use std::sync::Arc;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    NewOrder, NewOrderLine, Order, OrderItems, OrderPatch, OrderQuery, PaymentMethod,
};
use crate::domain::pagination::Paginated;
use crate::domain::ports::{CatalogRepository, OrderRepository, PromotionRepository};
use crate::domain::pricing;

#[derive(Debug, Clone)]
pub struct CheckoutLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct Checkout {
    pub customer_id: Uuid,
    pub lines: Vec<CheckoutLine>,
    pub promotion_code: Option<String>,
    pub delivery_fee: BigDecimal,
    pub payment_method: PaymentMethod,
    pub shipping_address: Option<String>,
}

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    promotions: Arc<dyn PromotionRepository>,
    catalog: Arc<dyn CatalogRepository>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        promotions: Arc<dyn PromotionRepository>,
        catalog: Arc<dyn CatalogRepository>,
    ) -> Self {
        Self {
            orders,
            promotions,
            catalog,
        }
    }

    /// Prices the cart from current catalogue prices, applies the promotion
    /// code if any, and persists the order.
    pub fn checkout(&self, checkout: Checkout, now: DateTime<Utc>) -> Result<Order, DomainError> {
        if checkout.lines.is_empty() {
            return Err(DomainError::InvalidInput(
                "order must contain at least one item".to_string(),
            ));
        }
        if let Some(bad) = checkout.lines.iter().find(|l| l.quantity <= 0) {
            return Err(DomainError::InvalidInput(format!(
                "quantity for product {} must be positive",
                bad.product_id
            )));
        }
        if checkout.delivery_fee < BigDecimal::zero() {
            return Err(DomainError::InvalidInput(
                "delivery_fee must not be negative".to_string(),
            ));
        }

        let ids: Vec<Uuid> = checkout.lines.iter().map(|l| l.product_id).collect();
        let prices: HashMap<Uuid, BigDecimal> = self
            .catalog
            .find_products(&ids)?
            .into_iter()
            .map(|p| (p.id, p.price))
            .collect();

        let lines = checkout
            .lines
            .iter()
            .map(|l| {
                let price = prices.get(&l.product_id).ok_or_else(|| {
                    DomainError::InvalidInput(format!("unknown product {}", l.product_id))
                })?;
                Ok(NewOrderLine {
                    product_id: l.product_id,
                    quantity: l.quantity,
                    price: price.clone(),
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        let subtotal = pricing::subtotal(&lines);

        let (promotion_id, discount) = match checkout.promotion_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => {
                let promotion = self.promotions.find_by_code(code)?.ok_or_else(|| {
                    DomainError::InvalidInput(format!("promotion code '{code}' is not valid"))
                })?;
                let discount = promotion.applicable_discount(&subtotal, now)?;
                (Some(promotion.id), discount)
            }
            _ => (None, BigDecimal::zero()),
        };

        let totals = pricing::totals(subtotal, discount, checkout.delivery_fee);
        log::debug!(
            "Checkout for customer {}: subtotal={} discount={} final={}",
            checkout.customer_id,
            totals.subtotal,
            totals.discount_amount,
            totals.final_amount
        );

        self.orders.create(NewOrder {
            customer_id: checkout.customer_id,
            promotion_id,
            totals,
            payment_method: checkout.payment_method,
            shipping_address: checkout.shipping_address,
            lines,
        })
    }

    pub fn get_order(&self, id: Uuid) -> Result<Order, DomainError> {
        self.orders.find_by_id(id)?.ok_or(DomainError::NotFound("Order"))
    }

    pub fn list_orders(&self, query: &OrderQuery) -> Result<Paginated<Order>, DomainError> {
        self.orders.list(query)
    }

    pub fn update_order(&self, id: Uuid, patch: OrderPatch) -> Result<Order, DomainError> {
        if patch.is_empty() {
            return Err(DomainError::InvalidInput("nothing to update".to_string()));
        }
        self.orders
            .update(id, patch)?
            .ok_or(DomainError::NotFound("Order"))
    }

    pub fn order_items(&self, id: Uuid) -> Result<OrderItems, DomainError> {
        self.orders.find_items(id)?.ok_or(DomainError::NotFound("Order"))
    }
}
