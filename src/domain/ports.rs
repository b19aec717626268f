use uuid::Uuid;

use super::catalog::{
    Customer, Feedback, FeedbackPatch, NewFeedback, NewSkinType, Product, ProductDetail,
    ProductQuery, SkinType, SkinTypePatch,
};
use super::errors::DomainError;
use super::order::{NewOrder, Order, OrderDetail, OrderItems, OrderPatch, OrderQuery, OrderStatus};
use super::pagination::{PageRequest, Paginated};
use super::promotion::{NewPromotion, Promotion, PromotionPatch, PromotionQuery};

pub trait OrderRepository: Send + Sync + 'static {
    /// Persists the order and its lines atomically. When the order carries a
    /// promotion, its `usage_count` is incremented in the same transaction
    /// and the whole checkout fails once the usage limit is reached.
    fn create(&self, order: NewOrder) -> Result<Order, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;
    fn find_details(&self, order_id: Uuid) -> Result<Vec<OrderDetail>, DomainError>;
    fn find_items(&self, order_id: Uuid) -> Result<Option<OrderItems>, DomainError>;
    fn list(&self, query: &OrderQuery) -> Result<Paginated<Order>, DomainError>;
    fn update(&self, id: Uuid, patch: OrderPatch) -> Result<Option<Order>, DomainError>;
    fn set_payment_ref(&self, id: Uuid, payment_ref: &str) -> Result<(), DomainError>;
    /// Moves a `pending` order to `to`, but only while its `payment_ref` is
    /// still `payment_ref`. Returns `false` when the order is missing, no
    /// longer pending, or was resubmitted under another transaction.
    fn settle_payment(
        &self,
        id: Uuid,
        payment_ref: &str,
        to: OrderStatus,
    ) -> Result<bool, DomainError>;
    /// Pending orders that were submitted to the payment gateway.
    fn list_awaiting_payment(&self) -> Result<Vec<Order>, DomainError>;
}

pub trait PromotionRepository: Send + Sync + 'static {
    fn create(&self, promotion: NewPromotion) -> Result<Promotion, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Promotion>, DomainError>;
    fn find_by_code(&self, code: &str) -> Result<Option<Promotion>, DomainError>;
    fn list(&self, query: &PromotionQuery) -> Result<Paginated<Promotion>, DomainError>;
    fn update(&self, id: Uuid, patch: PromotionPatch) -> Result<Option<Promotion>, DomainError>;
    fn toggle_active(&self, id: Uuid) -> Result<Option<Promotion>, DomainError>;
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

pub trait CatalogRepository: Send + Sync + 'static {
    fn find_product(&self, id: Uuid) -> Result<Option<Product>, DomainError>;
    fn find_products(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError>;
    fn list_products(&self, query: &ProductQuery) -> Result<Paginated<Product>, DomainError>;
    fn product_detail(&self, id: Uuid) -> Result<Option<ProductDetail>, DomainError>;

    fn list_skin_types(&self) -> Result<Vec<SkinType>, DomainError>;
    fn find_skin_type(&self, id: Uuid) -> Result<Option<SkinType>, DomainError>;
    fn create_skin_type(&self, skin_type: NewSkinType) -> Result<SkinType, DomainError>;
    fn update_skin_type(&self, id: Uuid, patch: SkinTypePatch)
        -> Result<Option<SkinType>, DomainError>;
    fn delete_skin_type(&self, id: Uuid) -> Result<bool, DomainError>;
}

pub trait FeedbackRepository: Send + Sync + 'static {
    fn list_for_product(&self, product_id: Uuid) -> Result<Vec<Feedback>, DomainError>;
    fn create(&self, feedback: NewFeedback) -> Result<Feedback, DomainError>;
    fn update(&self, id: Uuid, patch: FeedbackPatch) -> Result<Option<Feedback>, DomainError>;
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

pub trait CustomerRepository: Send + Sync + 'static {
    fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, DomainError>;
    fn list(&self, page: PageRequest) -> Result<Paginated<Customer>, DomainError>;
}
