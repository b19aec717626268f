use std::sync::Arc;

use uuid::Uuid;

use crate::domain::catalog::{
    Customer, Feedback, FeedbackPatch, NewFeedback, NewSkinType, Product, ProductDetail,
    ProductQuery, SkinType, SkinTypePatch,
};
use crate::domain::errors::DomainError;
use crate::domain::pagination::{PageRequest, Paginated};
use crate::domain::ports::{CatalogRepository, CustomerRepository, FeedbackRepository};

/// Read-mostly storefront data: products, skin types, feedback and customers.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
    feedback: Arc<dyn FeedbackRepository>,
    customers: Arc<dyn CustomerRepository>,
}

impl CatalogService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        feedback: Arc<dyn FeedbackRepository>,
        customers: Arc<dyn CustomerRepository>,
    ) -> Self {
        Self {
            catalog,
            feedback,
            customers,
        }
    }

    pub fn list_products(&self, query: &ProductQuery) -> Result<Paginated<Product>, DomainError> {
        if let (Some(min), Some(max)) = (&query.min_price, &query.max_price) {
            if min > max {
                return Err(DomainError::InvalidInput(
                    "minPrice must not exceed maxPrice".to_string(),
                ));
            }
        }
        self.catalog.list_products(query)
    }

    pub fn product_detail(&self, id: Uuid) -> Result<ProductDetail, DomainError> {
        self.catalog
            .product_detail(id)?
            .ok_or(DomainError::NotFound("Product"))
    }

    pub fn product_feedback(&self, product_id: Uuid) -> Result<Vec<Feedback>, DomainError> {
        self.catalog
            .find_product(product_id)?
            .ok_or(DomainError::NotFound("Product"))?;
        self.feedback.list_for_product(product_id)
    }

    pub fn create_feedback(&self, feedback: NewFeedback) -> Result<Feedback, DomainError> {
        self.feedback.create(feedback)
    }

    pub fn update_feedback(&self, id: Uuid, patch: FeedbackPatch) -> Result<Feedback, DomainError> {
        self.feedback
            .update(id, patch)?
            .ok_or(DomainError::NotFound("Feedback"))
    }

    pub fn delete_feedback(&self, id: Uuid) -> Result<(), DomainError> {
        if self.feedback.delete(id)? {
            Ok(())
        } else {
            Err(DomainError::NotFound("Feedback"))
        }
    }

    pub fn list_skin_types(&self) -> Result<Vec<SkinType>, DomainError> {
        self.catalog.list_skin_types()
    }

    pub fn get_skin_type(&self, id: Uuid) -> Result<SkinType, DomainError> {
        self.catalog
            .find_skin_type(id)?
            .ok_or(DomainError::NotFound("Skin type"))
    }

    pub fn create_skin_type(&self, skin_type: NewSkinType) -> Result<SkinType, DomainError> {
        self.catalog.create_skin_type(skin_type)
    }

    pub fn update_skin_type(&self, id: Uuid, patch: SkinTypePatch) -> Result<SkinType, DomainError> {
        self.catalog
            .update_skin_type(id, patch)?
            .ok_or(DomainError::NotFound("Skin type"))
    }

    pub fn delete_skin_type(&self, id: Uuid) -> Result<(), DomainError> {
        if self.catalog.delete_skin_type(id)? {
            Ok(())
        } else {
            Err(DomainError::NotFound("Skin type"))
        }
    }

    pub fn get_customer(&self, id: Uuid) -> Result<Customer, DomainError> {
        self.customers
            .find_by_id(id)?
            .ok_or(DomainError::NotFound("Customer"))
    }

    pub fn list_customers(&self, page: PageRequest) -> Result<Paginated<Customer>, DomainError> {
        self.customers.list(page)
    }
}
