pub mod catalog_service;
pub mod order_service;
pub mod promotion_service;

pub use catalog_service::CatalogService;
pub use order_service::{Checkout, CheckoutLine, OrderService};
pub use promotion_service::PromotionService;
