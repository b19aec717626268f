pub mod catalog;
pub mod errors;
pub mod order;
pub mod pagination;
pub mod ports;
pub mod pricing;
pub mod promotion;
