pub mod assistant;
pub mod auth;
pub mod awrs;
pub mod brand_service;
pub mod chat;
pub mod dashboard_service;
pub mod data_service;
pub mod document_service;
pub mod invoice_service;
pub mod order_service;
pub mod promotion_service;
pub mod support_service;
