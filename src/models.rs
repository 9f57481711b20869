pub mod auth;
pub mod brand;
pub mod dashboard;
pub mod data;
pub mod invoices;
pub mod orders;
pub mod products;
pub mod promotions;
pub mod status;
pub mod support;
