pub mod user_repo;
pub use user_repo::UserRepository;
pub mod brand_repo;
pub use brand_repo::BrandRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod orders_repo;
pub use orders_repo::OrdersRepository;
pub mod invoice_repo;
pub use invoice_repo::InvoiceRepository;
pub mod support_repo;
pub use support_repo::SupportRepository;
pub mod promotion_repo;
pub use promotion_repo::PromotionRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
pub mod data_repo;
pub use data_repo::DataRepository;
