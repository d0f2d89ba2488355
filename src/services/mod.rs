pub mod bulk_transfer_service;
pub mod customer_filter;
pub mod customer_service;
pub mod dashboard_service;
pub mod store;

pub use bulk_transfer_service::BulkTransferService;
pub use customer_filter::CustomerFilter;
pub use customer_service::CustomerService;
pub use dashboard_service::DashboardService;
