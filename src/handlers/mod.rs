pub mod bulk_transfer;
pub mod customer;
pub mod dashboard;

pub use bulk_transfer::bulk_transfer_config;
pub use customer::customer_config;
pub use dashboard::dashboard_config;
