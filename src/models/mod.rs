pub mod bulk_transfer;
pub mod common;
pub mod customer;
pub mod dashboard;
pub mod pagination;

pub use bulk_transfer::*;
pub use common::*;
pub use customer::*;
pub use dashboard::*;
pub use pagination::*;
