//! Fixtures for service tests: an in-memory SQLite database migrated with
//! the production migrator.

use crate::models::CustomerPayload;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub async fn memory_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // every pooled connection would otherwise get its own empty database
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("in-memory sqlite should open");
    Migrator::up(&db, None)
        .await
        .expect("migrations should apply to sqlite");
    db
}

pub fn customer(store_name: &str) -> CustomerPayload {
    CustomerPayload {
        store_name: store_name.to_string(),
        sales_person: Some("Ravi".to_string()),
        city: Some("Pune".to_string()),
        country: Some("India".to_string()),
        ..Default::default()
    }
}
