//! Migrator registering the schema in dependency order.
pub use sea_orm_migration::prelude::*;

mod m20220101_000001_create_services;
mod m20220101_000002_create_products;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20220101_000001_create_services::Migration),
            Box::new(m20220101_000002_create_products::Migration),
        ]
    }
}
