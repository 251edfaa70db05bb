mod m20260301_120000_create_tables;
mod m20260301_121500_seed_settings;

use sea_orm_migration::prelude::*;

pub use sea_orm_migration::MigratorTrait;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_120000_create_tables::Migration),
            Box::new(m20260301_121500_seed_settings::Migration),
        ]
    }
}
