pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_authentication_tokens_table;
mod m20240101_000003_create_sequences_table;
mod m20240101_000004_create_chemicals_table;
mod m20240101_000005_create_quotations_table;
mod m20240101_000006_create_contracts_table;
mod m20240101_000007_create_quote_infos_table;
mod m20240101_000008_create_work_logs_table;
mod m20240101_000009_create_delivery_challans_table;
mod m20240101_000010_create_revisions_table;

pub(crate) use m20240101_000001_create_users_table::Users;
pub(crate) use m20240101_000005_create_quotations_table::Quotations;
pub(crate) use m20240101_000006_create_contracts_table::Contracts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_authentication_tokens_table::Migration),
            Box::new(m20240101_000003_create_sequences_table::Migration),
            Box::new(m20240101_000004_create_chemicals_table::Migration),
            Box::new(m20240101_000005_create_quotations_table::Migration),
            Box::new(m20240101_000006_create_contracts_table::Migration),
            Box::new(m20240101_000007_create_quote_infos_table::Migration),
            Box::new(m20240101_000008_create_work_logs_table::Migration),
            Box::new(m20240101_000009_create_delivery_challans_table::Migration),
            Box::new(m20240101_000010_create_revisions_table::Migration),
        ]
    }
}
