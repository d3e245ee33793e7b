use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeliveryChallans::Table)
                    .col(
                        ColumnDef::new(DeliveryChallans::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeliveryChallans::ContractId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeliveryChallans::Chemical)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeliveryChallans::BatchNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeliveryChallans::ChemicalQty)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeliveryChallans::Packaging).string())
                    .col(ColumnDef::new(DeliveryChallans::EntryBy).big_integer())
                    .col(
                        ColumnDef::new(DeliveryChallans::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DeliveryChallans::Table, DeliveryChallans::ContractId)
                            .to(crate::Contracts::Table, crate::Contracts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DeliveryChallans::Table, DeliveryChallans::EntryBy)
                            .to(crate::Users::Table, crate::Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeliveryChallans::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
enum DeliveryChallans {
    Table,
    Id,
    ContractId,
    Chemical,
    BatchNumber,
    ChemicalQty,
    Packaging,
    EntryBy,
    CreatedAt,
}
