use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkLogs::Table)
                    .col(
                        ColumnDef::new(WorkLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkLogs::ContractId).big_integer().not_null())
                    .col(ColumnDef::new(WorkLogs::WorkAreaType).string().not_null())
                    .col(ColumnDef::new(WorkLogs::Chemical).string().not_null())
                    .col(ColumnDef::new(WorkLogs::ChemicalUsed).string().not_null())
                    .col(ColumnDef::new(WorkLogs::Remark).string())
                    .col(ColumnDef::new(WorkLogs::AreaTreated).string().not_null())
                    .col(
                        ColumnDef::new(WorkLogs::AreaTreatedUnit)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkLogs::EntryBy).big_integer())
                    .col(
                        ColumnDef::new(WorkLogs::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(WorkLogs::Table, WorkLogs::ContractId)
                            .to(crate::Contracts::Table, crate::Contracts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(WorkLogs::Table, WorkLogs::EntryBy)
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
            .drop_table(Table::drop().table(WorkLogs::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
enum WorkLogs {
    Table,
    Id,
    ContractId,
    WorkAreaType,
    Chemical,
    ChemicalUsed,
    Remark,
    AreaTreated,
    AreaTreatedUnit,
    EntryBy,
    CreatedAt,
}
