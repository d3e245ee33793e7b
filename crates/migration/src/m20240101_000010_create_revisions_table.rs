use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Revisions::Table)
                    .col(
                        ColumnDef::new(Revisions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Revisions::ContractId).big_integer())
                    .col(ColumnDef::new(Revisions::QuotationId).big_integer())
                    .col(ColumnDef::new(Revisions::AuthorId).big_integer())
                    .col(ColumnDef::new(Revisions::Message).string().not_null())
                    .col(ColumnDef::new(Revisions::ModifiedFields).json().not_null())
                    .col(ColumnDef::new(Revisions::Snapshot).json().not_null())
                    .col(
                        ColumnDef::new(Revisions::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Revisions::Table, Revisions::ContractId)
                            .to(crate::Contracts::Table, crate::Contracts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Revisions::Table, Revisions::QuotationId)
                            .to(crate::Quotations::Table, crate::Quotations::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Revisions::Table, Revisions::AuthorId)
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
            .drop_table(Table::drop().table(Revisions::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
enum Revisions {
    Table,
    Id,
    ContractId,
    QuotationId,
    AuthorId,
    Message,
    ModifiedFields,
    Snapshot,
    CreatedAt,
}
