use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QuoteInfos::Table)
                    .col(
                        ColumnDef::new(QuoteInfos::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuoteInfos::ContractId).big_integer())
                    .col(ColumnDef::new(QuoteInfos::QuotationId).big_integer())
                    .col(
                        ColumnDef::new(QuoteInfos::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(QuoteInfos::Chemical).string().not_null())
                    .col(ColumnDef::new(QuoteInfos::WorkArea).string().not_null())
                    .col(ColumnDef::new(QuoteInfos::WorkAreaUnit).string())
                    .col(
                        ColumnDef::new(QuoteInfos::ServiceRate)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuoteInfos::ServiceRateUnit)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuoteInfos::Packaging).string())
                    .col(ColumnDef::new(QuoteInfos::BatchNos).json().not_null())
                    .col(
                        ColumnDef::new(QuoteInfos::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuoteInfos::Table, QuoteInfos::ContractId)
                            .to(crate::Contracts::Table, crate::Contracts::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuoteInfos::Table, QuoteInfos::QuotationId)
                            .to(crate::Quotations::Table, crate::Quotations::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuoteInfos::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
enum QuoteInfos {
    Table,
    Id,
    ContractId,
    QuotationId,
    Position,
    Chemical,
    WorkArea,
    WorkAreaUnit,
    ServiceRate,
    ServiceRateUnit,
    Packaging,
    BatchNos,
    CreatedAt,
}
