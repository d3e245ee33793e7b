use db::contract::DocType;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contracts::Table)
                    .col(
                        ColumnDef::new(Contracts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contracts::QuotationId).big_integer())
                    .col(ColumnDef::new(Contracts::ContractNo).string())
                    .col(
                        ColumnDef::new(Contracts::ContractDate)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contracts::DocType)
                            .small_integer()
                            .not_null()
                            .default(DocType::Standard),
                    )
                    .col(ColumnDef::new(Contracts::BillTo).json().not_null())
                    .col(ColumnDef::new(Contracts::ShipTo).json().not_null())
                    .col(ColumnDef::new(Contracts::ClientName).string().not_null())
                    .col(ColumnDef::new(Contracts::ProjectName).string().not_null())
                    .col(ColumnDef::new(Contracts::EmailTo).string())
                    .col(ColumnDef::new(Contracts::Note).string())
                    .col(ColumnDef::new(Contracts::WorkOrderNo).string())
                    .col(ColumnDef::new(Contracts::WorkOrderDate).timestamp())
                    .col(ColumnDef::new(Contracts::GstNo).string())
                    .col(ColumnDef::new(Contracts::PaymentTerms).string())
                    .col(
                        ColumnDef::new(Contracts::Approved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Contracts::PrintCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Contracts::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Contracts::SalesPersonId).big_integer())
                    .col(ColumnDef::new(Contracts::CreatedBy).big_integer())
                    .col(
                        ColumnDef::new(Contracts::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Contracts::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Contracts::Table, Contracts::QuotationId)
                            .to(crate::Quotations::Table, crate::Quotations::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Contracts::Table, Contracts::SalesPersonId)
                            .to(crate::Users::Table, crate::Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Contracts::Table, Contracts::CreatedBy)
                            .to(crate::Users::Table, crate::Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("contract_no_contracts_idx")
                            .col(Contracts::ContractNo)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contracts::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
pub(crate) enum Contracts {
    Table,
    Id,
    QuotationId,
    ContractNo,
    ContractDate,
    DocType,
    BillTo,
    ShipTo,
    ClientName,
    ProjectName,
    EmailTo,
    Note,
    WorkOrderNo,
    WorkOrderDate,
    GstNo,
    PaymentTerms,
    Approved,
    PrintCount,
    Version,
    SalesPersonId,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
