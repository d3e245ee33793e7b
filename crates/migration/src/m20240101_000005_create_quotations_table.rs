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
                    .table(Quotations::Table)
                    .col(
                        ColumnDef::new(Quotations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Quotations::QuotationNo).string())
                    .col(
                        ColumnDef::new(Quotations::QuotationDate)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Quotations::DocType)
                            .small_integer()
                            .not_null()
                            .default(DocType::Standard),
                    )
                    .col(ColumnDef::new(Quotations::BillTo).json().not_null())
                    .col(ColumnDef::new(Quotations::ShipTo).json().not_null())
                    .col(ColumnDef::new(Quotations::ClientName).string().not_null())
                    .col(ColumnDef::new(Quotations::ProjectName).string().not_null())
                    .col(ColumnDef::new(Quotations::EmailTo).string())
                    .col(ColumnDef::new(Quotations::Note).string())
                    .col(ColumnDef::new(Quotations::WorkOrderNo).string())
                    .col(ColumnDef::new(Quotations::WorkOrderDate).timestamp())
                    .col(ColumnDef::new(Quotations::GstNo).string())
                    .col(ColumnDef::new(Quotations::PaymentTerms).string())
                    .col(
                        ColumnDef::new(Quotations::Approved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Quotations::Contractified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Quotations::PrintCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Quotations::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Quotations::SalesPersonId).big_integer())
                    .col(ColumnDef::new(Quotations::CreatedBy).big_integer())
                    .col(
                        ColumnDef::new(Quotations::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Quotations::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Quotations::Table, Quotations::SalesPersonId)
                            .to(crate::Users::Table, crate::Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Quotations::Table, Quotations::CreatedBy)
                            .to(crate::Users::Table, crate::Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("quotation_no_quotations_idx")
                            .col(Quotations::QuotationNo)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Quotations::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
pub(crate) enum Quotations {
    Table,
    Id,
    QuotationNo,
    QuotationDate,
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
    Contractified,
    PrintCount,
    Version,
    SalesPersonId,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
