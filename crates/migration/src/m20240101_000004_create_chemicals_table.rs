use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Chemicals::Table)
                    .col(
                        ColumnDef::new(Chemicals::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Chemicals::Chemical).string().not_null())
                    .col(ColumnDef::new(Chemicals::BatchNos).json().not_null())
                    .col(
                        ColumnDef::new(Chemicals::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .index(
                        Index::create()
                            .name("chemical_chemicals_idx")
                            .col(Chemicals::Chemical)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Chemicals::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
enum Chemicals {
    Table,
    Id,
    Chemical,
    BatchNos,
    CreatedAt,
}
