//! Delivery challan.
//!
//! A delivery challan records chemical dispatched against a contract.
//! Like work logs these are append-only and owned by the contract that
//! created them.

use sea_orm::entity::prelude::*;

/// Delivery challan model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "delivery_challans")]
pub struct Model {
    /// Unique delivery challan identifier.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Contract the chemical was dispatched against.
    pub contract_id: i64,

    pub chemical: String,

    pub batch_number: String,

    pub chemical_qty: String,

    pub packaging: Option<String>,

    /// User that recorded the entry.
    pub entry_by: Option<i64>,

    pub created_at: TimeDateTime,
}

/// Delivery challan model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contract::Entity",
        from = "Column::ContractId",
        to = "super::contract::Column::Id"
    )]
    Contract,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::EntryBy",
        to = "super::user::Column::Id"
    )]
    EntryBy,
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EntryBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
