//! Field work record.
//!
//! Work logs are append-only records of work performed against a contract.

use sea_orm::entity::prelude::*;

/// Work log model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "work_logs")]
pub struct Model {
    /// Unique work log identifier.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Contract this work was performed against.
    pub contract_id: i64,

    pub work_area_type: String,

    pub chemical: String,

    pub chemical_used: String,

    pub remark: Option<String>,

    pub area_treated: String,

    pub area_treated_unit: String,

    /// User that recorded the entry.
    pub entry_by: Option<i64>,

    pub created_at: TimeDateTime,
}

/// Work log model relations.
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
