//! A quotation/contract line item.
//!
//! Line items describe one chemical or service with its rate and work area.
//! Each row is owned by at most one contract or quotation at a time. When a
//! line item is dropped from an unapproved document it is deleted outright;
//! dropping it from an approved document only detaches it, keeping the row
//! retrievable for the archived snapshots that mention it.

use sea_orm::{entity::prelude::*, FromJsonQueryResult};
use serde::{Deserialize, Serialize};

/// Line item model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "quote_infos")]
pub struct Model {
    /// Unique line item identifier.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Owning contract, if any.
    pub contract_id: Option<i64>,

    /// Owning quotation, if any.
    pub quotation_id: Option<i64>,

    /// Position inside the owner's ordered line item list.
    pub position: i32,

    pub chemical: String,

    pub work_area: String,

    pub work_area_unit: Option<String>,

    pub service_rate: i64,

    pub service_rate_unit: String,

    pub packaging: Option<String>,

    /// Batch numbers applied against this line item.
    #[sea_orm(column_type = "Json")]
    pub batch_nos: BatchNos,

    pub created_at: TimeDateTime,
}

/// JSON-stored set of chemical batch numbers.
///
/// Mutations are idempotent set operations: inserting an existing number is
/// a no-op, never a duplicate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct BatchNos(pub Vec<String>);

impl BatchNos {
    /// Insert a batch number. Returns whether the set changed.
    pub fn insert(&mut self, batch_no: &str) -> bool {
        if self.0.iter().any(|existing| existing == batch_no) {
            false
        } else {
            self.0.push(batch_no.to_owned());
            true
        }
    }

    /// Remove a batch number. Returns whether the set changed.
    pub fn remove(&mut self, batch_no: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != batch_no);
        self.0.len() != before
    }
}

/// Line item model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contract::Entity",
        from = "Column::ContractId",
        to = "super::contract::Column::Id"
    )]
    Contract,

    #[sea_orm(
        belongs_to = "super::quotation::Entity",
        from = "Column::QuotationId",
        to = "super::quotation::Column::Id"
    )]
    Quotation,
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl Related<super::quotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
