//! Archived document revision.
//!
//! Revisions form the append-only archive of a contract or quotation: one
//! row per mutation of an approved document, inserted before the mutation
//! becomes visible. The snapshot holds the fully populated prior state of
//! the document (line items resolved, author references stripped of
//! credentials). Rows are never updated or deleted.

use sea_orm::{entity::prelude::*, FromJsonQueryResult};
use serde::{Deserialize, Serialize};

/// Revision model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "revisions")]
pub struct Model {
    /// Unique revision identifier. Orders the archive of a document.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Archived contract, if this revision belongs to one.
    pub contract_id: Option<i64>,

    /// Archived quotation, if this revision belongs to one.
    pub quotation_id: Option<i64>,

    /// User that caused the archived mutation.
    pub author_id: Option<i64>,

    /// Caller-supplied change message ("Approved" for approval baselines).
    pub message: String,

    /// Names of the fields the mutation touched.
    #[sea_orm(column_type = "Json")]
    pub modified_fields: ModifiedFields,

    /// Full populated state of the document immediately before the mutation.
    pub snapshot: Json,

    pub created_at: TimeDateTime,
}

/// JSON-stored list of modified field names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct ModifiedFields(pub Vec<String>);

/// Revision model relations.
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

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,
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

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
