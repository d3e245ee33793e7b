//! A sales quotation.
//!
//! Quotations are the pre-approval precursors of contracts: they share the
//! contract's field set and archival flow, and an approved quotation may be
//! contractified exactly once, producing a new draft contract that copies
//! its line items.

use sea_orm::entity::prelude::*;

use crate::{contract::DocType, party::Party};

/// Quotation model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "quotations")]
pub struct Model {
    /// Unique quotation identifier.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Human-readable quotation number. Empty until approval, assigned
    /// exactly once.
    pub quotation_no: Option<String>,

    pub quotation_date: TimeDateTime,

    pub doc_type: DocType,

    #[sea_orm(column_type = "Json")]
    pub bill_to: Party,

    #[sea_orm(column_type = "Json")]
    pub ship_to: Party,

    /// Bill-to party name, denormalized for filtering.
    pub client_name: String,

    /// Ship-to project name, denormalized for filtering.
    pub project_name: String,

    pub email_to: Option<String>,

    pub note: Option<String>,

    pub work_order_no: Option<String>,

    pub work_order_date: Option<TimeDateTime>,

    pub gst_no: Option<String>,

    pub payment_terms: Option<String>,

    pub approved: bool,

    /// Set once a contract has been derived from this quotation.
    pub contractified: bool,

    pub print_count: i32,

    /// Optimistic-concurrency token, bumped on every update.
    pub version: i32,

    pub sales_person_id: Option<i64>,

    pub created_by: Option<i64>,

    pub created_at: TimeDateTime,

    pub updated_at: TimeDateTime,
}

/// Quotation model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    CreatedBy,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SalesPersonId",
        to = "super::user::Column::Id"
    )]
    SalesPerson,

    #[sea_orm(has_many = "super::quote_info::Entity")]
    QuoteInfos,

    #[sea_orm(has_many = "super::contract::Entity")]
    Contracts,

    #[sea_orm(has_many = "super::revision::Entity")]
    Revisions,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedBy.def()
    }
}

impl Related<super::quote_info::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuoteInfos.def()
    }
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contracts.def()
    }
}

impl Related<super::revision::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Revisions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
