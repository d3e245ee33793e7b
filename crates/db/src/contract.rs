//! A service contract.
//!
//! Contracts start out as drafts and move to the approved state exactly
//! once, receiving their human-readable contract number at that moment.
//! Any later mutation of an approved contract must be preceded by an
//! archive entry, see [`crate::revision`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::party::Party;

/// Service contract model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "contracts")]
pub struct Model {
    /// Unique contract identifier.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Source quotation, if this contract was created by contractifying one.
    pub quotation_id: Option<i64>,

    /// Human-readable contract number. Empty until the contract is approved,
    /// assigned exactly once.
    pub contract_no: Option<String>,

    pub contract_date: TimeDateTime,

    pub doc_type: DocType,

    /// Billing party, including its contact list.
    #[sea_orm(column_type = "Json")]
    pub bill_to: Party,

    /// Shipping party, including its contact list.
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

    /// Approval state. A one-way transition; approved contracts only mutate
    /// through the archival flow.
    pub approved: bool,

    /// Times this contract was printed.
    pub print_count: i32,

    /// Optimistic-concurrency token, bumped on every update.
    pub version: i32,

    pub sales_person_id: Option<i64>,

    pub created_by: Option<i64>,

    pub created_at: TimeDateTime,

    pub updated_at: TimeDateTime,
}

/// Document flavor of a contract or quotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i16", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    #[sea_orm(num_value = 0)]
    Standard,
    #[sea_orm(num_value = 1)]
    Supply,
    #[sea_orm(num_value = 2)]
    SupplyApply,
}

/// Service contract model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quotation::Entity",
        from = "Column::QuotationId",
        to = "super::quotation::Column::Id"
    )]
    Quotation,

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

    #[sea_orm(has_many = "super::work_log::Entity")]
    WorkLogs,

    #[sea_orm(has_many = "super::delivery_challan::Entity")]
    DeliveryChallans,

    #[sea_orm(has_many = "super::revision::Entity")]
    Revisions,
}

impl Related<super::quotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotation.def()
    }
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

impl Related<super::work_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkLogs.def()
    }
}

impl Related<super::delivery_challan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryChallans.def()
    }
}

impl Related<super::revision::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Revisions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
