//! Fully populated document views.
//!
//! Views resolve a contract or quotation together with its ordered line
//! items and author references. They double as response bodies and as the
//! archived snapshots recorded before mutating approved documents, so user
//! references carry identity fields only and never credentials.

use db::{
    contract, party::Party, quotation, quote_info, user, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, OffsetDateTime, PrimitiveDateTime, QueryFilter, QueryOrder,
};
use serde::Serialize;

/// Credential-free reference to a user.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserRef {
    pub id: i64,
    pub username: String,
    pub initials: String,
}

/// A single resolved line item.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuoteInfoView {
    pub id: i64,
    pub chemical: String,
    pub work_area: String,
    pub work_area_unit: Option<String>,
    pub service_rate: i64,
    pub service_rate_unit: String,
    pub packaging: Option<String>,
    pub batch_nos: Vec<String>,
}

impl From<quote_info::Model> for QuoteInfoView {
    fn from(model: quote_info::Model) -> Self {
        Self {
            id: model.id,
            chemical: model.chemical,
            work_area: model.work_area,
            work_area_unit: model.work_area_unit,
            service_rate: model.service_rate,
            service_rate_unit: model.service_rate_unit,
            packaging: model.packaging,
            batch_nos: model.batch_nos.0,
        }
    }
}

/// Fully populated contract state.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContractView {
    pub id: i64,
    pub quotation_id: Option<i64>,
    pub contract_no: Option<String>,
    pub contract_date: i64,
    pub doc_type: contract::DocType,
    pub bill_to: Party,
    pub ship_to: Party,
    pub email_to: Option<String>,
    pub note: Option<String>,
    pub work_order_no: Option<String>,
    pub work_order_date: Option<i64>,
    pub gst_no: Option<String>,
    pub payment_terms: Option<String>,
    pub approved: bool,
    pub print_count: i32,
    pub version: i32,
    pub quote_info: Vec<QuoteInfoView>,
    pub sales_person: Option<UserRef>,
    pub created_by: Option<UserRef>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fully populated quotation state.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuotationView {
    pub id: i64,
    pub quotation_no: Option<String>,
    pub quotation_date: i64,
    pub doc_type: contract::DocType,
    pub bill_to: Party,
    pub ship_to: Party,
    pub email_to: Option<String>,
    pub note: Option<String>,
    pub work_order_no: Option<String>,
    pub work_order_date: Option<i64>,
    pub gst_no: Option<String>,
    pub payment_terms: Option<String>,
    pub approved: bool,
    pub contractified: bool,
    pub print_count: i32,
    pub version: i32,
    pub quote_info: Vec<QuoteInfoView>,
    pub sales_person: Option<UserRef>,
    pub created_by: Option<UserRef>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Convert a stored timestamp into a unix timestamp value.
pub(crate) fn to_timestamp(value: PrimitiveDateTime) -> i64 {
    value.assume_utc().unix_timestamp()
}

/// Convert a client-supplied unix timestamp into a storable one.
pub(crate) fn from_timestamp(value: i64) -> Option<PrimitiveDateTime> {
    OffsetDateTime::from_unix_timestamp(value)
        .map(|value| PrimitiveDateTime::new(value.date(), value.time()))
        .ok()
}

/// Resolve an optional user reference, stripped down to identity fields.
pub(crate) async fn user_ref<C: ConnectionTrait>(
    db: &C,
    id: Option<i64>,
) -> Result<Option<UserRef>, DbErr> {
    let Some(id) = id else {
        return Ok(None);
    };

    Ok(user::Entity::find_by_id(id).one(db).await?.map(|user| UserRef {
        id: user.id,
        username: user.username,
        initials: user.initials,
    }))
}

async fn contract_line_items<C: ConnectionTrait>(
    db: &C,
    contract_id: i64,
) -> Result<Vec<QuoteInfoView>, DbErr> {
    Ok(quote_info::Entity::find()
        .filter(quote_info::Column::ContractId.eq(contract_id))
        .order_by_asc(quote_info::Column::Position)
        .all(db)
        .await?
        .into_iter()
        .map(QuoteInfoView::from)
        .collect())
}

/// Populate a contract model into its full view.
pub(crate) async fn contract_view<C: ConnectionTrait>(
    db: &C,
    contract: contract::Model,
) -> Result<ContractView, DbErr> {
    let quote_info = contract_line_items(db, contract.id).await?;
    let sales_person = user_ref(db, contract.sales_person_id).await?;
    let created_by = user_ref(db, contract.created_by).await?;

    Ok(ContractView {
        id: contract.id,
        quotation_id: contract.quotation_id,
        contract_no: contract.contract_no,
        contract_date: to_timestamp(contract.contract_date),
        doc_type: contract.doc_type,
        bill_to: contract.bill_to,
        ship_to: contract.ship_to,
        email_to: contract.email_to,
        note: contract.note,
        work_order_no: contract.work_order_no,
        work_order_date: contract.work_order_date.map(to_timestamp),
        gst_no: contract.gst_no,
        payment_terms: contract.payment_terms,
        approved: contract.approved,
        print_count: contract.print_count,
        version: contract.version,
        quote_info,
        sales_person,
        created_by,
        created_at: to_timestamp(contract.created_at),
        updated_at: to_timestamp(contract.updated_at),
    })
}

/// Load and populate a contract by its identifier.
pub(crate) async fn load_contract_view<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<ContractView>, DbErr> {
    let Some(contract) = contract::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    contract_view(db, contract).await.map(Some)
}

/// Populate a quotation model into its full view.
pub(crate) async fn quotation_view<C: ConnectionTrait>(
    db: &C,
    quotation: quotation::Model,
) -> Result<QuotationView, DbErr> {
    let quote_info = quote_info::Entity::find()
        .filter(quote_info::Column::QuotationId.eq(quotation.id))
        .order_by_asc(quote_info::Column::Position)
        .all(db)
        .await?
        .into_iter()
        .map(QuoteInfoView::from)
        .collect();
    let sales_person = user_ref(db, quotation.sales_person_id).await?;
    let created_by = user_ref(db, quotation.created_by).await?;

    Ok(QuotationView {
        id: quotation.id,
        quotation_no: quotation.quotation_no,
        quotation_date: to_timestamp(quotation.quotation_date),
        doc_type: quotation.doc_type,
        bill_to: quotation.bill_to,
        ship_to: quotation.ship_to,
        email_to: quotation.email_to,
        note: quotation.note,
        work_order_no: quotation.work_order_no,
        work_order_date: quotation.work_order_date.map(to_timestamp),
        gst_no: quotation.gst_no,
        payment_terms: quotation.payment_terms,
        approved: quotation.approved,
        contractified: quotation.contractified,
        print_count: quotation.print_count,
        version: quotation.version,
        quote_info,
        sales_person,
        created_by,
        created_at: to_timestamp(quotation.created_at),
        updated_at: to_timestamp(quotation.updated_at),
    })
}

/// Load and populate a quotation by its identifier.
pub(crate) async fn load_quotation_view<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<QuotationView>, DbErr> {
    let Some(quotation) = quotation::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    quotation_view(db, quotation).await.map(Some)
}
