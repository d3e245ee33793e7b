use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    contract, user, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, OffsetDateTime, Order,
    PaginatorTrait, PrimitiveDateTime, QueryFilter, QueryOrder, QuerySelect,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use time::macros::format_description;

use crate::{pagination::Pagination, snapshot};

/// Errors that may occur during the contract list request.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum ContractListError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Malformed `fromDate`/`toDate` filter value.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "invalid date filter, expected YYYY-MM-DD")]
    InvalidDateFilter,
}

/// Sort direction over the last-update timestamp.
#[derive(Copy, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(super) enum SortOrder {
    Asc,
    Desc,
}

/// Query string filters.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ContractListQuery {
    #[serde(default)]
    created_by: Option<i64>,

    #[serde(default)]
    project_name: Option<String>,

    #[serde(default)]
    client_name: Option<String>,

    #[serde(default)]
    contract_no: Option<String>,

    /// Inclusive lower bound on the contract date, `YYYY-MM-DD`.
    #[serde(default)]
    from_date: Option<String>,

    /// Inclusive upper bound on the contract date, `YYYY-MM-DD`.
    #[serde(default)]
    to_date: Option<String>,

    #[serde(default)]
    approved: Option<bool>,

    #[serde(default)]
    order: Option<SortOrder>,
}

/// Summary of a single contract.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ContractListItem {
    pub id: i64,
    pub contract_no: Option<String>,
    pub contract_date: i64,
    pub doc_type: contract::DocType,
    pub client_name: String,
    pub project_name: String,
    pub approved: bool,
    pub created_by: Option<String>,
    pub updated_at: i64,
}

/// JSON response body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ContractListResponse {
    message: &'static str,
    result: Vec<ContractListItem>,
    total_contracts: u64,
    today_contracts: u64,
    approved_count: u64,
    approve_pending: u64,
}

fn parse_date(value: &str) -> Result<time::Date, ContractListError> {
    let format = format_description!("[year]-[month]-[day]");

    time::Date::parse(value, &format).map_err(|_| ContractListError::InvalidDateFilter)
}

fn day_start(date: time::Date) -> PrimitiveDateTime {
    PrimitiveDateTime::new(date, time::Time::MIDNIGHT)
}

fn day_end(date: time::Date) -> Result<PrimitiveDateTime, ContractListError> {
    let end = time::Time::from_hms(23, 59, 59).map_err(|_| ContractListError::InvalidDateFilter)?;

    Ok(PrimitiveDateTime::new(date, end))
}

/// List contracts matching the provided filters, together with the
/// dashboard counters.
pub(super) async fn list(
    State(db): State<Arc<DatabaseConnection>>,
    Query(filters): Query<ContractListQuery>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ContractListResponse>, ContractListError> {
    let mut query = contract::Entity::find();

    if let Some(created_by) = filters.created_by {
        query = query.filter(contract::Column::CreatedBy.eq(created_by));
    }

    if let Some(project_name) = &filters.project_name {
        query = query.filter(contract::Column::ProjectName.contains(project_name));
    }

    if let Some(client_name) = &filters.client_name {
        query = query.filter(contract::Column::ClientName.contains(client_name));
    }

    if let Some(contract_no) = &filters.contract_no {
        query = query.filter(contract::Column::ContractNo.contains(contract_no));
    }

    if let Some(approved) = filters.approved {
        query = query.filter(contract::Column::Approved.eq(approved));
    }

    if let Some(from_date) = &filters.from_date {
        query = query.filter(contract::Column::ContractDate.gte(day_start(parse_date(from_date)?)));
    }

    if let Some(to_date) = &filters.to_date {
        query = query.filter(contract::Column::ContractDate.lte(day_end(parse_date(to_date)?)?));
    }

    let order = match filters.order {
        Some(SortOrder::Asc) => Order::Asc,
        _ => Order::Desc,
    };

    let result = query
        .order_by(contract::Column::UpdatedAt, order)
        .offset(pagination.offset())
        .limit(pagination.limit())
        .find_also_related(user::Entity)
        .all(&*db)
        .await?
        .into_iter()
        .map(|(contract, created_by)| ContractListItem {
            id: contract.id,
            contract_no: contract.contract_no,
            contract_date: snapshot::to_timestamp(contract.contract_date),
            doc_type: contract.doc_type,
            client_name: contract.client_name,
            project_name: contract.project_name,
            approved: contract.approved,
            created_by: created_by.map(|user| user.username),
            updated_at: snapshot::to_timestamp(contract.updated_at),
        })
        .collect();

    let today = day_start(OffsetDateTime::now_utc().date());

    let total_contracts = contract::Entity::find().count(&*db).await?;
    let today_contracts = contract::Entity::find()
        .filter(contract::Column::CreatedAt.gte(today))
        .count(&*db)
        .await?;
    let approved_count = contract::Entity::find()
        .filter(contract::Column::Approved.eq(true))
        .count(&*db)
        .await?;
    let approve_pending = contract::Entity::find()
        .filter(contract::Column::Approved.eq(false))
        .count(&*db)
        .await?;

    Ok(Json(ContractListResponse {
        message: "Contracts Retrieved",
        result,
        total_contracts,
        today_contracts,
        approved_count,
        approve_pending,
    }))
}
