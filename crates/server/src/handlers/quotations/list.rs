use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    quotation, user, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, OffsetDateTime, Order,
    PaginatorTrait, PrimitiveDateTime, QueryFilter, QueryOrder, QuerySelect,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use time::macros::format_description;

use crate::{pagination::Pagination, snapshot};

/// Errors that may occur during the quotation list request.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum QuotationListError {
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
pub(super) struct QuotationListQuery {
    #[serde(default)]
    created_by: Option<i64>,

    #[serde(default)]
    project_name: Option<String>,

    #[serde(default)]
    client_name: Option<String>,

    #[serde(default)]
    quotation_no: Option<String>,

    /// Inclusive lower bound on the quotation date, `YYYY-MM-DD`.
    #[serde(default)]
    from_date: Option<String>,

    /// Inclusive upper bound on the quotation date, `YYYY-MM-DD`.
    #[serde(default)]
    to_date: Option<String>,

    #[serde(default)]
    approved: Option<bool>,

    #[serde(default)]
    contractified: Option<bool>,

    #[serde(default)]
    order: Option<SortOrder>,
}

/// Summary of a single quotation.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct QuotationListItem {
    pub id: i64,
    pub quotation_no: Option<String>,
    pub quotation_date: i64,
    pub doc_type: db::contract::DocType,
    pub client_name: String,
    pub project_name: String,
    pub approved: bool,
    pub contractified: bool,
    pub created_by: Option<String>,
    pub updated_at: i64,
}

impl QuotationListItem {
    pub(super) fn new(quotation: quotation::Model, created_by: Option<String>) -> Self {
        Self {
            id: quotation.id,
            quotation_no: quotation.quotation_no,
            quotation_date: snapshot::to_timestamp(quotation.quotation_date),
            doc_type: quotation.doc_type,
            client_name: quotation.client_name,
            project_name: quotation.project_name,
            approved: quotation.approved,
            contractified: quotation.contractified,
            created_by,
            updated_at: snapshot::to_timestamp(quotation.updated_at),
        }
    }
}

/// JSON response body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct QuotationListResponse {
    message: &'static str,
    result: Vec<QuotationListItem>,
    total_quotations: u64,
    today_quotations: u64,
    approved_count: u64,
    approve_pending: u64,
}

fn parse_date(value: &str) -> Result<time::Date, QuotationListError> {
    let format = format_description!("[year]-[month]-[day]");

    time::Date::parse(value, &format).map_err(|_| QuotationListError::InvalidDateFilter)
}

fn day_start(date: time::Date) -> PrimitiveDateTime {
    PrimitiveDateTime::new(date, time::Time::MIDNIGHT)
}

fn day_end(date: time::Date) -> Result<PrimitiveDateTime, QuotationListError> {
    let end =
        time::Time::from_hms(23, 59, 59).map_err(|_| QuotationListError::InvalidDateFilter)?;

    Ok(PrimitiveDateTime::new(date, end))
}

/// List quotations matching the provided filters, together with the
/// dashboard counters.
pub(super) async fn list(
    State(db): State<Arc<DatabaseConnection>>,
    Query(filters): Query<QuotationListQuery>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<QuotationListResponse>, QuotationListError> {
    let mut query = quotation::Entity::find();

    if let Some(created_by) = filters.created_by {
        query = query.filter(quotation::Column::CreatedBy.eq(created_by));
    }

    if let Some(project_name) = &filters.project_name {
        query = query.filter(quotation::Column::ProjectName.contains(project_name));
    }

    if let Some(client_name) = &filters.client_name {
        query = query.filter(quotation::Column::ClientName.contains(client_name));
    }

    if let Some(quotation_no) = &filters.quotation_no {
        query = query.filter(quotation::Column::QuotationNo.contains(quotation_no));
    }

    if let Some(approved) = filters.approved {
        query = query.filter(quotation::Column::Approved.eq(approved));
    }

    if let Some(contractified) = filters.contractified {
        query = query.filter(quotation::Column::Contractified.eq(contractified));
    }

    if let Some(from_date) = &filters.from_date {
        query =
            query.filter(quotation::Column::QuotationDate.gte(day_start(parse_date(from_date)?)));
    }

    if let Some(to_date) = &filters.to_date {
        query = query.filter(quotation::Column::QuotationDate.lte(day_end(parse_date(to_date)?)?));
    }

    let order = match filters.order {
        Some(SortOrder::Asc) => Order::Asc,
        _ => Order::Desc,
    };

    let result = query
        .order_by(quotation::Column::UpdatedAt, order)
        .offset(pagination.offset())
        .limit(pagination.limit())
        .find_also_related(user::Entity)
        .all(&*db)
        .await?
        .into_iter()
        .map(|(quotation, created_by)| {
            QuotationListItem::new(quotation, created_by.map(|user| user.username))
        })
        .collect();

    let today = day_start(OffsetDateTime::now_utc().date());

    let total_quotations = quotation::Entity::find().count(&*db).await?;
    let today_quotations = quotation::Entity::find()
        .filter(quotation::Column::CreatedAt.gte(today))
        .count(&*db)
        .await?;
    let approved_count = quotation::Entity::find()
        .filter(quotation::Column::Approved.eq(true))
        .count(&*db)
        .await?;
    let approve_pending = quotation::Entity::find()
        .filter(quotation::Column::Approved.eq(false))
        .count(&*db)
        .await?;

    Ok(Json(QuotationListResponse {
        message: "Quotations Retrieved",
        result,
        total_quotations,
        today_quotations,
        approved_count,
        approve_pending,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::testing::{
        contract_payload, create_database, create_user, RequestBodyExt, ResponseBodyExt,
    };

    use axum::{body::Body, http::Request};
    use common::config::Config;
    use serde_json::json;
    use tower::Service;

    #[tokio::test]
    async fn counters_and_pagination() {
        let db = create_database().await;

        let (_, token) = create_user(&db, "meera", false).await;

        let mut service = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()));

        for _ in 0..3 {
            let response = service
                .call(
                    Request::builder()
                        .method("POST")
                        .uri("/api/v1/quotation/create")
                        .header("Authorization", format!("Bearer {token}"))
                        .header("Content-Type", "application/json")
                        .body(Body::from_json(
                            json!({ "quotation": contract_payload(Vec::new()) }),
                        ))
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), axum::http::StatusCode::OK);
        }

        let response = service
            .call(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/quotation?limit=2")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = response.json().await;

        assert_eq!(body["result"].as_array().unwrap().len(), 2);
        assert_eq!(body["message"], "Quotations Retrieved");
        assert_eq!(body["totalQuotations"], 3);
        assert_eq!(body["todayQuotations"], 3);
        assert_eq!(body["approvedCount"], 0);
        assert_eq!(body["approvePending"], 3);
    }
}
