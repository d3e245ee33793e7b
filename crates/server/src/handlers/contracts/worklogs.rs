use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    contract, work_log, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, SelectExt, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    auth::AuthenticatedUserId,
    snapshot::{self, UserRef},
    validation::ValidatedJson,
};

/// Errors that may occur while working with contract work logs.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum WorkLogError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Provided contract identifier does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "contract not found")]
    ContractNotFound,
}

/// A single resolved work log entry.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WorkLogData {
    pub id: i64,
    pub work_area_type: String,
    pub chemical: String,
    pub chemical_used: String,
    pub remark: Option<String>,
    pub area_treated: String,
    pub area_treated_unit: String,
    pub entry_by: Option<UserRef>,
    pub timestamp: i64,
}

async fn work_log_data<C: db::ConnectionTrait>(
    db: &C,
    model: work_log::Model,
) -> Result<WorkLogData, DbErr> {
    let entry_by = snapshot::user_ref(db, model.entry_by).await?;

    Ok(WorkLogData {
        id: model.id,
        work_area_type: model.work_area_type,
        chemical: model.chemical,
        chemical_used: model.chemical_used,
        remark: model.remark,
        area_treated: model.area_treated,
        area_treated_unit: model.area_treated_unit,
        entry_by,
        timestamp: snapshot::to_timestamp(model.created_at),
    })
}

/// JSON request body.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(super) struct WorkLogCreateRequest {
    work_area_type: String,

    #[validate(length(min = 1))]
    chemical: String,

    chemical_used: String,

    #[serde(default)]
    remark: Option<String>,

    area_treated: String,

    area_treated_unit: String,
}

/// JSON response body of the creation handler.
#[derive(Serialize)]
pub(super) struct WorkLogCreateResponse {
    message: &'static str,
    result: WorkLogData,
}

/// Work log creation handler. Appends a new record against the contract.
pub(super) async fn create(
    Extension(current_user): Extension<AuthenticatedUserId>,
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<WorkLogCreateRequest>,
) -> Result<Json<WorkLogCreateResponse>, WorkLogError> {
    db.transaction(|txn| {
        Box::pin(async move {
            let contract_exists = contract::Entity::find_by_id(id)
                .select_only()
                .exists(txn)
                .await?;

            if !contract_exists {
                return Err(WorkLogError::ContractNotFound);
            }

            let model = work_log::Entity::insert(work_log::ActiveModel {
                contract_id: ActiveValue::Set(id),
                work_area_type: ActiveValue::Set(request.work_area_type),
                chemical: ActiveValue::Set(request.chemical),
                chemical_used: ActiveValue::Set(request.chemical_used),
                remark: ActiveValue::Set(request.remark),
                area_treated: ActiveValue::Set(request.area_treated),
                area_treated_unit: ActiveValue::Set(request.area_treated_unit),
                entry_by: ActiveValue::Set(Some(current_user.id())),
                created_at: ActiveValue::Set(db::now()),
                ..Default::default()
            })
            .exec_with_returning(txn)
            .await?;

            let result = work_log_data(txn, model).await?;

            Ok(Json(WorkLogCreateResponse {
                message: "Worklog Created",
                result,
            }))
        })
    })
    .await
    .into_raw_result()
}

/// JSON response body of the list handler.
#[derive(Serialize)]
pub(super) struct WorkLogListResponse {
    message: &'static str,
    result: Vec<WorkLogData>,
}

/// List the work logs recorded against a contract, oldest first.
pub(super) async fn list(
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
) -> Result<Json<WorkLogListResponse>, WorkLogError> {
    let contract_exists = contract::Entity::find_by_id(id)
        .select_only()
        .exists(&*db)
        .await?;

    if !contract_exists {
        return Err(WorkLogError::ContractNotFound);
    }

    let mut result = Vec::new();

    for model in work_log::Entity::find()
        .filter(work_log::Column::ContractId.eq(id))
        .order_by_asc(work_log::Column::Id)
        .all(&*db)
        .await?
    {
        result.push(work_log_data(&*db, model).await?);
    }

    Ok(Json(WorkLogListResponse {
        message: "",
        result,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::testing::{
        contract_payload, create_database, create_user, RequestBodyExt, ResponseBodyExt,
    };

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use common::config::Config;
    use serde_json::json;
    use tower::Service;

    #[tokio::test]
    async fn create_and_list() {
        let db = create_database().await;

        let (user_id, token) = create_user(&db, "meera", false).await;

        let mut service = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()));

        let created = service
            .call(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/contract/create")
                    .header("Authorization", format!("Bearer {token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(
                        json!({ "contract": contract_payload(Vec::new()) }),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap()
            .json()
            .await;

        let id = created["result"]["id"].as_i64().unwrap();

        let create = service
            .call(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/contract/{id}/worklog"))
                    .header("Authorization", format!("Bearer {token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({
                        "workAreaType": "indoor",
                        "chemical": "Imidacloprid",
                        "chemicalUsed": "2.5 l",
                        "areaTreated": "450",
                        "areaTreatedUnit": "sqft",
                    })))
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = create.json().await;

        assert_eq!(body["message"], "Worklog Created");
        assert_eq!(body["result"]["chemical"], "Imidacloprid");
        assert_eq!(body["result"]["entryBy"]["id"], user_id);
        assert_eq!(body["result"]["entryBy"]["username"], "meera");

        let listing = service
            .call(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/v1/contract/{id}/worklog"))
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = listing.json().await;

        assert_eq!(body["result"].as_array().unwrap().len(), 1);
        assert_eq!(body["result"][0]["chemical"], "Imidacloprid");
        assert_eq!(body["result"][0]["areaTreated"], "450");
    }

    #[tokio::test]
    async fn unknown_contract() {
        let db = create_database().await;

        let (_, token) = create_user(&db, "meera", false).await;

        let mut service = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()));

        let response = service
            .call(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/contract/123/worklog")
                    .header("Authorization", format!("Bearer {token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({
                        "workAreaType": "indoor",
                        "chemical": "Imidacloprid",
                        "chemicalUsed": "2.5 l",
                        "areaTreated": "450",
                        "areaTreatedUnit": "sqft",
                    })))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
