use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    chemical, ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr, EntityTrait,
    TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::ValidatedJson;

use super::ChemicalData;

/// Errors that may occur during batch number mutations.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum BatchNumberError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Provided chemical identifier does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "chemical not found")]
    ChemicalNotFound,
}

/// JSON request body.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(super) struct BatchNumberRequest {
    #[validate(length(min = 1))]
    batch_no: String,
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct BatchNumberResponse {
    message: &'static str,
    result: ChemicalData,
}

/// Add a batch number to a chemical.
///
/// Adding is an idempotent set operation: re-adding an existing number is
/// a no-op, never a duplicate.
pub(super) async fn add(
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<BatchNumberRequest>,
) -> Result<Json<BatchNumberResponse>, BatchNumberError> {
    db.transaction(|txn| {
        Box::pin(async move {
            let model = chemical::Entity::find_by_id(id)
                .one(txn)
                .await?
                .ok_or(BatchNumberError::ChemicalNotFound)?;

            let mut batch_nos = model.batch_nos.clone();

            let result = if batch_nos.insert(&request.batch_no) {
                let mut active: chemical::ActiveModel = model.into();
                active.batch_nos = ActiveValue::Set(batch_nos);

                active.update(txn).await?.into()
            } else {
                model.into()
            };

            Ok(Json(BatchNumberResponse {
                message: "Batch number added",
                result,
            }))
        })
    })
    .await
    .into_raw_result()
}

/// Remove a batch number from a chemical. Removing an absent number is
/// a no-op.
pub(super) async fn remove(
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<BatchNumberRequest>,
) -> Result<Json<BatchNumberResponse>, BatchNumberError> {
    db.transaction(|txn| {
        Box::pin(async move {
            let model = chemical::Entity::find_by_id(id)
                .one(txn)
                .await?
                .ok_or(BatchNumberError::ChemicalNotFound)?;

            let mut batch_nos = model.batch_nos.clone();

            let result = if batch_nos.remove(&request.batch_no) {
                let mut active: chemical::ActiveModel = model.into();
                active.batch_nos = ActiveValue::Set(batch_nos);

                active.update(txn).await?.into()
            } else {
                model.into()
            };

            Ok(Json(BatchNumberResponse {
                message: "Batch number deleted",
                result,
            }))
        })
    })
    .await
    .into_raw_result()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::testing::{create_database, create_user, RequestBodyExt, ResponseBodyExt};

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use common::config::Config;
    use serde_json::json;
    use tower::Service;

    async fn create_chemical(service: &mut axum::Router, token: &str) -> i64 {
        let created = service
            .call(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/chemical")
                    .header("Authorization", format!("Bearer {token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({ "chemical": "Imidacloprid" })))
                    .unwrap(),
            )
            .await
            .unwrap()
            .json()
            .await;

        created["result"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn add_is_idempotent() {
        let db = create_database().await;

        let (_, token) = create_user(&db, "meera", false).await;

        let mut service = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()));

        let id = create_chemical(&mut service, &token).await;

        for _ in 0..2 {
            let response = service
                .call(
                    Request::builder()
                        .method("POST")
                        .uri(format!("/api/v1/chemical/{id}/batch"))
                        .header("Authorization", format!("Bearer {token}"))
                        .header("Content-Type", "application/json")
                        .body(Body::from_json(json!({ "batchNo": "B-100" })))
                        .unwrap(),
                )
                .await
                .unwrap();

            let body = response.json().await;

            assert_eq!(body["message"], "Batch number added");
            assert_eq!(body["result"]["batchNos"], serde_json::json!(["B-100"]));
        }
    }

    #[tokio::test]
    async fn remove_deletes_one_entry() {
        let db = create_database().await;

        let (_, token) = create_user(&db, "meera", false).await;

        let mut service = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()));

        let id = create_chemical(&mut service, &token).await;

        for batch_no in ["B-100", "B-200"] {
            service
                .call(
                    Request::builder()
                        .method("POST")
                        .uri(format!("/api/v1/chemical/{id}/batch"))
                        .header("Authorization", format!("Bearer {token}"))
                        .header("Content-Type", "application/json")
                        .body(Body::from_json(json!({ "batchNo": batch_no })))
                        .unwrap(),
                )
                .await
                .unwrap();
        }

        let response = service
            .call(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/chemical/{id}/batch"))
                    .header("Authorization", format!("Bearer {token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({ "batchNo": "B-100" })))
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = response.json().await;

        assert_eq!(body["message"], "Batch number deleted");
        assert_eq!(body["result"]["batchNos"], serde_json::json!(["B-200"]));
    }

    #[tokio::test]
    async fn unknown_chemical() {
        let db = create_database().await;

        let (_, token) = create_user(&db, "meera", false).await;

        let mut service = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()));

        let response = service
            .call(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/chemical/123/batch")
                    .header("Authorization", format!("Bearer {token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({ "batchNo": "B-100" })))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
