use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{contract, DatabaseConnection, DbErr, EntityTrait};
use derive_more::{Display, Error, From};
use serde::Serialize;

/// Errors that may occur during the contract deletion process.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum ContractDeletionError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Provided contract identifier does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "contract not found")]
    ContractNotFound,
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct ContractDeletionResponse {
    message: &'static str,
}

/// Contract deletion handler.
pub(super) async fn delete(
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
) -> Result<Json<ContractDeletionResponse>, ContractDeletionError> {
    let result = contract::Entity::delete_by_id(id).exec(&*db).await?;

    if result.rows_affected == 0 {
        return Err(ContractDeletionError::ContractNotFound);
    }

    Ok(Json(ContractDeletionResponse {
        message: "Contract Deleted!",
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::testing::{
        contract_payload, create_database, create_user, RequestBodyExt, ResponseBodyExt,
    };

    use assert_json::assert_json;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use common::config::Config;
    use serde_json::json;
    use tower::Service;

    #[tokio::test]
    async fn successful() {
        let db = create_database().await;

        let (_, token) = create_user(&db, "meera", false).await;

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

        let response = service
            .call(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/contract/{id}"))
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_json!(response.json().await, {
            "message": "Contract Deleted!",
        });

        let details = service
            .call(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/v1/contract/{id}"))
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(details.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_contract() {
        let db = create_database().await;

        let (_, token) = create_user(&db, "meera", false).await;

        let mut service = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()));

        let response = service
            .call(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/v1/contract/123")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
