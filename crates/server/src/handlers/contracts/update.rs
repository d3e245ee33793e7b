use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    contract, ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr, EntityTrait,
    TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    archive::{record_revision, ArchiveTarget},
    auth::AuthenticatedUserId,
    fields::DocumentFields,
    line_items::{reconcile_line_items, LineItemOwner, ReconcileError},
    snapshot::{self, ContractView},
    validation::ValidatedJson,
};

/// Errors that may occur during the contract update process.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum ContractUpdateError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Provided contract identifier does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "contract not found")]
    ContractNotFound,

    /// The update was made against a stale version of the contract.
    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "contract was modified by another user, please refresh")]
    EditConflict,

    /// A date value in the request is out of range.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "invalid date value")]
    InvalidDate,

    /// An incoming line item referenced a row that does not belong to
    /// this contract.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "unknown line item")]
    UnknownLineItem,
}

impl From<ReconcileError> for ContractUpdateError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::Database(err) => Self::DatabaseError(err),
            ReconcileError::UnknownLineItem => Self::UnknownLineItem,
        }
    }
}

/// JSON request body.
#[derive(Deserialize, Validate)]
pub(super) struct ContractUpdateRequest {
    /// Change message recorded with the revision of an approved contract.
    #[validate(length(min = 1))]
    message: String,

    /// Names of the fields the client changed.
    #[serde(default)]
    modified: Vec<String>,

    /// Version of the contract the client based its edit on.
    version: i32,

    #[validate]
    contract: DocumentFields,
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct ContractUpdateResponse {
    message: &'static str,
    result: ContractView,
}

/// Contract update handler.
///
/// Approved contracts are archived before any field changes: the full prior
/// state is recorded as a revision inside the same transaction, so readers
/// never observe a mutation that is not covered by the archive. Line items
/// dropped from a draft contract are deleted; once the contract is approved
/// they are only detached.
pub(super) async fn update(
    Extension(current_user): Extension<AuthenticatedUserId>,
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<ContractUpdateRequest>,
) -> Result<Json<ContractUpdateResponse>, ContractUpdateError> {
    db.transaction(|txn| {
        Box::pin(async move {
            let contract = contract::Entity::find_by_id(id)
                .one(txn)
                .await?
                .ok_or(ContractUpdateError::ContractNotFound)?;

            if contract.version != request.version {
                return Err(ContractUpdateError::EditConflict);
            }

            let approved = contract.approved;

            if approved {
                let prior_state = snapshot::contract_view(txn, contract.clone()).await?;

                record_revision(
                    txn,
                    ArchiveTarget::Contract(id),
                    &prior_state,
                    current_user.id(),
                    &request.message,
                    request.modified,
                )
                .await?;
            }

            let mut active: contract::ActiveModel = contract.into();

            let quote_info = request
                .contract
                .apply_contract(&mut active)
                .map_err(|_| ContractUpdateError::InvalidDate)?;

            active.version = ActiveValue::Set(request.version + 1);
            active.updated_at = ActiveValue::Set(db::now());
            active.update(txn).await?;

            reconcile_line_items(txn, LineItemOwner::Contract(id), approved, &quote_info).await?;

            let result = snapshot::load_contract_view(txn, id)
                .await?
                .ok_or(ContractUpdateError::ContractNotFound)?;

            Ok(Json(ContractUpdateResponse {
                message: "Contract Updated",
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

    use crate::testing::{
        contract_payload, create_database, create_user, quote_item, quote_item_with_id,
        RequestBodyExt, ResponseBodyExt,
    };

    use axum::{
        body::Body,
        http::{Request, Response, StatusCode},
    };
    use common::config::Config;
    use db::{quote_info, revision, DatabaseConnection, EntityTrait, PaginatorTrait};
    use serde_json::{json, Value};
    use tower::Service;

    type Router = axum::Router;

    async fn create_contract(
        service: &mut Router,
        token: &str,
        items: Vec<Value>,
    ) -> (i64, Vec<i64>) {
        let created = service
            .call(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/contract/create")
                    .header("Authorization", format!("Bearer {token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({ "contract": contract_payload(items) })))
                    .unwrap(),
            )
            .await
            .unwrap()
            .json()
            .await;

        let id = created["result"]["id"].as_i64().unwrap();
        let item_ids = created["result"]["quoteInfo"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_i64().unwrap())
            .collect();

        (id, item_ids)
    }

    async fn approve_contract(service: &mut Router, token: &str, id: i64) {
        let response = service
            .call(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/v1/contract/approve/{id}"))
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    async fn update_contract(
        service: &mut Router,
        token: &str,
        id: i64,
        version: i64,
        items: Vec<Value>,
    ) -> Response<axum::body::BoxBody> {
        service
            .call(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/contract/{id}"))
                    .header("Authorization", format!("Bearer {token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({
                        "message": "rate revision",
                        "modified": ["quoteInfo"],
                        "version": version,
                        "contract": contract_payload(items),
                    })))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn revision_count(db: &DatabaseConnection, contract_id: i64) -> u64 {
        use db::{ColumnTrait, QueryFilter};

        revision::Entity::find()
            .filter(revision::Column::ContractId.eq(contract_id))
            .count(db)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn draft_update_deletes_dropped_line_items() {
        let db = create_database().await;

        let (_, token) = create_user(&db, "meera", false).await;

        let db = Arc::new(db);
        let mut service = crate::app_router(db.clone(), Arc::new(Config::for_tests()));

        let (id, item_ids) = create_contract(
            &mut service,
            &token,
            vec![quote_item("Imidacloprid"), quote_item("Chlorpyrifos")],
        )
        .await;

        let response = update_contract(
            &mut service,
            &token,
            id,
            0,
            vec![
                quote_item_with_id(item_ids[0], "Imidacloprid 2x"),
                quote_item("Fipronil"),
            ],
        )
        .await;

        let body = response.json().await;

        assert_eq!(body["message"], "Contract Updated");
        assert_eq!(body["result"]["version"], 1);
        assert_eq!(body["result"]["quoteInfo"][0]["id"], item_ids[0]);
        assert_eq!(body["result"]["quoteInfo"][0]["chemical"], "Imidacloprid 2x");
        assert_eq!(body["result"]["quoteInfo"][1]["chemical"], "Fipronil");
        assert_eq!(body["result"]["quoteInfo"].as_array().unwrap().len(), 2);

        // The dropped draft line item is gone for good.
        assert!(quote_info::Entity::find_by_id(item_ids[1])
            .one(&*db)
            .await
            .unwrap()
            .is_none());

        // No revision is recorded for draft updates.
        assert_eq!(revision_count(&db, id).await, 0);
    }

    #[tokio::test]
    async fn approved_update_archives_and_preserves_line_items() {
        let db = create_database().await;

        let (_, token) = create_user(&db, "meera", false).await;

        let db = Arc::new(db);
        let mut service = crate::app_router(db.clone(), Arc::new(Config::for_tests()));

        let (id, item_ids) = create_contract(
            &mut service,
            &token,
            vec![quote_item("Imidacloprid"), quote_item("Chlorpyrifos")],
        )
        .await;

        approve_contract(&mut service, &token, id).await;

        // Approval records the baseline revision.
        assert_eq!(revision_count(&db, id).await, 1);

        let response = update_contract(
            &mut service,
            &token,
            id,
            1,
            vec![quote_item_with_id(item_ids[0], "Imidacloprid")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);

        // Exactly one new revision per archived update.
        assert_eq!(revision_count(&db, id).await, 2);

        // The dropped line item is detached, not deleted.
        let dropped = quote_info::Entity::find_by_id(item_ids[1])
            .one(&*db)
            .await
            .unwrap()
            .expect("line item of an approved contract must be preserved");

        assert_eq!(dropped.contract_id, None);

        // The latest revision snapshot still contains the dropped item.
        use db::{ColumnTrait, QueryFilter, QueryOrder};

        let latest = revision::Entity::find()
            .filter(revision::Column::ContractId.eq(id))
            .order_by_desc(revision::Column::Id)
            .one(&*db)
            .await
            .unwrap()
            .unwrap();

        let snapshot_items = latest.snapshot["quoteInfo"].as_array().unwrap();

        assert_eq!(snapshot_items.len(), 2);
        assert_eq!(snapshot_items[1]["chemical"], "Chlorpyrifos");
        assert_eq!(latest.message, "rate revision");
    }

    #[tokio::test]
    async fn stale_version_is_rejected() {
        let db = create_database().await;

        let (_, token) = create_user(&db, "meera", false).await;

        let db = Arc::new(db);
        let mut service = crate::app_router(db.clone(), Arc::new(Config::for_tests()));

        let (id, item_ids) = create_contract(&mut service, &token, vec![quote_item("Imidacloprid")])
            .await;

        let first = update_contract(
            &mut service,
            &token,
            id,
            0,
            vec![quote_item_with_id(item_ids[0], "Imidacloprid")],
        )
        .await;

        assert_eq!(first.status(), StatusCode::OK);

        // Re-sending the same base version must now conflict.
        let second = update_contract(
            &mut service,
            &token,
            id,
            0,
            vec![quote_item_with_id(item_ids[0], "Imidacloprid 2x")],
        )
        .await;

        assert_eq!(second.status(), StatusCode::CONFLICT);

        assert_eq!(revision_count(&db, id).await, 0);
    }

    #[tokio::test]
    async fn foreign_line_item_is_rejected() {
        let db = create_database().await;

        let (_, token) = create_user(&db, "meera", false).await;

        let db = Arc::new(db);
        let mut service = crate::app_router(db.clone(), Arc::new(Config::for_tests()));

        let (_, other_items) =
            create_contract(&mut service, &token, vec![quote_item("Imidacloprid")]).await;
        let (id, _) = create_contract(&mut service, &token, Vec::new()).await;

        let response = update_contract(
            &mut service,
            &token,
            id,
            0,
            vec![quote_item_with_id(other_items[0], "Imidacloprid")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unknown_contract() {
        let db = create_database().await;

        let (_, token) = create_user(&db, "meera", false).await;

        let mut service = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()));

        let response = update_contract(&mut service, &token, 123, 0, Vec::new()).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
