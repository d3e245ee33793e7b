use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    quotation, ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr, EntityTrait,
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
    snapshot::{self, QuotationView},
    validation::ValidatedJson,
};

/// Errors that may occur during the quotation update process.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum QuotationUpdateError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Provided quotation identifier does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "quotation not found")]
    QuotationNotFound,

    /// The update was made against a stale version of the quotation.
    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "quotation was modified by another user, please refresh")]
    EditConflict,

    /// A date value in the request is out of range.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "invalid date value")]
    InvalidDate,

    /// An incoming line item referenced a row that does not belong to
    /// this quotation.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "unknown line item")]
    UnknownLineItem,
}

impl From<ReconcileError> for QuotationUpdateError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::Database(err) => Self::DatabaseError(err),
            ReconcileError::UnknownLineItem => Self::UnknownLineItem,
        }
    }
}

/// JSON request body.
#[derive(Deserialize, Validate)]
pub(super) struct QuotationUpdateRequest {
    /// Change message recorded with the revision of an approved quotation.
    #[validate(length(min = 1))]
    message: String,

    /// Names of the fields the client changed.
    #[serde(default)]
    modified: Vec<String>,

    /// Version of the quotation the client based its edit on.
    version: i32,

    #[validate]
    quotation: DocumentFields,
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct QuotationUpdateResponse {
    message: &'static str,
    result: QuotationView,
}

/// Quotation update handler.
///
/// Follows the same archival policy as contract updates: approved
/// quotations are snapshotted into the revision log before any field
/// changes, and their dropped line items are detached instead of deleted.
pub(super) async fn update(
    Extension(current_user): Extension<AuthenticatedUserId>,
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<QuotationUpdateRequest>,
) -> Result<Json<QuotationUpdateResponse>, QuotationUpdateError> {
    db.transaction(|txn| {
        Box::pin(async move {
            let quotation = quotation::Entity::find_by_id(id)
                .one(txn)
                .await?
                .ok_or(QuotationUpdateError::QuotationNotFound)?;

            if quotation.version != request.version {
                return Err(QuotationUpdateError::EditConflict);
            }

            let approved = quotation.approved;

            if approved {
                let prior_state = snapshot::quotation_view(txn, quotation.clone()).await?;

                record_revision(
                    txn,
                    ArchiveTarget::Quotation(id),
                    &prior_state,
                    current_user.id(),
                    &request.message,
                    request.modified,
                )
                .await?;
            }

            let mut active: quotation::ActiveModel = quotation.into();

            let quote_info = request
                .quotation
                .apply_quotation(&mut active)
                .map_err(|_| QuotationUpdateError::InvalidDate)?;

            active.version = ActiveValue::Set(request.version + 1);
            active.updated_at = ActiveValue::Set(db::now());
            active.update(txn).await?;

            reconcile_line_items(txn, LineItemOwner::Quotation(id), approved, &quote_info).await?;

            let result = snapshot::load_quotation_view(txn, id)
                .await?
                .ok_or(QuotationUpdateError::QuotationNotFound)?;

            Ok(Json(QuotationUpdateResponse {
                message: "Quotation Updated",
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
        http::{Request, StatusCode},
    };
    use common::config::Config;
    use db::{quote_info, revision, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
    use serde_json::json;
    use tower::Service;

    #[tokio::test]
    async fn approved_update_archives_and_detaches() {
        let db = create_database().await;

        let (_, token) = create_user(&db, "meera", false).await;

        let db = Arc::new(db);
        let mut service = crate::app_router(db.clone(), Arc::new(Config::for_tests()));

        let created = service
            .call(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/quotation/create")
                    .header("Authorization", format!("Bearer {token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({
                        "quotation": contract_payload(vec![
                            quote_item("Imidacloprid"),
                            quote_item("Chlorpyrifos"),
                        ])
                    })))
                    .unwrap(),
            )
            .await
            .unwrap()
            .json()
            .await;

        let id = created["result"]["id"].as_i64().unwrap();
        let kept_id = created["result"]["quoteInfo"][0]["id"].as_i64().unwrap();
        let dropped_id = created["result"]["quoteInfo"][1]["id"].as_i64().unwrap();

        let approve = service
            .call(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/v1/quotation/approve/{id}"))
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(approve.status(), StatusCode::OK);

        let update = service
            .call(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/quotation/{id}"))
                    .header("Authorization", format!("Bearer {token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({
                        "message": "dropped garden treatment",
                        "modified": ["quoteInfo"],
                        "version": 1,
                        "quotation": contract_payload(vec![
                            quote_item_with_id(kept_id, "Imidacloprid"),
                        ]),
                    })))
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = update.json().await;

        assert_eq!(body["message"], "Quotation Updated");
        assert_eq!(body["result"]["version"], 2);
        assert_eq!(body["result"]["quoteInfo"].as_array().unwrap().len(), 1);
        assert_eq!(body["result"]["quoteInfo"][0]["id"], kept_id);

        // Approval baseline + one archived update.
        let revisions = revision::Entity::find()
            .filter(revision::Column::QuotationId.eq(id))
            .count(&*db)
            .await
            .unwrap();

        assert_eq!(revisions, 2);

        // The dropped line item survives, detached from the live list.
        let dropped = quote_info::Entity::find_by_id(dropped_id)
            .one(&*db)
            .await
            .unwrap()
            .expect("line item of an approved quotation must be preserved");

        assert_eq!(dropped.quotation_id, None);
    }
}
