use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    quotation, sequence, ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr, EntityTrait,
    TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::Serialize;

use crate::{
    archive::{record_revision, ArchiveTarget},
    auth::AuthenticatedUserId,
    snapshot::{self, QuotationView},
};

/// Prefix of generated quotation numbers.
const QUOTATION_NO_PREFIX: &str = "QT";

/// Errors that may occur during the quotation approval process.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum QuotationApproveError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Provided quotation identifier does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "quotation not found")]
    QuotationNotFound,

    /// Approval is a one-way transition; repeated attempts are rejected.
    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "quotation already approved")]
    AlreadyApproved,
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct QuotationApproveResponse {
    message: &'static str,
    result: QuotationView,
}

/// Quotation approval handler.
///
/// Mirrors contract approval: records the pre-approval baseline, marks the
/// quotation approved and assigns its number from the quotation number
/// sequence exactly once.
pub(super) async fn approve(
    Extension(current_user): Extension<AuthenticatedUserId>,
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
) -> Result<Json<QuotationApproveResponse>, QuotationApproveError> {
    db.transaction(|txn| {
        Box::pin(async move {
            let quotation = quotation::Entity::find_by_id(id)
                .one(txn)
                .await?
                .ok_or(QuotationApproveError::QuotationNotFound)?;

            if quotation.approved {
                return Err(QuotationApproveError::AlreadyApproved);
            }

            let baseline = snapshot::quotation_view(txn, quotation.clone()).await?;

            record_revision(
                txn,
                ArchiveTarget::Quotation(id),
                &baseline,
                current_user.id(),
                "Approved",
                Vec::new(),
            )
            .await?;

            let number = sequence::next_value(txn, sequence::QUOTATION_NO).await?;
            let version = quotation.version;

            let mut active: quotation::ActiveModel = quotation.into();
            active.approved = ActiveValue::Set(true);
            active.quotation_no = ActiveValue::Set(Some(sequence::format_number(
                QUOTATION_NO_PREFIX,
                number,
            )));
            active.version = ActiveValue::Set(version + 1);
            active.updated_at = ActiveValue::Set(db::now());
            active.update(txn).await?;

            let result = snapshot::load_quotation_view(txn, id)
                .await?
                .ok_or(QuotationApproveError::QuotationNotFound)?;

            Ok(Json(QuotationApproveResponse {
                message: "Quotation Approved.",
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
    async fn approve_twice_fails() {
        let db = create_database().await;

        let (_, token) = create_user(&db, "meera", false).await;

        let mut service = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()));

        let created = service
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
            .unwrap()
            .json()
            .await;

        let id = created["result"]["id"].as_i64().unwrap();

        let first = service
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

        let body = first.json().await;

        assert_eq!(body["message"], "Quotation Approved.");
        assert_eq!(body["result"]["approved"], true);
        assert_eq!(body["result"]["quotationNo"], "QT-0001");

        let second = service
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

        assert_eq!(second.status(), StatusCode::CONFLICT);
    }
}
