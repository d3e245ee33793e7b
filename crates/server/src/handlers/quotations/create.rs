use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use db::{
    quotation, ActiveValue, DatabaseConnection, DbErr, EntityTrait, TransactionErrorExt,
    TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    auth::AuthenticatedUserId,
    fields::DocumentFields,
    line_items::{create_line_items, LineItemOwner},
    snapshot::{self, QuotationView},
    validation::ValidatedJson,
};

/// Errors that may occur during the quotation creation process.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum QuotationCreateError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// A date value in the request is out of range.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "invalid date value")]
    InvalidDate,
}

/// JSON request body.
#[derive(Deserialize, Validate)]
pub(super) struct QuotationCreateRequest {
    #[validate]
    quotation: DocumentFields,
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct QuotationCreateResponse {
    message: &'static str,
    result: QuotationView,
}

/// Quotation creation handler.
pub(super) async fn create(
    Extension(current_user): Extension<AuthenticatedUserId>,
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedJson(request): ValidatedJson<QuotationCreateRequest>,
) -> Result<Json<QuotationCreateResponse>, QuotationCreateError> {
    db.transaction(|txn| {
        Box::pin(async move {
            let mut active = quotation::ActiveModel {
                quotation_date: ActiveValue::Set(db::now()),
                approved: ActiveValue::Set(false),
                contractified: ActiveValue::Set(false),
                print_count: ActiveValue::Set(0),
                version: ActiveValue::Set(0),
                created_by: ActiveValue::Set(Some(current_user.id())),
                created_at: ActiveValue::Set(db::now()),
                updated_at: ActiveValue::Set(db::now()),
                ..Default::default()
            };

            let quote_info = request
                .quotation
                .apply_quotation(&mut active)
                .map_err(|_| QuotationCreateError::InvalidDate)?;

            let model = quotation::Entity::insert(active)
                .exec_with_returning(txn)
                .await?;

            create_line_items(txn, LineItemOwner::Quotation(model.id), &quote_info).await?;

            let result = snapshot::quotation_view(txn, model).await?;

            Ok(Json(QuotationCreateResponse {
                message: "Quotation Created!",
                result,
            }))
        })
    })
    .await
    .into_raw_result()
}
