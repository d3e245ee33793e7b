use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use db::{
    contract, ActiveValue, DatabaseConnection, DbErr, EntityTrait, TransactionErrorExt,
    TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    auth::AuthenticatedUserId,
    fields::DocumentFields,
    line_items::{create_line_items, LineItemOwner},
    snapshot::{self, ContractView},
    validation::ValidatedJson,
};

/// Errors that may occur during the contract creation process.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum ContractCreateError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// A date value in the request is out of range.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "invalid date value")]
    InvalidDate,
}

/// JSON request body.
#[derive(Deserialize, Validate)]
pub(super) struct ContractCreateRequest {
    #[validate]
    contract: DocumentFields,
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct ContractCreateResponse {
    message: &'static str,
    result: ContractView,
}

/// Contract creation handler.
pub(super) async fn create(
    Extension(current_user): Extension<AuthenticatedUserId>,
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedJson(request): ValidatedJson<ContractCreateRequest>,
) -> Result<Json<ContractCreateResponse>, ContractCreateError> {
    db.transaction(|txn| {
        Box::pin(async move {
            let mut active = contract::ActiveModel {
                contract_date: ActiveValue::Set(db::now()),
                approved: ActiveValue::Set(false),
                print_count: ActiveValue::Set(0),
                version: ActiveValue::Set(0),
                created_by: ActiveValue::Set(Some(current_user.id())),
                created_at: ActiveValue::Set(db::now()),
                updated_at: ActiveValue::Set(db::now()),
                ..Default::default()
            };

            let quote_info = request
                .contract
                .apply_contract(&mut active)
                .map_err(|_| ContractCreateError::InvalidDate)?;

            let model = contract::Entity::insert(active)
                .exec_with_returning(txn)
                .await?;

            create_line_items(txn, LineItemOwner::Contract(model.id), &quote_info).await?;

            let result = snapshot::contract_view(txn, model).await?;

            Ok(Json(ContractCreateResponse {
                message: "Contract Created!",
                result,
            }))
        })
    })
    .await
    .into_raw_result()
}
