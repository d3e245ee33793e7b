use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    contract, ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr, EntityTrait,
    TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::Serialize;

use crate::snapshot::{self, ContractView};

/// Errors that may occur during the print counter increment.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum ContractPrintError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Provided contract identifier does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "contract not found")]
    ContractNotFound,
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct ContractPrintResponse {
    message: &'static str,
    result: ContractView,
}

/// Print counter handler. Increments the counter by exactly one per call,
/// independent of the approval state.
pub(super) async fn print_count(
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
) -> Result<Json<ContractPrintResponse>, ContractPrintError> {
    db.transaction(|txn| {
        Box::pin(async move {
            let contract = contract::Entity::find_by_id(id)
                .one(txn)
                .await?
                .ok_or(ContractPrintError::ContractNotFound)?;

            let print_count = contract.print_count;

            let mut active: contract::ActiveModel = contract.into();
            active.print_count = ActiveValue::Set(print_count + 1);
            active.update(txn).await?;

            let result = snapshot::load_contract_view(txn, id)
                .await?
                .ok_or(ContractPrintError::ContractNotFound)?;

            Ok(Json(ContractPrintResponse {
                message: "Printed.",
                result,
            }))
        })
    })
    .await
    .into_raw_result()
}
