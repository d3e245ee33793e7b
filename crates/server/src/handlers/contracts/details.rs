use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{DatabaseConnection, DbErr};
use derive_more::{Display, Error, From};
use serde::Serialize;

use crate::snapshot::{self, ContractView};

/// Errors that may occur during the contract details request.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum ContractDetailsError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Provided contract identifier does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "contract not found")]
    ContractNotFound,
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct ContractDetailsResponse {
    message: &'static str,
    result: ContractView,
}

/// Single populated contract handler.
pub(super) async fn details(
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
) -> Result<Json<ContractDetailsResponse>, ContractDetailsError> {
    let result = snapshot::load_contract_view(&*db, id)
        .await?
        .ok_or(ContractDetailsError::ContractNotFound)?;

    Ok(Json(ContractDetailsResponse {
        message: "",
        result,
    }))
}
