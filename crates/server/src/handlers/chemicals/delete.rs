use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{chemical, DatabaseConnection, DbErr, EntityTrait};
use derive_more::{Display, Error, From};
use serde::Serialize;

/// Errors that may occur during the chemical deletion process.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum ChemicalDeletionError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Provided chemical identifier does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "chemical not found")]
    ChemicalNotFound,
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct ChemicalDeletionResponse {
    message: &'static str,
}

/// Chemical deletion handler.
pub(super) async fn delete(
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
) -> Result<Json<ChemicalDeletionResponse>, ChemicalDeletionError> {
    let result = chemical::Entity::delete_by_id(id).exec(&*db).await?;

    if result.rows_affected == 0 {
        return Err(ChemicalDeletionError::ChemicalNotFound);
    }

    Ok(Json(ChemicalDeletionResponse {
        message: "Chemical deleted",
    }))
}
