use std::sync::Arc;

use axum::{extract::State, Json};
use axum_derive_error::ErrorResponse;
use db::{chemical, DatabaseConnection, DbErr, EntityTrait, QueryOrder};
use derive_more::{Display, Error, From};
use serde::Serialize;

use super::ChemicalData;

/// Errors that may occur during the chemical list request.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum ChemicalListError {
    /// Database-related error.
    DatabaseError(DbErr),
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct ChemicalListResponse {
    message: &'static str,
    result: Vec<ChemicalData>,
}

/// List every registered chemical with its batch numbers.
pub(super) async fn list(
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<ChemicalListResponse>, ChemicalListError> {
    let result = chemical::Entity::find()
        .order_by_asc(chemical::Column::Chemical)
        .all(&*db)
        .await?
        .into_iter()
        .map(ChemicalData::from)
        .collect();

    Ok(Json(ChemicalListResponse {
        message: "Chemicals Retrieved",
        result,
    }))
}
