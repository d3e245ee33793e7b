use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{revision, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use derive_more::{Display, Error, From};
use serde::Serialize;

use crate::snapshot::{self, ContractView, UserRef};

/// Errors that may occur during the archive retrieval process.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum ContractArchiveError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Provided contract identifier does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "contract not found")]
    ContractNotFound,
}

/// A single archived revision.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RevisionData {
    pub id: i64,
    pub message: String,
    pub modified_fields: Vec<String>,
    pub snapshot: serde_json::Value,
    pub author: Option<UserRef>,
    pub timestamp: i64,
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct ContractArchiveResponse {
    message: &'static str,
    result: ContractView,
    revisions: Vec<RevisionData>,
}

/// Archived revision history handler.
///
/// Returns the current populated state of the contract together with its
/// ordered revision log, oldest first.
pub(super) async fn archive(
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
) -> Result<Json<ContractArchiveResponse>, ContractArchiveError> {
    let result = snapshot::load_contract_view(&*db, id)
        .await?
        .ok_or(ContractArchiveError::ContractNotFound)?;

    let mut revisions = Vec::new();

    for revision in revision::Entity::find()
        .filter(revision::Column::ContractId.eq(id))
        .order_by_asc(revision::Column::Id)
        .all(&*db)
        .await?
    {
        let author = snapshot::user_ref(&*db, revision.author_id).await?;

        revisions.push(RevisionData {
            id: revision.id,
            message: revision.message,
            modified_fields: revision.modified_fields.0,
            snapshot: revision.snapshot,
            author,
            timestamp: snapshot::to_timestamp(revision.created_at),
        });
    }

    Ok(Json(ContractArchiveResponse {
        message: "Archive Retrieved",
        result,
        revisions,
    }))
}
