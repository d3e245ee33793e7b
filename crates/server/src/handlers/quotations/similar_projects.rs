use std::sync::Arc;

use axum::{extract::State, Json};
use axum_derive_error::ErrorResponse;
use db::{
    quotation, user, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::ValidatedJson;

use super::list::QuotationListItem;

/// Result set cap for project name lookups.
const MAX_MATCHES: u64 = 20;

/// Errors that may occur during the similar project lookup.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum SimilarProjectsError {
    /// Database-related error.
    DatabaseError(DbErr),
}

/// JSON request body.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(super) struct SimilarProjectsRequest {
    /// Project name fragment to search for.
    #[validate(length(min = 1))]
    project_name: String,
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct SimilarProjectsResponse {
    message: &'static str,
    result: Vec<QuotationListItem>,
}

/// List quotations whose project name contains the requested fragment.
///
/// Used by the quotation form to surface earlier work on the same site.
pub(super) async fn similar_projects(
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedJson(request): ValidatedJson<SimilarProjectsRequest>,
) -> Result<Json<SimilarProjectsResponse>, SimilarProjectsError> {
    let result = quotation::Entity::find()
        .filter(quotation::Column::ProjectName.contains(&request.project_name))
        .order_by_desc(quotation::Column::UpdatedAt)
        .limit(MAX_MATCHES)
        .find_also_related(user::Entity)
        .all(&*db)
        .await?
        .into_iter()
        .map(|(quotation, created_by)| {
            QuotationListItem::new(quotation, created_by.map(|user| user.username))
        })
        .collect();

    Ok(Json(SimilarProjectsResponse {
        message: "",
        result,
    }))
}
