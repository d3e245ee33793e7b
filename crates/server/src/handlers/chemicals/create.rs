use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use axum_derive_error::ErrorResponse;
use db::{
    chemical, quote_info::BatchNos, ActiveValue, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QuerySelect, SelectExt, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::ValidatedJson;

use super::ChemicalData;

/// Errors that may occur during the chemical registration process.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum ChemicalCreateError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Chemical with the provided name is already registered.
    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "chemical is already registered")]
    ChemicalExists,
}

/// JSON request body.
#[derive(Deserialize, Validate)]
pub(super) struct ChemicalCreateRequest {
    /// Chemical name, unique across the registry.
    #[validate(length(min = 1))]
    chemical: String,
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct ChemicalCreateResponse {
    message: &'static str,
    result: ChemicalData,
}

/// Chemical registration handler.
pub(super) async fn create(
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedJson(request): ValidatedJson<ChemicalCreateRequest>,
) -> Result<Json<ChemicalCreateResponse>, ChemicalCreateError> {
    db.transaction(|txn| {
        Box::pin(async move {
            let exists = chemical::Entity::find()
                .select_only()
                .filter(chemical::Column::Chemical.eq(&*request.chemical))
                .exists(txn)
                .await?;

            if exists {
                return Err(ChemicalCreateError::ChemicalExists);
            }

            let model = chemical::Entity::insert(chemical::ActiveModel {
                chemical: ActiveValue::Set(request.chemical),
                batch_nos: ActiveValue::Set(BatchNos::default()),
                created_at: ActiveValue::Set(db::now()),
                ..Default::default()
            })
            .exec_with_returning(txn)
            .await?;

            Ok(Json(ChemicalCreateResponse {
                message: "Chemical added successfully",
                result: model.into(),
            }))
        })
    })
    .await
    .into_raw_result()
}
