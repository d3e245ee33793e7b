use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    contract, delivery_challan, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, SelectExt, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    auth::AuthenticatedUserId,
    snapshot::{self, UserRef},
    validation::ValidatedJson,
};

/// Errors that may occur while working with delivery challans.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum DeliveryChallanError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Provided contract identifier does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "contract not found")]
    ContractNotFound,
}

/// A single resolved delivery challan.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DeliveryChallanData {
    pub id: i64,
    pub chemical: String,
    pub batch_number: String,
    pub chemical_qty: String,
    pub packaging: Option<String>,
    pub entry_by: Option<UserRef>,
    pub timestamp: i64,
}

async fn delivery_challan_data<C: db::ConnectionTrait>(
    db: &C,
    model: delivery_challan::Model,
) -> Result<DeliveryChallanData, DbErr> {
    let entry_by = snapshot::user_ref(db, model.entry_by).await?;

    Ok(DeliveryChallanData {
        id: model.id,
        chemical: model.chemical,
        batch_number: model.batch_number,
        chemical_qty: model.chemical_qty,
        packaging: model.packaging,
        entry_by,
        timestamp: snapshot::to_timestamp(model.created_at),
    })
}

/// JSON request body.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(super) struct DeliveryChallanCreateRequest {
    #[validate(length(min = 1))]
    chemical: String,

    batch_no: String,

    chemical_qty: String,

    #[serde(default)]
    packaging: Option<String>,
}

/// JSON response body of the creation handler.
#[derive(Serialize)]
pub(super) struct DeliveryChallanCreateResponse {
    message: &'static str,
    result: DeliveryChallanData,
}

/// Delivery challan creation handler. Appends a new dispatch record
/// against the contract.
pub(super) async fn create(
    Extension(current_user): Extension<AuthenticatedUserId>,
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<DeliveryChallanCreateRequest>,
) -> Result<Json<DeliveryChallanCreateResponse>, DeliveryChallanError> {
    db.transaction(|txn| {
        Box::pin(async move {
            let contract_exists = contract::Entity::find_by_id(id)
                .select_only()
                .exists(txn)
                .await?;

            if !contract_exists {
                return Err(DeliveryChallanError::ContractNotFound);
            }

            let model = delivery_challan::Entity::insert(delivery_challan::ActiveModel {
                contract_id: ActiveValue::Set(id),
                chemical: ActiveValue::Set(request.chemical),
                batch_number: ActiveValue::Set(request.batch_no),
                chemical_qty: ActiveValue::Set(request.chemical_qty),
                packaging: ActiveValue::Set(request.packaging),
                entry_by: ActiveValue::Set(Some(current_user.id())),
                created_at: ActiveValue::Set(db::now()),
                ..Default::default()
            })
            .exec_with_returning(txn)
            .await?;

            let result = delivery_challan_data(txn, model).await?;

            Ok(Json(DeliveryChallanCreateResponse {
                message: "DC Created",
                result,
            }))
        })
    })
    .await
    .into_raw_result()
}

/// JSON response body of the list handler.
#[derive(Serialize)]
pub(super) struct DeliveryChallanListResponse {
    message: &'static str,
    result: Vec<DeliveryChallanData>,
}

/// List the delivery challans recorded against a contract, oldest first.
pub(super) async fn list(
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
) -> Result<Json<DeliveryChallanListResponse>, DeliveryChallanError> {
    let contract_exists = contract::Entity::find_by_id(id)
        .select_only()
        .exists(&*db)
        .await?;

    if !contract_exists {
        return Err(DeliveryChallanError::ContractNotFound);
    }

    let mut result = Vec::new();

    for model in delivery_challan::Entity::find()
        .filter(delivery_challan::Column::ContractId.eq(id))
        .order_by_asc(delivery_challan::Column::Id)
        .all(&*db)
        .await?
    {
        result.push(delivery_challan_data(&*db, model).await?);
    }

    Ok(Json(DeliveryChallanListResponse {
        message: "",
        result,
    }))
}
