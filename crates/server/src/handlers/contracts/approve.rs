use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    contract, sequence, ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr, EntityTrait,
    TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::Serialize;

use crate::{
    archive::{record_revision, ArchiveTarget},
    auth::AuthenticatedUserId,
    snapshot::{self, ContractView},
};

/// Prefix of generated contract numbers.
const CONTRACT_NO_PREFIX: &str = "CT";

/// Errors that may occur during the contract approval process.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum ContractApproveError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Provided contract identifier does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "contract not found")]
    ContractNotFound,

    /// Approval is a one-way transition; repeated attempts are rejected.
    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "contract already approved")]
    AlreadyApproved,
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct ContractApproveResponse {
    message: &'static str,
    result: ContractView,
}

/// Contract approval handler.
///
/// Records the pre-approval baseline as an archive entry, marks the
/// contract approved and assigns its contract number from the contract
/// number sequence. The number is assigned exactly once; re-approval
/// attempts fail without touching the archive or the number.
pub(super) async fn approve(
    Extension(current_user): Extension<AuthenticatedUserId>,
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
) -> Result<Json<ContractApproveResponse>, ContractApproveError> {
    db.transaction(|txn| {
        Box::pin(async move {
            let contract = contract::Entity::find_by_id(id)
                .one(txn)
                .await?
                .ok_or(ContractApproveError::ContractNotFound)?;

            if contract.approved {
                return Err(ContractApproveError::AlreadyApproved);
            }

            let baseline = snapshot::contract_view(txn, contract.clone()).await?;

            record_revision(
                txn,
                ArchiveTarget::Contract(id),
                &baseline,
                current_user.id(),
                "Approved",
                Vec::new(),
            )
            .await?;

            let number = sequence::next_value(txn, sequence::CONTRACT_NO).await?;
            let version = contract.version;

            let mut active: contract::ActiveModel = contract.into();
            active.approved = ActiveValue::Set(true);
            active.contract_no = ActiveValue::Set(Some(sequence::format_number(
                CONTRACT_NO_PREFIX,
                number,
            )));
            active.version = ActiveValue::Set(version + 1);
            active.updated_at = ActiveValue::Set(db::now());
            active.update(txn).await?;

            let result = snapshot::load_contract_view(txn, id)
                .await?
                .ok_or(ContractApproveError::ContractNotFound)?;

            Ok(Json(ContractApproveResponse {
                message: "Contract Approved.",
                result,
            }))
        })
    })
    .await
    .into_raw_result()
}
