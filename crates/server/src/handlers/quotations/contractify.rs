use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    contract, quotation, quote_info, ActiveModelTrait, ActiveValue, ColumnTrait,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, TransactionErrorExt,
    TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::Serialize;

use crate::{
    auth::AuthenticatedUserId,
    snapshot::{self, ContractView},
};

/// Errors that may occur during the contractify process.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum ContractifyError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Provided quotation identifier does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "quotation not found")]
    QuotationNotFound,

    /// A contract was already derived from this quotation.
    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "quotation was already contractified, please refresh")]
    AlreadyContractified,

    /// Only approved quotations may become contracts.
    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "document not approved yet")]
    NotApproved,
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct ContractifyResponse {
    message: &'static str,
    result: ContractView,
}

/// Contractify handler.
///
/// Derives a new draft contract from an approved quotation: the field set
/// is copied over, and the quotation's line items are deep-copied into
/// fresh rows owned by the new contract. The quotation is marked
/// contractified; a second attempt is rejected.
pub(super) async fn contractify(
    Extension(current_user): Extension<AuthenticatedUserId>,
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
) -> Result<Json<ContractifyResponse>, ContractifyError> {
    db.transaction(|txn| {
        Box::pin(async move {
            let quotation = quotation::Entity::find_by_id(id)
                .one(txn)
                .await?
                .ok_or(ContractifyError::QuotationNotFound)?;

            if quotation.contractified {
                return Err(ContractifyError::AlreadyContractified);
            }

            if !quotation.approved {
                return Err(ContractifyError::NotApproved);
            }

            let items = quote_info::Entity::find()
                .filter(quote_info::Column::QuotationId.eq(id))
                .order_by_asc(quote_info::Column::Position)
                .all(txn)
                .await?;

            let model = contract::Entity::insert(contract::ActiveModel {
                quotation_id: ActiveValue::Set(Some(quotation.id)),
                contract_date: ActiveValue::Set(db::now()),
                doc_type: ActiveValue::Set(quotation.doc_type),
                bill_to: ActiveValue::Set(quotation.bill_to.clone()),
                ship_to: ActiveValue::Set(quotation.ship_to.clone()),
                client_name: ActiveValue::Set(quotation.client_name.clone()),
                project_name: ActiveValue::Set(quotation.project_name.clone()),
                email_to: ActiveValue::Set(quotation.email_to.clone()),
                note: ActiveValue::Set(quotation.note.clone()),
                work_order_no: ActiveValue::Set(quotation.work_order_no.clone()),
                work_order_date: ActiveValue::Set(quotation.work_order_date),
                gst_no: ActiveValue::Set(quotation.gst_no.clone()),
                payment_terms: ActiveValue::Set(quotation.payment_terms.clone()),
                approved: ActiveValue::Set(false),
                print_count: ActiveValue::Set(0),
                version: ActiveValue::Set(0),
                sales_person_id: ActiveValue::Set(quotation.sales_person_id),
                created_by: ActiveValue::Set(Some(current_user.id())),
                created_at: ActiveValue::Set(db::now()),
                updated_at: ActiveValue::Set(db::now()),
                ..Default::default()
            })
            .exec_with_returning(txn)
            .await?;

            for (position, item) in items.into_iter().enumerate() {
                quote_info::Entity::insert(quote_info::ActiveModel {
                    contract_id: ActiveValue::Set(Some(model.id)),
                    position: ActiveValue::Set(position as i32),
                    chemical: ActiveValue::Set(item.chemical),
                    work_area: ActiveValue::Set(item.work_area),
                    work_area_unit: ActiveValue::Set(item.work_area_unit),
                    service_rate: ActiveValue::Set(item.service_rate),
                    service_rate_unit: ActiveValue::Set(item.service_rate_unit),
                    packaging: ActiveValue::Set(item.packaging),
                    batch_nos: ActiveValue::Set(item.batch_nos),
                    created_at: ActiveValue::Set(db::now()),
                    ..Default::default()
                })
                .exec_without_returning(txn)
                .await?;
            }

            let mut active: quotation::ActiveModel = quotation.into();
            active.contractified = ActiveValue::Set(true);
            active.updated_at = ActiveValue::Set(db::now());
            active.update(txn).await?;

            let result = snapshot::contract_view(txn, model).await?;

            Ok(Json(ContractifyResponse {
                message: "Contract Created!",
                result,
            }))
        })
    })
    .await
    .into_raw_result()
}
