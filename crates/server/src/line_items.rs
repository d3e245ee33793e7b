//! Line item reconciliation shared by the contract and quotation write paths.
//!
//! Incoming line items either carry the identifier of an existing row,
//! updating it in place, or no identifier at all, creating a new row. Items
//! dropped from the incoming list are deleted while the owning document is
//! a draft; once the document is approved they are only detached, since
//! archived revisions still reference them.

use db::{
    quote_info::{self, BatchNos},
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QuerySelect,
};
use serde::Deserialize;
use validator::Validate;

/// Incoming line item payload.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuoteInfoInput {
    /// Identifier of an existing row to update in place. Absent for
    /// brand-new line items.
    #[serde(default)]
    pub id: Option<i64>,

    #[validate(length(min = 1))]
    pub chemical: String,

    pub work_area: String,

    #[serde(default)]
    pub work_area_unit: Option<String>,

    pub service_rate: i64,

    pub service_rate_unit: String,

    #[serde(default)]
    pub packaging: Option<String>,

    #[serde(default)]
    pub batch_nos: Vec<String>,
}

/// Document owning a line item list.
#[derive(Copy, Clone)]
pub(crate) enum LineItemOwner {
    Contract(i64),
    Quotation(i64),
}

impl LineItemOwner {
    fn column(self) -> quote_info::Column {
        match self {
            Self::Contract(_) => quote_info::Column::ContractId,
            Self::Quotation(_) => quote_info::Column::QuotationId,
        }
    }

    fn id(self) -> i64 {
        match self {
            Self::Contract(id) | Self::Quotation(id) => id,
        }
    }
}

/// Errors that may occur during line item reconciliation.
pub(crate) enum ReconcileError {
    Database(DbErr),

    /// An incoming item referenced a row that does not belong to the
    /// document being updated.
    UnknownLineItem,
}

impl From<DbErr> for ReconcileError {
    fn from(err: DbErr) -> Self {
        Self::Database(err)
    }
}

async fn insert_line_item<C: ConnectionTrait>(
    db: &C,
    owner: LineItemOwner,
    position: i32,
    item: &QuoteInfoInput,
) -> Result<i64, DbErr> {
    let (contract_id, quotation_id) = match owner {
        LineItemOwner::Contract(id) => (Some(id), None),
        LineItemOwner::Quotation(id) => (None, Some(id)),
    };

    let model = quote_info::Entity::insert(quote_info::ActiveModel {
        contract_id: ActiveValue::Set(contract_id),
        quotation_id: ActiveValue::Set(quotation_id),
        position: ActiveValue::Set(position),
        chemical: ActiveValue::Set(item.chemical.clone()),
        work_area: ActiveValue::Set(item.work_area.clone()),
        work_area_unit: ActiveValue::Set(item.work_area_unit.clone()),
        service_rate: ActiveValue::Set(item.service_rate),
        service_rate_unit: ActiveValue::Set(item.service_rate_unit.clone()),
        packaging: ActiveValue::Set(item.packaging.clone()),
        batch_nos: ActiveValue::Set(BatchNos(item.batch_nos.clone())),
        created_at: ActiveValue::Set(db::now()),
        ..Default::default()
    })
    .exec_with_returning(db)
    .await?;

    Ok(model.id)
}

/// Create line items for a freshly created document.
///
/// Incoming identifiers are ignored: a new document owns new rows.
pub(crate) async fn create_line_items<C: ConnectionTrait>(
    db: &C,
    owner: LineItemOwner,
    items: &[QuoteInfoInput],
) -> Result<(), DbErr> {
    for (position, item) in items.iter().enumerate() {
        insert_line_item(db, owner, position as i32, item).await?;
    }

    Ok(())
}

/// Reconcile the owner's stored line item list against the incoming one.
///
/// Existing items are updated in place, new items are inserted, and items
/// missing from the incoming list are deleted (draft owner) or detached
/// (approved owner). Positions are rewritten to the incoming order.
pub(crate) async fn reconcile_line_items<C: ConnectionTrait>(
    db: &C,
    owner: LineItemOwner,
    approved: bool,
    items: &[QuoteInfoInput],
) -> Result<(), ReconcileError> {
    let old_ids: Vec<i64> = quote_info::Entity::find()
        .select_only()
        .column(quote_info::Column::Id)
        .filter(owner.column().eq(owner.id()))
        .into_tuple()
        .all(db)
        .await?;

    let mut kept = Vec::with_capacity(items.len());

    for (position, item) in items.iter().enumerate() {
        let id = match item.id {
            Some(id) => {
                if !old_ids.contains(&id) {
                    return Err(ReconcileError::UnknownLineItem);
                }

                let model = quote_info::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .ok_or(ReconcileError::UnknownLineItem)?;

                let mut active: quote_info::ActiveModel = model.into();
                active.position = ActiveValue::Set(position as i32);
                active.chemical = ActiveValue::Set(item.chemical.clone());
                active.work_area = ActiveValue::Set(item.work_area.clone());
                active.work_area_unit = ActiveValue::Set(item.work_area_unit.clone());
                active.service_rate = ActiveValue::Set(item.service_rate);
                active.service_rate_unit = ActiveValue::Set(item.service_rate_unit.clone());
                active.packaging = ActiveValue::Set(item.packaging.clone());
                active.batch_nos = ActiveValue::Set(BatchNos(item.batch_nos.clone()));
                active.update(db).await?;

                id
            }
            None => insert_line_item(db, owner, position as i32, item).await?,
        };

        kept.push(id);
    }

    let removed: Vec<i64> = old_ids
        .into_iter()
        .filter(|id| !kept.contains(id))
        .collect();

    if removed.is_empty() {
        return Ok(());
    }

    if approved {
        // Archived snapshots still reference these rows, so only the live
        // list membership is cleared.
        for id in removed {
            let Some(model) = quote_info::Entity::find_by_id(id).one(db).await? else {
                continue;
            };

            let mut active: quote_info::ActiveModel = model.into();
            match owner {
                LineItemOwner::Contract(_) => active.contract_id = ActiveValue::Set(None),
                LineItemOwner::Quotation(_) => active.quotation_id = ActiveValue::Set(None),
            }
            active.update(db).await?;
        }
    } else {
        quote_info::Entity::delete_many()
            .filter(quote_info::Column::Id.is_in(removed))
            .exec(db)
            .await?;
    }

    Ok(())
}
