//! Archive recorder.
//!
//! Records one immutable revision per archived mutation. A revision holds
//! the fully populated state of the document as it existed immediately
//! before the mutation, and is inserted inside the same transaction that
//! performs the mutation: if the archive insert fails, the whole request
//! fails. Approved-document history is a compliance record and is never
//! silently skipped.

use db::{
    revision::{self, ModifiedFields},
    ActiveValue, ConnectionTrait, DbErr, EntityTrait,
};
use serde::Serialize;

/// Document the revision is recorded against.
#[derive(Copy, Clone)]
pub(crate) enum ArchiveTarget {
    Contract(i64),
    Quotation(i64),
}

/// Append a revision carrying the prior state of the target document.
pub(crate) async fn record_revision<C, S>(
    db: &C,
    target: ArchiveTarget,
    prior_state: &S,
    author_id: i64,
    message: &str,
    modified_fields: Vec<String>,
) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    S: Serialize,
{
    let (contract_id, quotation_id) = match target {
        ArchiveTarget::Contract(id) => (Some(id), None),
        ArchiveTarget::Quotation(id) => (None, Some(id)),
    };

    let snapshot =
        serde_json::to_value(prior_state).map_err(|err| DbErr::Custom(err.to_string()))?;

    revision::Entity::insert(revision::ActiveModel {
        contract_id: ActiveValue::Set(contract_id),
        quotation_id: ActiveValue::Set(quotation_id),
        author_id: ActiveValue::Set(Some(author_id)),
        message: ActiveValue::Set(message.to_owned()),
        modified_fields: ActiveValue::Set(ModifiedFields(modified_fields)),
        snapshot: ActiveValue::Set(snapshot),
        created_at: ActiveValue::Set(db::now()),
        ..Default::default()
    })
    .exec_without_returning(db)
    .await?;

    Ok(())
}
