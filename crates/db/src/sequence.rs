//! Monotonic sequences backing human-readable document numbering.
//!
//! Each named sequence produces values that are monotonic and never reused.
//! Approval assigns a document number from the sequence of its kind exactly
//! once; there is no renumbering.

use sea_orm::{entity::prelude::*, ActiveValue, ConnectionTrait};

/// Sequence name used for contract numbers.
pub const CONTRACT_NO: &str = "contract_no";

/// Sequence name used for quotation numbers.
pub const QUOTATION_NO: &str = "quotation_no";

/// Sequence model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sequences")]
pub struct Model {
    /// Sequence name.
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,

    /// Last value handed out.
    pub value: i64,
}

/// Sequence model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Advance the named sequence and return its new value.
///
/// The first call for a name yields 1. Callers are expected to run inside
/// the same transaction that persists the assigned number.
pub async fn next_value<C: ConnectionTrait>(db: &C, name: &str) -> Result<i64, DbErr> {
    match Entity::find_by_id(name.to_owned()).one(db).await? {
        Some(model) => {
            let value = model.value + 1;

            let mut active: ActiveModel = model.into();
            active.value = ActiveValue::Set(value);
            active.update(db).await?;

            Ok(value)
        }
        None => {
            Entity::insert(ActiveModel {
                name: ActiveValue::Set(name.to_owned()),
                value: ActiveValue::Set(1),
            })
            .exec_without_returning(db)
            .await?;

            Ok(1)
        }
    }
}

/// Format a sequence value as a human-readable document number.
///
/// ## Example
///
/// ```
/// use db::sequence::format_number;
///
/// assert_eq!(format_number("CT", 7), "CT-0007");
/// ```
pub fn format_number(prefix: &str, value: i64) -> String {
    format!("{prefix}-{value:04}")
}
