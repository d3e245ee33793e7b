//! Chemical batch number registry.
//!
//! Maps a chemical name to the set of known batch numbers. Batch numbers
//! are mutated through idempotent add/remove set operations, see
//! [`crate::quote_info::BatchNos`].

use sea_orm::entity::prelude::*;

use crate::quote_info::BatchNos;

/// Chemical model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "chemicals")]
pub struct Model {
    /// Unique chemical identifier.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Chemical name, unique.
    pub chemical: String,

    /// Known batch numbers for this chemical.
    #[sea_orm(column_type = "Json")]
    pub batch_nos: BatchNos,

    pub created_at: TimeDateTime,
}

/// Chemical model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
