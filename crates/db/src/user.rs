//! Registered application user.
//!
//! Users authenticate with a username and an argon2-hashed password and
//! act as authors of contracts, quotations, work logs and archive entries.
//! The `initials` value is what reports print in their REP column.

use sea_orm::entity::prelude::*;

/// User model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Unique login name.
    pub username: String,

    /// Short initials printed on documents and reports.
    pub initials: String,

    /// Argon2 password hash. Never leaves the database layer.
    pub password_hash: String,

    /// Administrators may manage users.
    pub admin: bool,

    pub created_at: TimeDateTime,
}

/// User model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::token::Entity")]
    Tokens,

    #[sea_orm(has_many = "super::revision::Entity")]
    Revisions,
}

impl Related<super::token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tokens.def()
    }
}

impl Related<super::revision::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Revisions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
