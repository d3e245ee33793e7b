//! JSON column types shared by contracts and quotations.

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// A single "keep contact informed" entry attached to a party.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kci {
    /// Contact person name.
    pub name: String,

    /// Phone number or other contact string.
    pub contact: String,

    #[serde(default)]
    pub email: Option<String>,
}

/// Billing or shipping party of a contract or quotation.
///
/// On the bill-to side `name` holds the client name, on the ship-to side
/// it holds the project name. The value is stored as a single JSON column;
/// the name is additionally denormalized into a plain filterable column
/// by the write paths.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Party {
    pub name: String,

    pub address: String,

    /// Contact list for this party.
    #[serde(default)]
    pub kci: Vec<Kci>,
}
