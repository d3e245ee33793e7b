mod batch_numbers;
mod create;
mod delete;
mod list;

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use db::{chemical, DatabaseConnection};
use serde::Serialize;

use crate::auth;

/// A single chemical with its known batch numbers.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChemicalData {
    pub id: i64,
    pub chemical: String,
    pub batch_nos: Vec<String>,
}

impl From<chemical::Model> for ChemicalData {
    fn from(model: chemical::Model) -> Self {
        Self {
            id: model.id,
            chemical: model.chemical,
            batch_nos: model.batch_nos.0,
        }
    }
}

/// Create a [`Router`] with chemical batch number registry routes.
pub(crate) fn routes(database: Arc<DatabaseConnection>) -> Router<Arc<DatabaseConnection>> {
    Router::new()
        .route("/", get(list::list).post(create::create))
        .route("/:id", axum::routing::delete(delete::delete))
        .route(
            "/:id/batch",
            post(batch_numbers::add).delete(batch_numbers::remove),
        )
        .route_layer(from_fn_with_state(
            database,
            auth::require_authentication::<false, _>,
        ))
}
