mod approve;
mod archive;
mod contractify;
mod create;
mod details;
mod list;
mod similar_projects;
mod update;

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use db::DatabaseConnection;

use crate::auth;

/// Create a [`Router`] with quotation management routes.
pub(crate) fn routes(database: Arc<DatabaseConnection>) -> Router<Arc<DatabaseConnection>> {
    Router::new()
        .route("/", get(list::list))
        .route("/create", post(create::create))
        .route("/similarProjects", post(similar_projects::similar_projects))
        .route("/approve/:id", get(approve::approve))
        .route("/archive/:id", get(archive::archive))
        .route("/contractify/:id", get(contractify::contractify))
        .route("/:id", get(details::details).post(update::update))
        .route_layer(from_fn_with_state(
            database,
            auth::require_authentication::<false, _>,
        ))
}
