mod approve;
mod archive;
mod create;
mod delete;
mod delivery_challans;
mod details;
mod list;
mod print_count;
mod report;
mod update;
mod worklogs;

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use db::DatabaseConnection;

use crate::auth;

/// Create a [`Router`] with contract management routes.
pub(crate) fn routes(database: Arc<DatabaseConnection>) -> Router<Arc<DatabaseConnection>> {
    Router::new()
        .route("/", get(list::list))
        .route("/create", post(create::create))
        .route("/report", get(report::report))
        .route("/approve/:id", get(approve::approve))
        .route("/archive/:id", get(archive::archive))
        .route("/print/:id", post(print_count::print_count))
        .route(
            "/:id",
            get(details::details)
                .post(update::update)
                .delete(delete::delete),
        )
        .route("/:id/worklog", get(worklogs::list).post(worklogs::create))
        .route(
            "/:id/dc",
            get(delivery_challans::list).post(delivery_challans::create),
        )
        .route_layer(from_fn_with_state(
            database,
            auth::require_authentication::<false, _>,
        ))
}
