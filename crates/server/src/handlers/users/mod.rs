mod delete;
mod initials;
mod list;
mod login;
mod logout;
mod register;

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use db::DatabaseConnection;

use crate::auth;

/// Create a [`Router`] with user management and authentication routes.
pub(crate) fn routes(database: Arc<DatabaseConnection>) -> Router<Arc<DatabaseConnection>> {
    let public_routes = Router::new()
        .route("/login", post(login::login))
        .route("/register", post(register::register));

    let protected_routes = Router::new()
        .route("/", get(list::list))
        .route("/initials", get(initials::initials))
        .route("/logout", post(logout::logout))
        .route_layer(from_fn_with_state(
            database.clone(),
            auth::require_authentication::<false, _>,
        ));

    let admin_routes = Router::new()
        .route("/:id", axum::routing::delete(delete::delete))
        .route_layer(from_fn_with_state(
            database,
            auth::require_authentication::<true, _>,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
}
