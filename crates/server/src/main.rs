mod archive;
mod auth;
mod fields;
mod handlers;
mod line_items;
mod pagination;
mod report;
mod snapshot;
mod validation;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use axum::{Extension, Router, Server};
use common::{config::Config, logging};
use db::{Database, DatabaseConnection};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::new()?;

    logging::init(&config);

    let Some(server_config) = config.server.as_ref() else {
        return Err(anyhow::Error::msg("unable to load server config"));
    };

    info!("connecting to database");
    let database = Arc::new(Database::connect(&config.database.url).await?);
    let server = Server::bind(&server_config.address);
    let config = Arc::new(config);

    server
        .serve(app_router(database, config).into_make_service())
        .await?;

    Ok(())
}

fn app_router(database: Arc<DatabaseConnection>, config: Arc<Config>) -> Router {
    Router::new()
        .nest("/api/v1/user", handlers::users::routes(database.clone()))
        .nest(
            "/api/v1/contract",
            handlers::contracts::routes(database.clone()),
        )
        .nest(
            "/api/v1/quotation",
            handlers::quotations::routes(database.clone()),
        )
        .nest(
            "/api/v1/chemical",
            handlers::chemicals::routes(database.clone()),
        )
        .layer(Extension(config))
        .with_state(database)
}
