use std::sync::Arc;

use axum::{
    extract::State,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use axum_derive_error::ErrorResponse;
use db::{token, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use derive_more::{Display, Error, From};

/// Errors that may occur during the logout process.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum UserLogoutError {
    /// Database-related error.
    DatabaseError(DbErr),
}

/// Logout handler.
///
/// Deletes the presented authentication token, invalidating the session
/// it belongs to. Other sessions of the same user stay valid.
pub(super) async fn logout(
    State(db): State<Arc<DatabaseConnection>>,
    TypedHeader(authorization): TypedHeader<Authorization<Bearer>>,
) -> Result<(), UserLogoutError> {
    token::Entity::delete_many()
        .filter(token::Column::Token.eq(authorization.token()))
        .exec(&*db)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::testing::{create_database, create_user};

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use common::config::Config;
    use tower::Service;

    #[tokio::test]
    async fn token_is_invalidated() {
        let db = create_database().await;

        let (_, token) = create_user(&db, "meera", false).await;

        let mut service = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()));

        let logout = service
            .call(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/user/logout")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(logout.status(), StatusCode::OK);

        let listing = service
            .call(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/user")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(listing.status(), StatusCode::FORBIDDEN);
    }
}
