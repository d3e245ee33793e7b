use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use axum_derive_error::ErrorResponse;
use db::{user, DatabaseConnection, DbErr, EntityTrait};
use derive_more::{Display, Error, From};

/// Errors that may occur during the user deletion process.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum UserDeletionError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Provided user identifier does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "user not found")]
    UserNotFound,
}

/// User deletion handler, restricted to administrators.
pub(super) async fn delete(
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
) -> Result<(), UserDeletionError> {
    let result = user::Entity::delete_by_id(id).exec(&*db).await?;

    if result.rows_affected == 0 {
        return Err(UserDeletionError::UserNotFound);
    }

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
    use tower::{Service, ServiceExt};

    #[tokio::test]
    async fn requires_admin() {
        let db = create_database().await;

        let (id, token) = create_user(&db, "meera", false).await;

        let response = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()))
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/user/{id}"))
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn successful() {
        let db = create_database().await;

        let (_, admin_token) = create_user(&db, "admin", true).await;
        let (id, _) = create_user(&db, "meera", false).await;

        let mut service = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()));

        let response = service
            .call(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/user/{id}"))
                    .header("Authorization", format!("Bearer {admin_token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let repeated = service
            .call(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/user/{id}"))
                    .header("Authorization", format!("Bearer {admin_token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(repeated.status(), StatusCode::NOT_FOUND);
    }
}
