use std::sync::Arc;

use axum::{extract::State, Json};
use axum_derive_error::ErrorResponse;
use db::{user, DatabaseConnection, DbErr, EntityTrait, QueryOrder, QuerySelect};
use derive_more::{Display, Error, From};
use futures_util::TryStreamExt;
use serde::Serialize;

/// Information about a single user.
#[derive(Serialize)]
pub(super) struct UserData {
    pub id: i64,
    pub username: String,
    pub initials: String,
    pub admin: bool,
}

/// Errors that may occur during the user list request.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum UserListError {
    /// Database-related error.
    DatabaseError(DbErr),
}

/// List all registered users.
pub(super) async fn list(
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<Vec<UserData>>, UserListError> {
    user::Entity::find()
        .select_only()
        .columns([
            user::Column::Id,
            user::Column::Username,
            user::Column::Initials,
            user::Column::Admin,
        ])
        .order_by_asc(user::Column::Id)
        .into_tuple::<(i64, String, String, bool)>()
        .stream(&*db)
        .await?
        .err_into()
        .and_then(|(id, username, initials, admin)| async move {
            Ok(UserData {
                id,
                username,
                initials,
                admin,
            })
        })
        .try_collect()
        .await
        .map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::testing::{create_database, create_user, ResponseBodyExt};

    use assert_json::assert_json;
    use axum::{body::Body, http::Request};
    use common::config::Config;
    use tower::ServiceExt;

    #[tokio::test]
    async fn successful() {
        let db = create_database().await;

        let (id, token) = create_user(&db, "meera", false).await;

        let response = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()))
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/user")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_json!(response.json().await, [
            {
                "id": id,
                "username": "meera",
                "initials": "ME",
                "admin": false,
            }
        ]);
    }
}
