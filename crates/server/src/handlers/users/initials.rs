use std::sync::Arc;

use axum::{extract::State, Json};
use axum_derive_error::ErrorResponse;
use db::{user, DatabaseConnection, DbErr, EntityTrait, QueryOrder, QuerySelect};
use derive_more::{Display, Error, From};
use serde::Serialize;

/// Initials of a single user, used to prefill document forms.
#[derive(Serialize)]
pub(super) struct UserInitials {
    pub id: i64,
    pub initials: String,
}

/// Errors that may occur during the initials list request.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum UserInitialsError {
    /// Database-related error.
    DatabaseError(DbErr),
}

/// List the initials of every registered user.
pub(super) async fn initials(
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<Vec<UserInitials>>, UserInitialsError> {
    let initials = user::Entity::find()
        .select_only()
        .columns([user::Column::Id, user::Column::Initials])
        .order_by_asc(user::Column::Id)
        .into_tuple::<(i64, String)>()
        .all(&*db)
        .await?
        .into_iter()
        .map(|(id, initials)| UserInitials { id, initials })
        .collect();

    Ok(Json(initials))
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
                    .uri("/api/v1/user/initials")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_json!(response.json().await, [
            {
                "id": id,
                "initials": "ME",
            }
        ]);
    }
}
