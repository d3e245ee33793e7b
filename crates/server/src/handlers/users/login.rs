use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use axum_derive_error::ErrorResponse;
use db::{
    token, user, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};

use crate::auth;

/// Errors that may occur during the login process.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum UserLoginError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Unknown username or mismatched password.
    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "invalid credentials")]
    InvalidCredentials,
}

/// JSON request body.
#[derive(Deserialize)]
pub(super) struct UserLoginRequest {
    username: String,
    password: String,
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct UserLoginResponse {
    /// Authentication token.
    token: String,
}

/// Username and password login handler.
pub(super) async fn login(
    State(db): State<Arc<DatabaseConnection>>,
    Json(request): Json<UserLoginRequest>,
) -> Result<Json<UserLoginResponse>, UserLoginError> {
    db.transaction(|txn| {
        Box::pin(async move {
            let user = user::Entity::find()
                .filter(user::Column::Username.eq(&*request.username))
                .one(txn)
                .await?
                .ok_or(UserLoginError::InvalidCredentials)?;

            if !auth::verify_password(&request.password, &user.password_hash) {
                return Err(UserLoginError::InvalidCredentials);
            }

            let (model, token) = token::generate_token(user.id);

            token::Entity::insert(model)
                .exec_without_returning(txn)
                .await?;

            Ok(Json(UserLoginResponse { token }))
        })
    })
    .await
    .into_raw_result()
}
