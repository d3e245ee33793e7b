use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use axum_derive_error::ErrorResponse;
use db::{
    token, user, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, SelectExt, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{auth, validation::ValidatedJson};

/// Regular expression to match valid login names.
static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[a-zA-Z0-9_]{3,32}$"#).expect("invalid regex string"));

/// Errors that may occur during the user registration process.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum UserRegistrationError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Provided login name is already in use.
    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "username is already taken")]
    UsernameTaken,

    /// Password could not be hashed for storage.
    #[display(fmt = "unable to hash the provided password")]
    PasswordHashError,
}

/// JSON request body.
#[derive(Deserialize, Validate)]
pub(super) struct UserRegistrationRequest {
    /// Login name.
    #[validate(regex = "USERNAME_REGEX")]
    username: String,

    /// Initials printed on documents and reports.
    #[validate(length(min = 1, max = 4))]
    initials: String,

    /// Plaintext password, hashed before storage.
    #[validate(length(min = 8))]
    password: String,
}

/// Registered user's authentication token response.
#[derive(Serialize)]
pub(super) struct UserRegistrationResponse {
    /// Authentication token.
    token: String,
}

/// User registration handler.
///
/// Returns an authentication token for the newly registered user so that
/// a separate login request is not required.
pub(super) async fn register(
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedJson(request): ValidatedJson<UserRegistrationRequest>,
) -> Result<Json<UserRegistrationResponse>, UserRegistrationError> {
    let password_hash = auth::hash_password(&request.password)
        .map_err(|_| UserRegistrationError::PasswordHashError)?;

    db.transaction(|txn| {
        Box::pin(async move {
            let username_taken = user::Entity::find()
                .select_only()
                .filter(user::Column::Username.eq(&*request.username))
                .exists(txn)
                .await?;

            if username_taken {
                return Err(UserRegistrationError::UsernameTaken);
            }

            let user = user::Entity::insert(user::ActiveModel {
                username: ActiveValue::Set(request.username),
                initials: ActiveValue::Set(request.initials.to_uppercase()),
                password_hash: ActiveValue::Set(password_hash),
                admin: ActiveValue::Set(false),
                created_at: ActiveValue::Set(db::now()),
                ..Default::default()
            })
            .exec_with_returning(txn)
            .await?;

            let (model, token) = token::generate_token(user.id);

            token::Entity::insert(model)
                .exec_without_returning(txn)
                .await?;

            Ok(Json(UserRegistrationResponse { token }))
        })
    })
    .await
    .into_raw_result()
}
