use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString},
    Argon2, PasswordVerifier,
};
use axum::{
    extract::State,
    headers::{authorization::Bearer, Authorization},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
    TypedHeader,
};
use axum_derive_error::ErrorResponse;
use db::{
    token, user, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect,
    TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AuthenticatedUserId(i64);

impl AuthenticatedUserId {
    /// Get raw user identifier value.
    pub fn id(&self) -> i64 {
        self.0
    }
}

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum AuthenticationError {
    DatabaseError(DbErr),

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "invalid authentication token was provided")]
    InvalidAuthenticationToken,

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "administrator access is required")]
    MissingAdminRights,
}

pub(super) async fn require_authentication<const REQUIRE_ADMIN: bool, B>(
    State(db): State<Arc<DatabaseConnection>>,
    TypedHeader(authorization): TypedHeader<Authorization<Bearer>>,
    mut req: Request<B>,
    next: Next<B>,
) -> Result<Response, AuthenticationError> {
    let user_id = db
        .transaction::<_, _, AuthenticationError>(|txn| {
            Box::pin(async move {
                let bearer = authorization.token();

                let user_id: i64 = token::Entity::find()
                    .select_only()
                    .column(token::Column::UserId)
                    .filter(token::Column::Token.eq(bearer))
                    .into_tuple()
                    .one(txn)
                    .await?
                    .ok_or(AuthenticationError::InvalidAuthenticationToken)?;

                if REQUIRE_ADMIN {
                    let admin: Option<bool> = user::Entity::find_by_id(user_id)
                        .select_only()
                        .column(user::Column::Admin)
                        .into_tuple()
                        .one(txn)
                        .await?;

                    if !admin.unwrap_or(false) {
                        return Err(AuthenticationError::MissingAdminRights);
                    }
                }

                Ok(user_id)
            })
        })
        .await
        .into_raw_result()?;

    req.extensions_mut().insert(AuthenticatedUserId(user_id));

    Ok(next.run(req).await)
}

/// Hash a password for storage with a freshly generated salt.
pub(super) fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Check a plaintext password against a stored argon2 hash.
pub(super) fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};

    #[test]
    fn password_round_trip() {
        let hash = hash_password("hunter2").unwrap();

        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn malformed_hash_is_rejected() {
        assert!(!verify_password("hunter2", "not-a-hash"));
    }
}
