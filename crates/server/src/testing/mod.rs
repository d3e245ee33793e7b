use std::error::Error;

use axum::async_trait;
use db::{token, user, ActiveValue, Database, DatabaseConnection, EntityTrait};
use hyper::body::{self, Bytes, HttpBody};
use migration::MigratorTrait;
use serde::Serialize;

pub(crate) async fn create_database() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("unable to create test database");

    migration::Migrator::up(&db, None)
        .await
        .expect("unable to run migrations");

    db
}

/// Insert a user together with a fresh authentication token.
///
/// Returns the user identifier and the bearer token string.
pub(crate) async fn create_user(
    db: &DatabaseConnection,
    username: &str,
    admin: bool,
) -> (i64, String) {
    let user = user::Entity::insert(user::ActiveModel {
        username: ActiveValue::Set(username.to_owned()),
        initials: ActiveValue::Set(username.chars().take(2).collect::<String>().to_uppercase()),
        password_hash: ActiveValue::Set(String::new()),
        admin: ActiveValue::Set(admin),
        created_at: ActiveValue::Set(db::now()),
        ..Default::default()
    })
    .exec_with_returning(db)
    .await
    .expect("unable to create user");

    let (model, token) = token::generate_token(user.id);

    token::Entity::insert(model)
        .exec_without_returning(db)
        .await
        .expect("unable to insert token");

    (user.id, token)
}

/// Mutable document field payload shared by contract and quotation tests.
pub(crate) fn contract_payload(quote_info: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "docType": "standard",
        "billTo": { "name": "Acme Estates", "address": "12 High Street", "kci": [] },
        "shipTo": { "name": "Acme Tower", "address": "Plot 4", "kci": [] },
        "quoteInfo": quote_info,
    })
}

/// Brand-new line item payload.
pub(crate) fn quote_item(chemical: &str) -> serde_json::Value {
    serde_json::json!({
        "chemical": chemical,
        "workArea": "Basement",
        "serviceRate": 2750,
        "serviceRateUnit": "per sqft",
    })
}

/// Line item payload updating an existing row in place.
pub(crate) fn quote_item_with_id(id: i64, chemical: &str) -> serde_json::Value {
    let mut item = quote_item(chemical);
    item["id"] = serde_json::json!(id);
    item
}

pub(crate) trait RequestBodyExt: Sized {
    fn from_json<B: Serialize>(val: B) -> Self;
}

impl<T> RequestBodyExt for T
where
    T: HttpBody + From<Vec<u8>>,
{
    fn from_json<B: Serialize>(val: B) -> Self {
        T::from(serde_json::to_vec(&val).expect("unable to serialize"))
    }
}

#[async_trait(?Send)]
pub(crate) trait ResponseBodyExt {
    async fn bytes(self) -> Bytes;

    async fn text(self) -> String;

    async fn json(self) -> serde_json::Value;
}

#[async_trait(?Send)]
impl<T> ResponseBodyExt for T
where
    T: HttpBody,
    T::Error: Error,
{
    async fn bytes(self) -> Bytes {
        body::to_bytes(self)
            .await
            .expect("unable to convert to bytes")
    }

    async fn text(self) -> String {
        String::from_utf8(self.bytes().await.to_vec()).expect("unable to convert to text")
    }

    async fn json(self) -> serde_json::Value {
        serde_json::from_slice(&self.bytes().await).expect("unable to convert to json")
    }
}
