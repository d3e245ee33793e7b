use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{DatabaseConnection, DbErr};
use derive_more::{Display, Error, From};
use serde::Serialize;

use crate::snapshot::{self, QuotationView};

/// Errors that may occur during the quotation details request.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum QuotationDetailsError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Provided quotation identifier does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "quotation not found")]
    QuotationNotFound,
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct QuotationDetailsResponse {
    message: &'static str,
    result: QuotationView,
}

/// Single populated quotation handler.
pub(super) async fn details(
    State(db): State<Arc<DatabaseConnection>>,
    Path(id): Path<i64>,
) -> Result<Json<QuotationDetailsResponse>, QuotationDetailsError> {
    let result = snapshot::load_quotation_view(&*db, id)
        .await?
        .ok_or(QuotationDetailsError::QuotationNotFound)?;

    Ok(Json(QuotationDetailsResponse {
        message: "",
        result,
    }))
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
    use tower::ServiceExt;

    #[tokio::test]
    async fn unknown() {
        let db = create_database().await;

        let (_, token) = create_user(&db, "meera", false).await;

        let response = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()))
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/quotation/123")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
