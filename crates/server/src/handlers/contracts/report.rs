use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use common::config::Config;
use db::{contract, DatabaseConnection, DbErr, EntityTrait, QueryOrder};
use derive_more::{Display, Error, From};
use rust_xlsxwriter::XlsxError;
use serde::Serialize;

use crate::{
    report::{build_workbook, ReportDeliveryError, ReportRow, ReportSink, SmtpSink},
    snapshot,
};

/// Attachment name of the emailed report.
const REPORT_FILE_NAME: &str = "Contracts_Report.xlsx";

/// Errors that may occur during report generation and delivery.
#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum ContractReportError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Outgoing mail is not configured on this deployment.
    #[status(StatusCode::SERVICE_UNAVAILABLE)]
    #[display(fmt = "outgoing mail is not configured")]
    MailerNotConfigured,

    /// Unable to build the report workbook.
    Workbook(XlsxError),

    /// Unable to deliver the report.
    Delivery(ReportDeliveryError),
}

/// JSON response body.
#[derive(Serialize)]
pub(super) struct ContractReportResponse {
    message: &'static str,
}

/// Report handler.
///
/// Builds the tabular export over every contract and emails it to the
/// configured recipients.
pub(super) async fn report(
    State(db): State<Arc<DatabaseConnection>>,
    Extension(config): Extension<Arc<Config>>,
) -> Result<Json<ContractReportResponse>, ContractReportError> {
    let Some(mail) = config.mail.as_ref() else {
        return Err(ContractReportError::MailerNotConfigured);
    };

    let contracts = contract::Entity::find()
        .order_by_asc(contract::Column::Id)
        .all(&*db)
        .await?;

    let mut rows = Vec::with_capacity(contracts.len());

    for model in contracts {
        let view = snapshot::contract_view(&*db, model).await?;

        rows.push(ReportRow::from_contract(&view));
    }

    let workbook = build_workbook(&rows)?;

    SmtpSink::new(mail).send(REPORT_FILE_NAME, workbook)?;

    Ok(Json(ContractReportResponse {
        message: "Report Sent.",
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
    async fn requires_mail_configuration() {
        let db = create_database().await;

        let (_, token) = create_user(&db, "meera", false).await;

        let response = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()))
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/contract/report")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
