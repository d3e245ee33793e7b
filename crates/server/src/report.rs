//! Tabular report building and delivery.
//!
//! Reports are XLSX workbooks with one row per document. Delivery is a
//! capability behind the [`ReportSink`] trait; the production sink attaches
//! the workbook to a transactional email sent over SMTP.

use common::config::Mail;
use db::party::Party;
use derive_more::{Display, Error, From};
use lettre::{
    message::{header::ContentType, Attachment, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use rust_xlsxwriter::{Workbook, XlsxError};
use time::{macros::format_description, OffsetDateTime};

use crate::snapshot::ContractView;

/// Join separator for multi-value cells.
const VALUE_SEPARATOR: &str = "& ";

/// Join separator for contact entries within one list.
const CONTACT_SEPARATOR: &str = ", ";

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Report column headers with their display widths.
const COLUMNS: [(&str, f64); 8] = [
    ("REP", 15.),
    ("Date", 15.),
    ("Contract No", 15.),
    ("Name of Client", 30.),
    ("Area", 15.),
    ("Amount", 15.),
    ("Contact Nos", 15.),
    ("Remark", 30.),
];

/// One formatted report row.
pub(crate) struct ReportRow {
    pub rep: String,
    pub date: String,
    pub number: String,
    pub client_name: String,
    pub area: String,
    pub amount: String,
    pub contact_nos: String,
    pub remark: String,
}

impl ReportRow {
    pub(crate) fn from_contract(view: &ContractView) -> Self {
        let area = view
            .quote_info
            .iter()
            .map(|info| info.work_area.clone())
            .collect::<Vec<_>>()
            .join(VALUE_SEPARATOR);

        let amount = view
            .quote_info
            .iter()
            .map(|info| {
                format!(
                    "{} {}- {}",
                    info.service_rate, info.service_rate_unit, info.chemical
                )
            })
            .collect::<Vec<_>>()
            .join(VALUE_SEPARATOR);

        let contact_nos = [contact_list(&view.bill_to), contact_list(&view.ship_to)]
            .into_iter()
            .filter(|list| !list.is_empty())
            .collect::<Vec<_>>()
            .join(VALUE_SEPARATOR);

        Self {
            rep: view
                .sales_person
                .as_ref()
                .map(|person| person.initials.clone())
                .unwrap_or_default(),
            date: format_date(view.contract_date),
            number: view
                .contract_no
                .clone()
                .unwrap_or_else(|| view.id.to_string()),
            client_name: view.bill_to.name.clone(),
            area,
            amount,
            contact_nos,
            remark: view.note.clone().unwrap_or_default(),
        }
    }
}

fn contact_list(party: &Party) -> String {
    party
        .kci
        .iter()
        .map(|kci| format!("{} ({})", kci.contact, kci.name))
        .collect::<Vec<_>>()
        .join(CONTACT_SEPARATOR)
}

fn format_date(timestamp: i64) -> String {
    let format = format_description!("[year]-[month]-[day]");

    OffsetDateTime::from_unix_timestamp(timestamp)
        .ok()
        .and_then(|value| value.format(&format).ok())
        .unwrap_or_default()
}

/// Build an XLSX workbook from the provided rows.
pub(crate) fn build_workbook(rows: &[ReportRow]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, (header, width)) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
        worksheet.set_column_width(col as u16, *width)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let cells = [
            &row.rep,
            &row.date,
            &row.number,
            &row.client_name,
            &row.area,
            &row.amount,
            &row.contact_nos,
            &row.remark,
        ];

        for (col, cell) in cells.into_iter().enumerate() {
            worksheet.write_string(index as u32 + 1, col as u16, cell)?;
        }
    }

    workbook.save_to_buffer()
}

/// Errors that may occur while delivering a report.
#[derive(Debug, Display, Error, From)]
pub(crate) enum ReportDeliveryError {
    /// Malformed sender or recipient mailbox.
    Address(lettre::address::AddressError),

    /// Unable to assemble the email message.
    Email(lettre::error::Error),

    /// Unable to parse the attachment content type.
    ContentType(lettre::message::header::ContentTypeErr),

    /// SMTP transport failure.
    Smtp(lettre::transport::smtp::Error),
}

/// Delivery capability for generated reports.
pub(crate) trait ReportSink {
    fn send(&self, name: &str, report: Vec<u8>) -> Result<(), ReportDeliveryError>;
}

/// SMTP-backed report delivery.
pub(crate) struct SmtpSink<'a> {
    mail: &'a Mail,
}

impl<'a> SmtpSink<'a> {
    pub(crate) fn new(mail: &'a Mail) -> Self {
        Self { mail }
    }
}

impl ReportSink for SmtpSink<'_> {
    fn send(&self, name: &str, report: Vec<u8>) -> Result<(), ReportDeliveryError> {
        let attachment =
            Attachment::new(name.to_owned()).body(report, ContentType::parse(XLSX_CONTENT_TYPE)?);

        let mut builder = Message::builder()
            .from(self.mail.from.parse()?)
            .subject("Contracts Report");

        for recipient in &self.mail.to {
            builder = builder.to(recipient.parse()?);
        }

        let email = builder.multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(String::from(
                    "Find the generated contracts report attached.",
                )))
                .singlepart(attachment),
        )?;

        let transport = SmtpTransport::relay(&self.mail.smtp_host)?
            .credentials(Credentials::new(
                self.mail.username.clone(),
                self.mail.password.clone(),
            ))
            .port(self.mail.smtp_port)
            .build();

        transport.send(&email)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use db::party::{Kci, Party};

    use crate::snapshot::{ContractView, QuoteInfoView, UserRef};

    use super::{build_workbook, ReportRow};

    fn test_view() -> ContractView {
        ContractView {
            id: 1,
            quotation_id: None,
            contract_no: Some(String::from("CT-0001")),
            contract_date: 1672531200,
            doc_type: db::contract::DocType::Standard,
            bill_to: Party {
                name: String::from("Acme Estates"),
                address: String::from("12 High Street"),
                kci: vec![
                    Kci {
                        name: String::from("Asha"),
                        contact: String::from("9000000001"),
                        email: None,
                    },
                    Kci {
                        name: String::from("Ravi"),
                        contact: String::from("9000000002"),
                        email: None,
                    },
                ],
            },
            ship_to: Party {
                name: String::from("Acme Tower"),
                address: String::from("Plot 4"),
                kci: vec![Kci {
                    name: String::from("Site Office"),
                    contact: String::from("9000000003"),
                    email: None,
                }],
            },
            email_to: None,
            note: Some(String::from("quarterly service")),
            work_order_no: None,
            work_order_date: None,
            gst_no: None,
            payment_terms: None,
            approved: true,
            print_count: 0,
            version: 1,
            quote_info: vec![
                QuoteInfoView {
                    id: 1,
                    chemical: String::from("Imidacloprid"),
                    work_area: String::from("Basement"),
                    work_area_unit: None,
                    service_rate: 2750,
                    service_rate_unit: String::from("per sqft"),
                    packaging: None,
                    batch_nos: Vec::new(),
                },
                QuoteInfoView {
                    id: 2,
                    chemical: String::from("Chlorpyrifos"),
                    work_area: String::from("Garden"),
                    work_area_unit: None,
                    service_rate: 1200,
                    service_rate_unit: String::from("per visit"),
                    packaging: None,
                    batch_nos: Vec::new(),
                },
            ],
            sales_person: Some(UserRef {
                id: 7,
                username: String::from("meera"),
                initials: String::from("MS"),
            }),
            created_by: None,
            created_at: 1672531200,
            updated_at: 1672531200,
        }
    }

    #[test]
    fn row_formatting() {
        let row = ReportRow::from_contract(&test_view());

        assert_eq!(row.rep, "MS");
        assert_eq!(row.date, "2023-01-01");
        assert_eq!(row.number, "CT-0001");
        assert_eq!(row.client_name, "Acme Estates");
        assert_eq!(row.area, "Basement& Garden");
        assert_eq!(
            row.amount,
            "2750 per sqft- Imidacloprid& 1200 per visit- Chlorpyrifos"
        );
        assert_eq!(
            row.contact_nos,
            "9000000001 (Asha), 9000000002 (Ravi)& 9000000003 (Site Office)"
        );
        assert_eq!(row.remark, "quarterly service");
    }

    #[test]
    fn unapproved_contract_falls_back_to_identifier() {
        let mut view = test_view();
        view.contract_no = None;

        let row = ReportRow::from_contract(&view);

        assert_eq!(row.number, "1");
    }

    #[test]
    fn workbook_is_not_empty() {
        let rows = vec![ReportRow::from_contract(&test_view())];

        let buffer = build_workbook(&rows).expect("unable to build workbook");

        assert!(!buffer.is_empty());
    }
}
