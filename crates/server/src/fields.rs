//! Explicit mutable field sets for document write operations.
//!
//! Create and update requests may only touch the fields enumerated here.
//! Identity, approval state, document numbering, print and version counters
//! are deliberately absent from this set, so no request body can overwrite
//! them.

use db::{contract, party::Party, quotation, ActiveValue};
use serde::Deserialize;
use validator::Validate;

use crate::{line_items::QuoteInfoInput, snapshot};

/// Marker for out-of-range date values in a request body.
pub(crate) struct InvalidDate;

/// The mutable field set shared by contracts and quotations.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DocumentFields {
    /// Document date as a unix timestamp. Absent on update leaves the
    /// stored date unchanged; absent on create defaults to "now".
    #[serde(default, rename = "contractDate", alias = "quotationDate")]
    pub date: Option<i64>,

    pub doc_type: contract::DocType,

    pub bill_to: Party,

    pub ship_to: Party,

    #[serde(default)]
    pub email_to: Option<String>,

    #[serde(default)]
    pub note: Option<String>,

    #[serde(default)]
    pub work_order_no: Option<String>,

    #[serde(default)]
    pub work_order_date: Option<i64>,

    #[serde(default)]
    pub gst_no: Option<String>,

    #[serde(default)]
    pub payment_terms: Option<String>,

    #[serde(default)]
    pub sales_person_id: Option<i64>,

    /// Ordered line item list.
    #[validate]
    #[serde(default)]
    pub quote_info: Vec<QuoteInfoInput>,
}

impl DocumentFields {
    /// Copy the field set onto a contract, returning the line item list
    /// for reconciliation.
    pub(crate) fn apply_contract(
        self,
        active: &mut contract::ActiveModel,
    ) -> Result<Vec<QuoteInfoInput>, InvalidDate> {
        if let Some(date) = self.date {
            active.contract_date =
                ActiveValue::Set(snapshot::from_timestamp(date).ok_or(InvalidDate)?);
        }

        active.work_order_date = ActiveValue::Set(
            self.work_order_date
                .map(|date| snapshot::from_timestamp(date).ok_or(InvalidDate))
                .transpose()?,
        );

        active.doc_type = ActiveValue::Set(self.doc_type);
        active.client_name = ActiveValue::Set(self.bill_to.name.clone());
        active.project_name = ActiveValue::Set(self.ship_to.name.clone());
        active.bill_to = ActiveValue::Set(self.bill_to);
        active.ship_to = ActiveValue::Set(self.ship_to);
        active.email_to = ActiveValue::Set(self.email_to);
        active.note = ActiveValue::Set(self.note);
        active.work_order_no = ActiveValue::Set(self.work_order_no);
        active.gst_no = ActiveValue::Set(self.gst_no);
        active.payment_terms = ActiveValue::Set(self.payment_terms);
        active.sales_person_id = ActiveValue::Set(self.sales_person_id);

        Ok(self.quote_info)
    }

    /// Copy the field set onto a quotation, returning the line item list
    /// for reconciliation.
    pub(crate) fn apply_quotation(
        self,
        active: &mut quotation::ActiveModel,
    ) -> Result<Vec<QuoteInfoInput>, InvalidDate> {
        if let Some(date) = self.date {
            active.quotation_date =
                ActiveValue::Set(snapshot::from_timestamp(date).ok_or(InvalidDate)?);
        }

        active.work_order_date = ActiveValue::Set(
            self.work_order_date
                .map(|date| snapshot::from_timestamp(date).ok_or(InvalidDate))
                .transpose()?,
        );

        active.doc_type = ActiveValue::Set(self.doc_type);
        active.client_name = ActiveValue::Set(self.bill_to.name.clone());
        active.project_name = ActiveValue::Set(self.ship_to.name.clone());
        active.bill_to = ActiveValue::Set(self.bill_to);
        active.ship_to = ActiveValue::Set(self.ship_to);
        active.email_to = ActiveValue::Set(self.email_to);
        active.note = ActiveValue::Set(self.note);
        active.work_order_no = ActiveValue::Set(self.work_order_no);
        active.gst_no = ActiveValue::Set(self.gst_no);
        active.payment_terms = ActiveValue::Set(self.payment_terms);
        active.sales_person_id = ActiveValue::Set(self.sales_person_id);

        Ok(self.quote_info)
    }
}
