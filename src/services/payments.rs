use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ScheduleError;
use crate::services::{
    payment_schedule::{generate_due_dates, LeaseTerms, ScheduleWindow},
    payment_status::{determine_payment_status, PaymentStatus},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    #[default]
    Rent,
    Deposit,
    Fee,
    #[serde(other)]
    Other,
}

/// A scheduled or recorded obligation tied to a lease.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    pub id: Option<String>,
    pub lease_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub amount: f64,
    pub payment_type: PaymentType,
    pub notes: Option<String>,
}

impl Payment {
    pub fn scheduled(
        lease_id: Option<String>,
        due_date: NaiveDate,
        amount: f64,
        payment_type: PaymentType,
    ) -> Self {
        Self {
            id: Some(Uuid::new_v4().to_string()),
            lease_id,
            due_date: Some(due_date),
            payment_date: None,
            amount,
            payment_type,
            notes: None,
        }
    }

    pub fn mark_paid(&mut self, payment_date: NaiveDate) {
        self.payment_date = Some(payment_date);
    }

    pub fn status(&self, grace_period_days: u32, reference: NaiveDate) -> PaymentStatus {
        determine_payment_status(
            self.due_date,
            self.payment_date,
            grace_period_days,
            reference,
        )
    }
}

/// What each generated row charges.
#[derive(Debug, Clone)]
pub struct ScheduledCharge {
    pub lease_id: Option<String>,
    pub amount: f64,
    pub payment_type: PaymentType,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedPayment {
    #[serde(flatten)]
    pub payment: Payment,
    pub effective_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<NaiveDate>,
}

/// Ascending due date; rows without a due date go last. Stable for ties.
pub fn sort_by_due_date(payments: &mut [Payment]) {
    payments.sort_by_key(|payment| (payment.due_date.is_none(), payment.due_date));
}

pub fn annotate(
    payments: Vec<Payment>,
    grace_period_days: u32,
    reference: NaiveDate,
) -> Vec<AnnotatedPayment> {
    payments
        .into_iter()
        .map(|payment| AnnotatedPayment {
            effective_status: payment.status(grace_period_days, reference),
            payment,
            period_end: None,
        })
        .collect()
}

/// Unpersisted payment rows for a lease's schedule, ordered by due date.
pub fn build_schedule(
    terms: &LeaseTerms,
    window: &ScheduleWindow,
    charge: &ScheduledCharge,
) -> Result<Vec<Payment>, ScheduleError> {
    let payments = generate_due_dates(terms, window)?
        .into_iter()
        .map(|due_date| {
            Payment::scheduled(
                charge.lease_id.clone(),
                due_date,
                charge.amount,
                charge.payment_type,
            )
        })
        .collect();
    Ok(payments)
}
