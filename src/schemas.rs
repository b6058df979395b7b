use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, ScheduleError};
use crate::services::{
    payment_schedule::parse_date_opt,
    payments::{Payment, PaymentType},
};

pub fn validate_input<T: Validate>(input: &T) -> Result<(), AppError> {
    input
        .validate()
        .map_err(|errors| AppError::UnprocessableEntity(format!("Validation failed: {errors}")))
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrequencyPath {
    pub value: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NextDueDateQuery {
    #[validate(length(min = 1, max = 64))]
    pub payment_start_date: String,
    #[validate(length(min = 1, max = 32))]
    pub frequency: String,
    pub payment_day: Option<u32>,
    pub reference_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PeriodEndQuery {
    #[validate(length(min = 1, max = 64))]
    pub start_date: String,
    #[validate(length(min = 1, max = 32))]
    pub frequency: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateScheduleInput {
    #[validate(length(min = 1, max = 255))]
    pub lease_id: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub payment_start_date: String,
    #[validate(length(min = 1, max = 32))]
    pub frequency: String,
    pub payment_day: Option<u32>,
    pub end_date: Option<String>,
    #[validate(range(min = 1, max = 1200))]
    pub periods: Option<u32>,
    #[validate(range(min = 0.0))]
    pub amount: f64,
    #[serde(default)]
    pub payment_type: PaymentType,
    #[validate(range(max = 365))]
    pub grace_period_days: Option<u32>,
    pub reference_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentRecordInput {
    pub id: Option<String>,
    pub lease_id: Option<String>,
    pub due_date: Option<String>,
    pub payment_date: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub payment_type: PaymentType,
    pub notes: Option<String>,
}

impl PaymentRecordInput {
    pub fn into_payment(self) -> Result<Payment, ScheduleError> {
        let payment_date = parse_date_opt(self.payment_date.as_deref())?;
        let mut payment = Payment {
            due_date: parse_date_opt(self.due_date.as_deref())?,
            payment_date: None,
            id: self.id,
            lease_id: self.lease_id,
            amount: self.amount,
            payment_type: self.payment_type,
            notes: self.notes,
        };
        if let Some(payment_date) = payment_date {
            payment.mark_paid(payment_date);
        }
        Ok(payment)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaymentStatusInput {
    #[validate(length(max = 1000))]
    pub payments: Vec<PaymentRecordInput>,
    #[validate(range(max = 365))]
    pub grace_period_days: Option<u32>,
    pub reference_date: Option<String>,
}
