use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::services::payments::Payment;

pub const DEFAULT_GRACE_PERIOD_DAYS: u32 = 5;

/// Effective status of a payment at a reference date. Always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Late,
    Advanced,
    Undefined,
}

impl PaymentStatus {
    pub fn is_outstanding(self) -> bool {
        matches!(self, Self::Pending | Self::Late)
    }
}

/// Classify a payment.
///
/// Payment presence is checked before the grace window, so a payment that
/// has been recorded is never late, however long after the due date it was
/// made. An unpaid payment turns late on the first day after
/// `due_date + grace_period_days`.
pub fn determine_payment_status(
    due_date: Option<NaiveDate>,
    payment_date: Option<NaiveDate>,
    grace_period_days: u32,
    reference: NaiveDate,
) -> PaymentStatus {
    let Some(due_date) = due_date else {
        return PaymentStatus::Undefined;
    };

    if let Some(payment_date) = payment_date {
        return if payment_date < due_date {
            PaymentStatus::Advanced
        } else {
            PaymentStatus::Paid
        };
    }

    match due_date.checked_add_days(Days::new(u64::from(grace_period_days))) {
        Some(grace_end) if reference > grace_end => PaymentStatus::Late,
        _ => PaymentStatus::Pending,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaymentStatusSummary {
    pub total: usize,
    pub paid: usize,
    pub pending: usize,
    pub late: usize,
    pub advanced: usize,
    pub undefined: usize,
    pub outstanding_amount: f64,
    pub late_amount: f64,
}

impl PaymentStatusSummary {
    fn record(&mut self, status: PaymentStatus, amount: f64) {
        self.total += 1;
        match status {
            PaymentStatus::Paid => self.paid += 1,
            PaymentStatus::Pending => self.pending += 1,
            PaymentStatus::Late => {
                self.late += 1;
                self.late_amount += amount;
            }
            PaymentStatus::Advanced => self.advanced += 1,
            PaymentStatus::Undefined => self.undefined += 1,
        }
        if status.is_outstanding() {
            self.outstanding_amount += amount;
        }
    }
}

pub fn summarize_statuses(
    payments: &[Payment],
    grace_period_days: u32,
    reference: NaiveDate,
) -> PaymentStatusSummary {
    let mut summary = PaymentStatusSummary::default();
    for payment in payments {
        summary.record(payment.status(grace_period_days, reference), payment.amount);
    }
    summary.outstanding_amount = round2(summary.outstanding_amount);
    summary.late_amount = round2(summary.late_amount);
    summary
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{determine_payment_status, summarize_statuses, PaymentStatus, DEFAULT_GRACE_PERIOD_DAYS};
    use crate::services::payments::{Payment, PaymentType};

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
    }

    #[test]
    fn unpaid_payment_turns_late_after_grace_window() {
        let due = Some(date("2024-01-10"));
        assert_eq!(
            determine_payment_status(due, None, 5, date("2024-01-20")),
            PaymentStatus::Late
        );
        assert_eq!(
            determine_payment_status(due, None, 5, date("2024-01-14")),
            PaymentStatus::Pending
        );
        assert_eq!(
            determine_payment_status(due, None, 5, date("2024-01-15")),
            PaymentStatus::Pending
        );
        assert_eq!(
            determine_payment_status(due, None, 5, date("2024-01-16")),
            PaymentStatus::Late
        );
        assert_eq!(
            determine_payment_status(due, None, 0, date("2024-01-11")),
            PaymentStatus::Late
        );
    }

    #[test]
    fn early_payment_is_advanced() {
        assert_eq!(
            determine_payment_status(
                Some(date("2024-01-10")),
                Some(date("2024-01-05")),
                DEFAULT_GRACE_PERIOD_DAYS,
                date("2024-01-06"),
            ),
            PaymentStatus::Advanced
        );
    }

    #[test]
    fn recorded_payment_is_never_late() {
        let due = Some(date("2024-01-10"));
        assert_eq!(
            determine_payment_status(due, Some(date("2024-02-01")), 5, date("2024-02-02")),
            PaymentStatus::Paid
        );
        assert_eq!(
            determine_payment_status(due, Some(date("2024-01-10")), 5, date("2030-01-01")),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn missing_due_date_is_undefined() {
        for payment_date in [None, Some(date("2024-01-05"))] {
            assert_eq!(
                determine_payment_status(None, payment_date, 5, date("2024-01-20")),
                PaymentStatus::Undefined
            );
        }
    }

    #[test]
    fn huge_grace_period_never_overflows() {
        assert_eq!(
            determine_payment_status(Some(date("2024-01-10")), None, u32::MAX, date("2024-12-31")),
            PaymentStatus::Pending
        );
    }

    #[test]
    fn summarizes_counts_and_amounts() {
        let reference = date("2024-03-20");
        let mut paid = Payment::scheduled(None, date("2024-01-10"), 1000.0, PaymentType::Rent);
        paid.mark_paid(date("2024-01-12"));
        let late = Payment::scheduled(None, date("2024-02-10"), 1000.5, PaymentType::Rent);
        let pending = Payment::scheduled(None, date("2024-03-18"), 250.25, PaymentType::Fee);
        let mut undefined = Payment::scheduled(None, date("2024-03-01"), 80.0, PaymentType::Other);
        undefined.due_date = None;

        let summary = summarize_statuses(&[paid, late, pending, undefined], 5, reference);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.paid, 1);
        assert_eq!(summary.late, 1);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.undefined, 1);
        assert_eq!(summary.advanced, 0);
        assert_eq!(summary.late_amount, 1000.5);
        assert_eq!(summary.outstanding_amount, 1250.75);
    }
}
