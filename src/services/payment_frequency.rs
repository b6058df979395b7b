use serde::Serialize;

use crate::error::ScheduleError;

/// Calendar granularity a frequency steps by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Days,
    Weeks,
    Months,
    #[allow(dead_code)]
    Years,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentFrequency {
    pub value: &'static str,
    pub label: &'static str,
    pub period_unit: PeriodUnit,
    pub period_amount: u32,
    /// Approximate length of one period. Display only, never used for date math.
    pub nominal_days: u32,
}

pub const MONTHLY: &str = "monthly";

static PAYMENT_FREQUENCIES: [PaymentFrequency; 7] = [
    PaymentFrequency {
        value: "daily",
        label: "Daily",
        period_unit: PeriodUnit::Days,
        period_amount: 1,
        nominal_days: 1,
    },
    PaymentFrequency {
        value: "weekly",
        label: "Weekly",
        period_unit: PeriodUnit::Weeks,
        period_amount: 1,
        nominal_days: 7,
    },
    PaymentFrequency {
        value: "biweekly",
        label: "Biweekly",
        period_unit: PeriodUnit::Weeks,
        period_amount: 2,
        nominal_days: 14,
    },
    PaymentFrequency {
        value: MONTHLY,
        label: "Monthly",
        period_unit: PeriodUnit::Months,
        period_amount: 1,
        nominal_days: 30,
    },
    PaymentFrequency {
        value: "quarterly",
        label: "Quarterly",
        period_unit: PeriodUnit::Months,
        period_amount: 3,
        nominal_days: 90,
    },
    PaymentFrequency {
        value: "biannually",
        label: "Biannually",
        period_unit: PeriodUnit::Months,
        period_amount: 6,
        nominal_days: 180,
    },
    PaymentFrequency {
        value: "annually",
        label: "Annually",
        period_unit: PeriodUnit::Months,
        period_amount: 12,
        nominal_days: 365,
    },
];

pub fn payment_frequencies() -> &'static [PaymentFrequency] {
    &PAYMENT_FREQUENCIES
}

/// Strict lookup. Keys are compared trimmed and case-insensitively.
pub fn get_payment_frequency(value: &str) -> Result<&'static PaymentFrequency, ScheduleError> {
    let key = value.trim().to_ascii_lowercase();
    PAYMENT_FREQUENCIES
        .iter()
        .find(|frequency| frequency.value == key)
        .ok_or(ScheduleError::UnknownFrequency(key))
}

/// Lenient lookup kept for legacy lease rows: anything unrecognized is
/// treated as monthly.
pub fn get_payment_frequency_or_default(value: &str) -> &'static PaymentFrequency {
    match get_payment_frequency(value) {
        Ok(frequency) => frequency,
        Err(_) => {
            tracing::warn!(frequency = %value, "Unknown payment frequency, defaulting to monthly");
            monthly()
        }
    }
}

fn monthly() -> &'static PaymentFrequency {
    &PAYMENT_FREQUENCIES[3]
}
