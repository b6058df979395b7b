use chrono::{DateTime, Datelike, Months, NaiveDate, TimeDelta};

use crate::error::ScheduleError;
use crate::services::payment_frequency::{get_payment_frequency, PaymentFrequency, PeriodUnit};

/// The parts of a lease that drive its payment schedule.
#[derive(Debug, Clone)]
pub struct LeaseTerms {
    pub payment_start_date: NaiveDate,
    pub frequency: &'static PaymentFrequency,
    /// Day-of-month override for month-based frequencies.
    pub payment_day: Option<u32>,
    pub end_date: Option<NaiveDate>,
}

/// Bounds for schedule generation. Generation stops at whichever of
/// `periods`, `max_periods` or the lease end date comes first.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleWindow {
    pub periods: Option<u32>,
    pub max_periods: u32,
}

/// Parse a boundary date. Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, in
/// which case the date as written (local to its offset) is used.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ScheduleError> {
    let text = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(text)
        .map(|timestamp| timestamp.date_naive())
        .map_err(|_| ScheduleError::InvalidDate(text.to_string()))
}

/// Like [`parse_date`], but absent or blank input is `None` rather than an error.
pub fn parse_date_opt(raw: Option<&str>) -> Result<Option<NaiveDate>, ScheduleError> {
    match raw.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => parse_date(text).map(Some),
        None => Ok(None),
    }
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// `day` within the given month, clamped to the month's length.
fn clamped_month_day(year: i32, month: u32, day: u32) -> Result<NaiveDate, ScheduleError> {
    let last = last_day_of_month(year, month).ok_or(ScheduleError::DateOutOfRange)?;
    NaiveDate::from_ymd_opt(year, month, day.clamp(1, last.day()))
        .ok_or(ScheduleError::DateOutOfRange)
}

fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate, ScheduleError> {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or(ScheduleError::DateOutOfRange)
}

fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate, ScheduleError> {
    date.checked_add_months(Months::new(months))
        .ok_or(ScheduleError::DateOutOfRange)
}

fn first_of_month(date: NaiveDate) -> Result<NaiveDate, ScheduleError> {
    date.with_day(1).ok_or(ScheduleError::DateOutOfRange)
}

fn resolve_payment_day(start: NaiveDate, payment_day: Option<u32>) -> Result<u32, ScheduleError> {
    match payment_day {
        Some(day) if (1..=31).contains(&day) => Ok(day),
        Some(day) => Err(ScheduleError::InvalidPaymentDay(day)),
        None => Ok(start.day()),
    }
}

/// End of the period that begins on `start`.
///
/// Single-month periods are anchored to the calendar month and end on its
/// last day; every other period is a plain calendar addition.
pub fn calculate_period_end_date(
    start: NaiveDate,
    frequency: &PaymentFrequency,
) -> Result<NaiveDate, ScheduleError> {
    let amount = frequency.period_amount.max(1);
    match frequency.period_unit {
        PeriodUnit::Days => add_days(start, i64::from(amount)),
        PeriodUnit::Weeks => add_days(start, 7 * i64::from(amount)),
        PeriodUnit::Months if amount == 1 => {
            last_day_of_month(start.year(), start.month()).ok_or(ScheduleError::DateOutOfRange)
        }
        PeriodUnit::Months => add_months(start, amount),
        PeriodUnit::Years => add_months(
            start,
            amount.checked_mul(12).ok_or(ScheduleError::DateOutOfRange)?,
        ),
    }
}

/// Next due date for a lease paying on `frequency_key`, evaluated at `reference`.
pub fn calculate_next_due_date(
    payment_start_date: NaiveDate,
    frequency_key: &str,
    payment_day: Option<u32>,
    reference: NaiveDate,
) -> Result<NaiveDate, ScheduleError> {
    let frequency = get_payment_frequency(frequency_key)?;
    next_due_date_for(payment_start_date, frequency, payment_day, reference)
}

pub fn next_due_date_for(
    payment_start_date: NaiveDate,
    frequency: &PaymentFrequency,
    payment_day: Option<u32>,
    reference: NaiveDate,
) -> Result<NaiveDate, ScheduleError> {
    let target_day = resolve_payment_day(payment_start_date, payment_day)?;
    let amount = frequency.period_amount.max(1);

    match frequency.period_unit {
        PeriodUnit::Months => {
            let mut month = first_of_month(reference)?;
            if reference.day() > target_day {
                month = add_months(month, amount)?;
            }
            clamped_month_day(month.year(), month.month(), target_day)
        }
        // Daily leases are always due the day after the reference date,
        // independent of the start date.
        PeriodUnit::Days => add_days(reference, 1),
        PeriodUnit::Weeks => {
            let target = i64::from(payment_start_date.weekday().num_days_from_monday());
            let current = i64::from(reference.weekday().num_days_from_monday());
            let mut days_ahead = (target - current).rem_euclid(7);
            if days_ahead == 0 {
                days_ahead = 7;
            }
            let mut next = add_days(reference, days_ahead)?;

            if amount > 1 {
                let weeks_since_start = next.signed_duration_since(payment_start_date).num_days() / 7;
                let offset = weeks_since_start.rem_euclid(i64::from(amount));
                if offset != 0 {
                    next = add_days(next, 7 * (i64::from(amount) - offset))?;
                }
            }
            Ok(next)
        }
        PeriodUnit::Years => {
            let (month, day) = (payment_start_date.month(), payment_start_date.day());
            let candidate = clamped_month_day(reference.year(), month, day)?;
            if candidate < reference {
                let next_year = reference
                    .year()
                    .checked_add(1)
                    .ok_or(ScheduleError::DateOutOfRange)?;
                clamped_month_day(next_year, month, day)
            } else {
                Ok(candidate)
            }
        }
    }
}

/// Due dates for a lease, in ascending order.
///
/// Month-based schedules open on the payment day in the start month, or in
/// the next calendar month when that day falls before the start date. Other
/// units open on the start date. Later dates are whole periods after the
/// opening date.
pub fn generate_due_dates(
    terms: &LeaseTerms,
    window: &ScheduleWindow,
) -> Result<Vec<NaiveDate>, ScheduleError> {
    if window.periods.is_none() && terms.end_date.is_none() {
        return Err(ScheduleError::EmptyWindow);
    }

    let frequency = terms.frequency;
    let start = terms.payment_start_date;
    let target_day = resolve_payment_day(start, terms.payment_day)?;
    let first = match frequency.period_unit {
        PeriodUnit::Months => first_monthly_due_date(start, target_day)?,
        _ => start,
    };
    let limit = window
        .periods
        .unwrap_or(window.max_periods)
        .min(window.max_periods);

    let mut due_dates = Vec::new();
    for index in 0..limit {
        let due = nth_due_date(first, target_day, start, frequency, index)?;
        if terms.end_date.is_some_and(|end| due > end) {
            break;
        }
        due_dates.push(due);
    }

    tracing::debug!(
        frequency = frequency.value,
        start = %start,
        generated = due_dates.len(),
        "Generated payment due dates"
    );
    Ok(due_dates)
}

/// `target_day` in the start month when that is not before the start,
/// otherwise in the following calendar month.
fn first_monthly_due_date(start: NaiveDate, target_day: u32) -> Result<NaiveDate, ScheduleError> {
    let opening = clamped_month_day(start.year(), start.month(), target_day)?;
    if opening >= start {
        return Ok(opening);
    }
    let next_month = add_months(first_of_month(start)?, 1)?;
    clamped_month_day(next_month.year(), next_month.month(), target_day)
}

fn nth_due_date(
    first: NaiveDate,
    target_day: u32,
    start: NaiveDate,
    frequency: &PaymentFrequency,
    index: u32,
) -> Result<NaiveDate, ScheduleError> {
    let steps = index
        .checked_mul(frequency.period_amount.max(1))
        .ok_or(ScheduleError::DateOutOfRange)?;
    match frequency.period_unit {
        PeriodUnit::Days => add_days(first, i64::from(steps)),
        PeriodUnit::Weeks => add_days(first, 7 * i64::from(steps)),
        PeriodUnit::Months => {
            let month = add_months(first_of_month(first)?, steps)?;
            clamped_month_day(month.year(), month.month(), target_day)
        }
        PeriodUnit::Years => {
            let year = i32::try_from(steps)
                .ok()
                .and_then(|steps| first.year().checked_add(steps))
                .ok_or(ScheduleError::DateOutOfRange)?;
            clamped_month_day(year, start.month(), start.day())
        }
    }
}
