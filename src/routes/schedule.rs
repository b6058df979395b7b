use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    schemas::{validate_input, GenerateScheduleInput, NextDueDateQuery, PeriodEndQuery},
    services::{
        payment_frequency::{
            get_payment_frequency, get_payment_frequency_or_default, PaymentFrequency,
        },
        payment_schedule::{
            calculate_next_due_date, calculate_period_end_date, parse_date, parse_date_opt,
            LeaseTerms, ScheduleWindow,
        },
        payment_status::summarize_statuses,
        payments::{annotate, build_schedule, ScheduledCharge},
    },
    state::AppState,
};

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route(
            "/schedule/next-due-date",
            axum::routing::get(get_next_due_date),
        )
        .route("/schedule/period-end", axum::routing::get(get_period_end))
        .route(
            "/schedule/generate",
            axum::routing::post(generate_schedule),
        )
}

async fn get_next_due_date(
    State(state): State<AppState>,
    Query(query): Query<NextDueDateQuery>,
) -> AppResult<Json<Value>> {
    validate_input(&query)?;

    let frequency = resolve_frequency(&state, &query.frequency)?;
    let start = parse_date(&query.payment_start_date)?;
    let reference = reference_date(&state, query.reference_date.as_deref())?;
    let next_due_date =
        calculate_next_due_date(start, frequency.value, query.payment_day, reference)?;

    Ok(Json(json!({
        "data": {
            "next_due_date": next_due_date,
            "reference_date": reference,
            "payment_start_date": start,
            "frequency": frequency.value,
        }
    })))
}

async fn get_period_end(
    State(state): State<AppState>,
    Query(query): Query<PeriodEndQuery>,
) -> AppResult<Json<Value>> {
    validate_input(&query)?;

    let frequency = resolve_frequency(&state, &query.frequency)?;
    let start = parse_date(&query.start_date)?;
    let period_end = calculate_period_end_date(start, frequency)?;

    Ok(Json(json!({
        "data": {
            "start_date": start,
            "period_end": period_end,
            "frequency": frequency,
        }
    })))
}

async fn generate_schedule(
    State(state): State<AppState>,
    Json(payload): Json<GenerateScheduleInput>,
) -> AppResult<Json<Value>> {
    validate_input(&payload)?;

    let frequency = resolve_frequency(&state, &payload.frequency)?;
    let terms = LeaseTerms {
        payment_start_date: parse_date(&payload.payment_start_date)?,
        frequency,
        payment_day: payload.payment_day,
        end_date: parse_date_opt(payload.end_date.as_deref())?,
    };
    let window = ScheduleWindow {
        periods: payload.periods,
        max_periods: state.config.schedule_max_periods,
    };
    let charge = ScheduledCharge {
        lease_id: payload.lease_id.clone(),
        amount: payload.amount,
        payment_type: payload.payment_type,
    };

    let reference = reference_date(&state, payload.reference_date.as_deref())?;
    let grace_period_days = grace_period(&state, payload.grace_period_days);

    let payments = build_schedule(&terms, &window, &charge)?;
    let summary = summarize_statuses(&payments, grace_period_days, reference);
    let mut rows = annotate(payments, grace_period_days, reference);
    for row in &mut rows {
        if let Some(due_date) = row.payment.due_date {
            row.period_end = Some(calculate_period_end_date(due_date, frequency)?);
        }
    }

    tracing::info!(
        lease_id = payload.lease_id.as_deref().unwrap_or("-"),
        frequency = frequency.value,
        generated = rows.len(),
        "Generated payment schedule"
    );

    Ok(Json(json!({
        "data": rows,
        "summary": summary,
        "frequency": frequency,
        "reference_date": reference,
        "grace_period_days": grace_period_days,
    })))
}

/// Strict lookup unless the legacy monthly fallback is switched on.
pub(crate) fn resolve_frequency(
    state: &AppState,
    value: &str,
) -> AppResult<&'static PaymentFrequency> {
    if state.config.frequency_fallback_enabled {
        return Ok(get_payment_frequency_or_default(value));
    }
    Ok(get_payment_frequency(value)?)
}

/// The request's reference date, or today in the configured timezone.
pub(crate) fn reference_date(state: &AppState, raw: Option<&str>) -> AppResult<NaiveDate> {
    Ok(parse_date_opt(raw)?.unwrap_or_else(|| state.config.today()))
}

pub(crate) fn grace_period(state: &AppState, requested: Option<u32>) -> u32 {
    requested.unwrap_or(state.config.default_grace_period_days)
}
