use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    routes::schedule::{grace_period, reference_date},
    schemas::{validate_input, PaymentRecordInput, PaymentStatusInput},
    services::{
        payment_status::summarize_statuses,
        payments::{annotate, sort_by_due_date},
    },
    state::AppState,
};

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route(
        "/payments/status",
        axum::routing::post(classify_payments),
    )
}

/// Annotate caller-supplied payment rows with their effective status.
async fn classify_payments(
    State(state): State<AppState>,
    Json(payload): Json<PaymentStatusInput>,
) -> AppResult<Json<Value>> {
    validate_input(&payload)?;

    let reference = reference_date(&state, payload.reference_date.as_deref())?;
    let grace_period_days = grace_period(&state, payload.grace_period_days);

    let mut payments = payload
        .payments
        .into_iter()
        .map(PaymentRecordInput::into_payment)
        .collect::<Result<Vec<_>, _>>()?;
    sort_by_due_date(&mut payments);

    let summary = summarize_statuses(&payments, grace_period_days, reference);
    let rows = annotate(payments, grace_period_days, reference);

    Ok(Json(json!({
        "data": rows,
        "summary": summary,
        "reference_date": reference,
        "grace_period_days": grace_period_days,
    })))
}
