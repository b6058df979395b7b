use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    schemas::FrequencyPath,
    services::payment_frequency::{get_payment_frequency, payment_frequencies},
    state::AppState,
};

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route(
            "/payment-frequencies",
            axum::routing::get(list_payment_frequencies),
        )
        .route(
            "/payment-frequencies/{value}",
            axum::routing::get(get_payment_frequency_by_value),
        )
}

async fn list_payment_frequencies(State(_state): State<AppState>) -> Json<Value> {
    Json(json!({ "data": payment_frequencies() }))
}

async fn get_payment_frequency_by_value(
    State(_state): State<AppState>,
    Path(path): Path<FrequencyPath>,
) -> AppResult<Json<Value>> {
    let frequency =
        get_payment_frequency(&path.value).map_err(|error| AppError::NotFound(error.to_string()))?;
    Ok(Json(json!({ "data": frequency })))
}
