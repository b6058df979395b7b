use axum::{routing::get, Router};

use crate::state::AppState;

pub mod frequencies;
pub mod health;
pub mod payments;
pub mod schedule;

pub fn v1_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .merge(frequencies::router())
        .merge(schedule::router())
        .merge(payments::router())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::v1_router;
    use crate::{config::AppConfig, state::AppState};

    fn app_with(config: AppConfig) -> Router {
        v1_router().with_state(AppState::build(config))
    }

    fn app() -> Router {
        app_with(AppConfig::default())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn health_reports_timezone() {
        let (status, body) = send(app(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["timezone"], "UTC");
    }

    #[tokio::test]
    async fn lists_and_looks_up_frequencies() {
        let (status, body) = send(app(), get("/payment-frequencies")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(7));

        let (status, body) = send(app(), get("/payment-frequencies/biweekly")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["period_unit"], "weeks");
        assert_eq!(body["data"]["period_amount"], 2);

        let (status, body) = send(app(), get("/payment-frequencies/fortnightly")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Unknown payment frequency 'fortnightly'.");
    }

    #[tokio::test]
    async fn computes_next_due_date() {
        let (status, body) = send(
            app(),
            get("/schedule/next-due-date?payment_start_date=2024-01-01&frequency=monthly&payment_day=15&reference_date=2024-04-20"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["next_due_date"], "2024-05-15");
        assert_eq!(body["data"]["reference_date"], "2024-04-20");
        assert_eq!(body["data"]["frequency"], "monthly");
    }

    #[tokio::test]
    async fn unknown_frequency_is_rejected_unless_fallback_enabled() {
        let uri = "/schedule/next-due-date?payment_start_date=2024-01-01&frequency=fortnightly&reference_date=2024-04-20";

        let (status, body) = send(app(), get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Unknown payment frequency 'fortnightly'.");

        let lenient = AppConfig {
            frequency_fallback_enabled: true,
            ..AppConfig::default()
        };
        let (status, body) = send(app_with(lenient), get(uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["next_due_date"], "2024-05-01");
        assert_eq!(body["data"]["frequency"], "monthly");
    }

    #[tokio::test]
    async fn rejects_malformed_dates() {
        let (status, body) = send(
            app(),
            get("/schedule/next-due-date?payment_start_date=01/01/2024&frequency=monthly"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"]
            .as_str()
            .is_some_and(|detail| detail.starts_with("Invalid date '01/01/2024'")));
    }

    #[tokio::test]
    async fn computes_period_end() {
        let (status, body) = send(
            app(),
            get("/schedule/period-end?start_date=2024-02-10&frequency=monthly"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["period_end"], "2024-02-29");
        assert_eq!(body["data"]["frequency"]["value"], "monthly");
    }

    #[tokio::test]
    async fn generates_annotated_schedule() {
        let (status, body) = send(
            app(),
            post(
                "/schedule/generate",
                json!({
                    "lease_id": "lease-42",
                    "payment_start_date": "2024-01-01",
                    "frequency": "monthly",
                    "payment_day": 10,
                    "end_date": "2024-04-30",
                    "amount": 1500.0,
                    "reference_date": "2024-02-20"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let rows = body["data"].as_array().expect("rows");
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["due_date"], "2024-01-10");
        assert_eq!(rows[0]["period_end"], "2024-01-31");
        assert_eq!(rows[0]["effective_status"], "late");
        assert_eq!(rows[1]["effective_status"], "late");
        assert_eq!(rows[2]["effective_status"], "pending");
        assert_eq!(rows[3]["lease_id"], "lease-42");
        assert_eq!(rows[3]["payment_type"], "rent");

        assert_eq!(body["summary"]["late"], 2);
        assert_eq!(body["summary"]["late_amount"], 3000.0);
        assert_eq!(body["summary"]["outstanding_amount"], 6000.0);
        assert_eq!(body["grace_period_days"], 5);
    }

    #[tokio::test]
    async fn generate_requires_a_window() {
        let (status, _) = send(
            app(),
            post(
                "/schedule/generate",
                json!({
                    "payment_start_date": "2024-01-01",
                    "frequency": "weekly",
                    "amount": 100.0
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            app(),
            post(
                "/schedule/generate",
                json!({
                    "payment_start_date": "2024-01-01",
                    "frequency": "weekly",
                    "periods": 0,
                    "amount": 100.0
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn classifies_and_sorts_payments() {
        let (status, body) = send(
            app(),
            post(
                "/payments/status",
                json!({
                    "reference_date": "2024-02-02",
                    "payments": [
                        { "id": "no-due-date", "amount": 10.0 },
                        { "id": "paid-late", "due_date": "2024-01-10", "payment_date": "2024-02-01", "amount": 100.0 },
                        { "id": "advanced", "due_date": "2024-01-20", "payment_date": "2024-01-05", "amount": 100.0 },
                        { "id": "late", "due_date": "2024-01-01", "amount": 100.0 },
                        { "id": "pending", "due_date": "2024-02-01", "amount": 100.0, "payment_type": "deposit" }
                    ]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let rows = body["data"].as_array().expect("rows");
        let ids: Vec<_> = rows.iter().map(|row| row["id"].clone()).collect();
        assert_eq!(
            ids,
            vec![
                json!("late"),
                json!("paid-late"),
                json!("advanced"),
                json!("pending"),
                json!("no-due-date")
            ]
        );
        let statuses: Vec<_> = rows
            .iter()
            .map(|row| row["effective_status"].clone())
            .collect();
        assert_eq!(
            statuses,
            vec![
                json!("late"),
                json!("paid"),
                json!("advanced"),
                json!("pending"),
                json!("undefined")
            ]
        );
        assert_eq!(rows[3]["payment_type"], "deposit");
        assert_eq!(body["summary"]["total"], 5);
        assert_eq!(body["summary"]["outstanding_amount"], 200.0);
    }

    #[tokio::test]
    async fn rejects_malformed_payment_dates() {
        let (status, body) = send(
            app(),
            post(
                "/payments/status",
                json!({ "payments": [{ "due_date": "2024-13-01" }] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().is_some_and(|d| d.contains("2024-13-01")));
    }
}
