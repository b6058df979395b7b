use axum::{
    extract::{Request, State},
    http::header::HOST,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, state::AppState};

/// Reject requests whose `Host` is not in `TRUSTED_HOSTS`.
pub async fn enforce_trusted_hosts(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.config.trusts_any_host() {
        return next.run(request).await;
    }

    let host = request
        .headers()
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map(strip_port)
        .unwrap_or_default()
        .to_ascii_lowercase();

    if is_trusted(&host, &state.config.trusted_hosts) {
        return next.run(request).await;
    }

    tracing::warn!(host = %host, "Rejected request for untrusted host");
    AppError::Forbidden("Forbidden: untrusted host.".to_string()).into_response()
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        // IPv6 literal, e.g. [::1]:8000
        return host.split(']').next().map_or(host, |inner| &inner[1..]);
    }
    host.rsplit_once(':').map_or(host, |(name, _)| name)
}

fn is_trusted(host: &str, trusted_hosts: &[String]) -> bool {
    if host.is_empty() {
        return false;
    }
    trusted_hosts.iter().any(|trusted| {
        let trusted = trusted.trim().to_ascii_lowercase();
        match trusted.strip_prefix("*.") {
            Some(suffix) => host.ends_with(&format!(".{suffix}")),
            None => host == trusted,
        }
    })
}
