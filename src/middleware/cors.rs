use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderName, HeaderValue, Method,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::middleware::request_id::REQUEST_ID_HEADER;

pub fn build_cors_layer(config: &AppConfig) -> CorsLayer {
    let headers = vec![
        ACCEPT,
        CONTENT_TYPE,
        HeaderName::from_static(REQUEST_ID_HEADER),
    ];

    // The engine is read-only: lookups are GET, computations are POST.
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(headers)
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]);

    if config
        .cors_origins
        .iter()
        .any(|origin| origin.trim() == "*")
    {
        layer.allow_origin(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse::<HeaderValue>().ok())
            .collect::<Vec<_>>();
        layer.allow_origin(origins)
    }
}
