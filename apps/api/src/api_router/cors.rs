use std::time::Duration;

use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use reelnet_core::AppError;
use tower_http::cors::CorsLayer;

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(600);

pub(super) fn build_cors_layer(frontend_url: &str) -> Result<CorsLayer, AppError> {
    Ok(CorsLayer::new()
        .allow_origin(frontend_origin(frontend_url)?)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .max_age(PREFLIGHT_MAX_AGE))
}

/// Browsers send `Origin` without a trailing slash.
fn frontend_origin(frontend_url: &str) -> Result<HeaderValue, AppError> {
    let origin = frontend_url.trim().trim_end_matches('/');
    if origin.is_empty() {
        return Err(AppError::Validation(
            "FRONTEND_URL must not be empty".to_owned(),
        ));
    }

    HeaderValue::from_str(origin)
        .map_err(|error| AppError::Validation(format!("invalid FRONTEND_URL: {error}")))
}

#[cfg(test)]
mod tests {
    use reelnet_core::AppError;

    use super::frontend_origin;

    #[test]
    fn trailing_slash_is_dropped_from_origin() {
        let origin = frontend_origin("https://crew.reelnet.example/");
        assert_eq!(
            origin.ok().as_ref().and_then(|value| value.to_str().ok()),
            Some("https://crew.reelnet.example")
        );
    }

    #[test]
    fn blank_frontend_url_is_rejected() {
        assert!(matches!(
            frontend_origin(" / "),
            Err(AppError::Validation(_))
        ));
    }
}
