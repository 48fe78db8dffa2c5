//! Security headers middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;

/// Security header names set on every response.
pub mod headers {
    pub const X_CONTENT_TYPE_OPTIONS: &str = "x-content-type-options";
    pub const X_FRAME_OPTIONS: &str = "x-frame-options";
    pub const REFERRER_POLICY: &str = "referrer-policy";
}

const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";

/// Adds `nosniff`, frame denial and a referrer policy to every response.
///
/// `Strict-Transport-Security` is only sent when `security.hsts_enabled` is
/// set (`SALON__SECURITY__HSTS_ENABLED=true`), i.e. behind TLS termination.
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    apply_security_headers(&mut response, state.config.security.hsts_enabled);
    response
}

fn apply_security_headers(response: &mut Response, hsts_enabled: bool) {
    let headers = response.headers_mut();

    headers.insert(
        header::HeaderName::from_static(headers::X_CONTENT_TYPE_OPTIONS),
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::HeaderName::from_static(headers::X_FRAME_OPTIONS),
        HeaderValue::from_static("DENY"),
    );
    headers.insert(
        header::HeaderName::from_static(headers::REFERRER_POLICY),
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if hsts_enabled {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS_VALUE),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_without_hsts() {
        let mut response = Response::new(Body::empty());
        apply_security_headers(&mut response, false);

        let h = response.headers();
        assert_eq!(h.get(headers::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
        assert_eq!(h.get(headers::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(
            h.get(headers::REFERRER_POLICY).unwrap(),
            "strict-origin-when-cross-origin"
        );
        assert!(h.get(header::STRICT_TRANSPORT_SECURITY).is_none());
    }

    #[test]
    fn test_hsts_when_enabled() {
        let mut response = Response::new(Body::empty());
        apply_security_headers(&mut response, true);

        assert_eq!(
            response
                .headers()
                .get(header::STRICT_TRANSPORT_SECURITY)
                .unwrap(),
            HSTS_VALUE
        );
    }
}
