//! Double-submit CSRF check.
//!
//! A state-changing request passes when its `X-CSRFToken` header equals the
//! `csrftoken` cookie. A cross-site page can make the browser send the
//! cookie but cannot read it to fill in the header. Issuing the cookie is
//! left to the frontend.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header::COOKIE, HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use tower_sessions::cookie::Cookie;

pub const CSRF_COOKIE_NAME: &str = "csrftoken";
pub const CSRF_HEADER_NAME: &str = "x-csrftoken";
pub const CSRF_FAILURE: &str = "CSRF verification failed. Request aborted.";

pub async fn require_csrf(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.config.csrf_protection || is_safe(request.method()) {
        return Ok(next.run(request).await);
    }

    if token_matches(request.headers()) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(path = %request.uri().path(), "CSRF check failed");
        Err(AppError::Forbidden(CSRF_FAILURE.to_string()))
    }
}

fn is_safe(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

fn token_matches(headers: &HeaderMap) -> bool {
    let header = headers
        .get(CSRF_HEADER_NAME)
        .and_then(|value| value.to_str().ok());

    match (cookie_value(headers, CSRF_COOKIE_NAME), header) {
        (Some(cookie), Some(header)) => !cookie.is_empty() && cookie == header,
        _ => false,
    }
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookie: Option<&str>, token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = cookie {
            headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        if let Some(token) = token {
            headers.insert(CSRF_HEADER_NAME, HeaderValue::from_str(token).unwrap());
        }
        headers
    }

    #[test]
    fn finds_cookie_among_others() {
        let h = headers(Some("id=abc; csrftoken=tok123; theme=dark"), None);
        assert_eq!(cookie_value(&h, CSRF_COOKIE_NAME).as_deref(), Some("tok123"));
        assert_eq!(cookie_value(&h, "missing"), None);
    }

    #[test]
    fn header_must_equal_cookie() {
        assert!(token_matches(&headers(Some("csrftoken=tok"), Some("tok"))));
        assert!(!token_matches(&headers(Some("csrftoken=tok"), Some("other"))));
        assert!(!token_matches(&headers(Some("csrftoken=tok"), None)));
        assert!(!token_matches(&headers(None, Some("tok"))));
        assert!(!token_matches(&headers(Some("csrftoken="), Some(""))));
    }

    #[test]
    fn only_unsafe_methods_are_checked() {
        assert!(is_safe(&Method::GET));
        assert!(is_safe(&Method::HEAD));
        assert!(!is_safe(&Method::POST));
        assert!(!is_safe(&Method::DELETE));
    }
}
