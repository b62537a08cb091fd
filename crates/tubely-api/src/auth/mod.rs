//! Request authentication
//!
//! The upload route authenticates inline rather than through a middleware layer:
//! the caller's identity is needed by the orchestrator, and the order of checks
//! (credentials before the video lookup) is part of the upload contract.

pub mod jwt;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use tubely_core::AppError;

pub use jwt::{AccessClaims, JwtVerifier, TokenVerifier};

/// Extract the bearer token from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::AuthHeaderMissing)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AppError::AuthHeaderMissing)?;

    if token.is_empty() {
        return Err(AppError::AuthHeaderMissing);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extracts_bearer_token() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header() {
        let err = extract_bearer_token(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AppError::AuthHeaderMissing));
    }

    #[test]
    fn test_wrong_scheme_and_empty_token() {
        for value in ["Basic dXNlcjpwYXNz", "Bearer ", "Bearer    ", "abc.def.ghi"] {
            let err = extract_bearer_token(&headers_with(value)).unwrap_err();
            assert!(matches!(err, AppError::AuthHeaderMissing), "{value}");
        }
    }
}
