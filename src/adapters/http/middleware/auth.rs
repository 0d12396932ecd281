//! Caller identity extraction.
//!
//! Session handling lives in front of this service; by the time a request
//! arrives here the gateway has resolved the caller and forwarded their id
//! in the `X-User-Id` header.
//!
//! ```ignore
//! async fn whoami(RequireUser(user_id): RequireUser) -> String {
//!     user_id.to_string()
//! }
//! ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ErrorResponse;
use crate::domain::foundation::UserId;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Extractor that requires an authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct RequireUser(pub UserId);

/// Rejection when the caller cannot be identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    /// Header absent.
    MissingIdentity,
    /// Header present but not a positive integer id.
    InvalidIdentity,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            AuthRejection::MissingIdentity => "Authentication is required",
            AuthRejection::InvalidIdentity => "Caller identity is malformed",
        };
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("AUTHENTICATION_REQUIRED", message)),
        )
            .into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(AuthRejection::MissingIdentity)?;

        raw.to_str()
            .ok()
            .and_then(|s| s.trim().parse::<UserId>().ok())
            .map(RequireUser)
            .ok_or(AuthRejection::InvalidIdentity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<RequireUser, AuthRejection> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        RequireUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn accepts_positive_id() {
        let RequireUser(user_id) = extract(Some("42")).await.unwrap();
        assert_eq!(user_id, UserId::new(42));
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        assert_eq!(extract(None).await.unwrap_err(), AuthRejection::MissingIdentity);
    }

    #[tokio::test]
    async fn non_numeric_or_non_positive_ids_are_rejected() {
        for value in ["abc", "0", "-3", ""] {
            assert_eq!(
                extract(Some(value)).await.unwrap_err(),
                AuthRejection::InvalidIdentity,
                "value {:?}",
                value
            );
        }
    }

    #[test]
    fn rejection_renders_unauthorized() {
        let response = AuthRejection::MissingIdentity.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
