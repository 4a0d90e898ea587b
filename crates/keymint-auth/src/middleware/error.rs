//! Error response handling.
//!
//! Collapses [`AuthError`] to the three boundary statuses with uniform
//! bodies. Every 401 carries the same body and a bare `WWW-Authenticate`
//! challenge: the response never distinguishes a wrong password from a
//! wrong token, an expired token, or an unrecognized grant.

use axum::{
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::error::AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            error!(error = %self, "Request failed with internal error");
        }

        let (status, body) = match &self {
            AuthError::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "Bad Request"),
            AuthError::Unauthorized { .. }
            | AuthError::InvalidToken { .. }
            | AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AuthError::Storage { .. }
            | AuthError::Configuration { .. }
            | AuthError::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        let mut headers = HeaderMap::new();
        if status == StatusCode::UNAUTHORIZED {
            headers.insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer realm=\"keymint\""),
            );
        }

        (status, headers, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_response() {
        let response = AuthError::invalid_request("missing field").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Bad Request");
    }

    #[tokio::test]
    async fn test_all_unauthorized_variants_share_one_body() {
        let errors = [
            AuthError::unauthorized("wrong password"),
            AuthError::invalid_token("bad signature"),
            AuthError::TokenExpired,
        ];

        for err in errors {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
                "Bearer realm=\"keymint\""
            );
            assert_eq!(body_text(response).await, "Unauthorized");
        }
    }

    #[tokio::test]
    async fn test_server_errors_hide_detail() {
        let response = AuthError::storage("connection refused to db:5432").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_text(response).await;
        assert_eq!(body, "Internal Server Error");
        assert!(!body.contains("5432"));
    }

    #[tokio::test]
    async fn test_no_challenge_on_non_401() {
        let response = AuthError::invalid_request("x").into_response();
        assert!(!response.headers().contains_key(header::WWW_AUTHENTICATE));
    }
}
