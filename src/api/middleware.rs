//! Authentication Middleware
//!
//! Resolves the bearer token on protected routes into the id of the
//! already-authenticated caller.

use crate::models::UserContext;
use crate::service::JwtService;
use crate::utils::error::AppError;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Extension type for storing authenticated user context in request extensions
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserContext);

/// Authentication middleware that validates JWT tokens and extracts user context
///
/// Requests without a valid `Authorization: Bearer <token>` header are
/// answered with 401 before they reach a handler. On success the
/// [`AuthUser`] extension carries the caller's id.
pub async fn auth_middleware(
    State(jwt_service): State<Arc<JwtService>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| AppError::Authentication("Missing Authorization header".into()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Authentication("Invalid Authorization header format".into())
    })?;

    let user_context = jwt_service.validate_access_token(token).map_err(|e| {
        log::debug!("Rejected access token: {}", e);
        AppError::Authentication("Invalid or expired token".into())
    })?;

    request.extensions_mut().insert(AuthUser(user_context));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Extension, Router,
    };
    use tower::util::ServiceExt;

    fn create_test_jwt_service() -> Arc<JwtService> {
        Arc::new(JwtService::new("test_access_secret_key".to_string()))
    }

    async fn whoami(Extension(AuthUser(user)): Extension<AuthUser>) -> String {
        user.user_id.to_string()
    }

    fn app(jwt_service: Arc<JwtService>) -> Router {
        Router::new()
            .route("/test", get(whoami))
            .layer(from_fn_with_state(jwt_service, auth_middleware))
    }

    fn request_with_auth(value: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(Method::GET).uri("/test");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_auth_middleware_missing_header() {
        let response = app(create_test_jwt_service())
            .oneshot(request_with_auth(None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_middleware_invalid_format() {
        let response = app(create_test_jwt_service())
            .oneshot(request_with_auth(Some("Invalid token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_middleware_invalid_token() {
        let response = app(create_test_jwt_service())
            .oneshot(request_with_auth(Some("Bearer not.a.token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_middleware_valid_token() {
        let jwt_service = create_test_jwt_service();
        let token = jwt_service.issue_access_token(5).unwrap();

        let response = app(jwt_service)
            .oneshot(request_with_auth(Some(&format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"5");
    }
}
