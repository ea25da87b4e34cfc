//! API Route Definitions
//!
//! HTTP routes for the user use cases, assembled with a builder so that a
//! deployment can expose only the endpoints it needs. Update and delete sit
//! behind the bearer-token middleware and are mounted only when a
//! [`JwtService`] has been supplied.

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, MethodRouter},
    Router,
};

use super::handlers::*;
use super::middleware::auth_middleware;
use crate::service::JwtService;

/// Builder for creating API routes with configurable endpoints
#[derive(Default)]
pub struct RouterBuilder {
    /// Whether to enable the health check endpoint (GET /health)
    health_check: bool,
    /// Whether to enable registration (POST /users)
    register_user: bool,
    /// Whether to enable self-service update (PATCH /users/{id})
    update_user: bool,
    /// Whether to enable soft deletion (DELETE /users/{id})
    delete_user: bool,
    /// Token validator for the protected routes
    jwt_service: Option<Arc<JwtService>>,
}

impl RouterBuilder {
    /// Creates a new router builder with all routes disabled by default
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a router builder with every route enabled
    ///
    /// The protected routes still need `with_auth` before they are mounted.
    pub fn with_all_routes() -> Self {
        Self {
            health_check: true,
            register_user: true,
            update_user: true,
            delete_user: true,
            jwt_service: None,
        }
    }

    /// Creates a router with only the health check, for monitoring
    pub fn with_minimal_routes() -> Self {
        Self {
            health_check: true,
            ..Self::default()
        }
    }

    /// Enables or disables the health check endpoint (GET /health)
    pub fn health_check(mut self, enabled: bool) -> Self {
        self.health_check = enabled;
        self
    }

    /// Enables or disables the registration endpoint (POST /users)
    pub fn register_user(mut self, enabled: bool) -> Self {
        self.register_user = enabled;
        self
    }

    /// Enables or disables the update endpoint (PATCH /users/{id})
    pub fn update_user(mut self, enabled: bool) -> Self {
        self.update_user = enabled;
        self
    }

    /// Enables or disables the delete endpoint (DELETE /users/{id})
    pub fn delete_user(mut self, enabled: bool) -> Self {
        self.delete_user = enabled;
        self
    }

    /// Sets the token validator used by the protected routes
    pub fn with_auth(mut self, jwt_service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(jwt_service);
        self
    }

    /// Builds the Axum router with the configured routes
    pub fn build(self) -> Router<AppState> {
        let mut router = Router::new();

        if self.health_check {
            router = router.route("/health", get(health_check));
        }

        if self.register_user {
            router = router.route("/users", post(register_user));
        }

        let mut member: Option<MethodRouter<AppState>> = None;

        if self.update_user {
            member = Some(patch(update_user));
        }

        if self.delete_user {
            member = Some(match member {
                Some(methods) => methods.delete(delete_user),
                None => delete(delete_user),
            });
        }

        if let Some(methods) = member {
            match self.jwt_service {
                Some(jwt_service) => {
                    let protected = Router::new()
                        .route("/users/{id}", methods)
                        .route_layer(from_fn_with_state(jwt_service, auth_middleware));
                    router = router.merge(protected);
                }
                None => {
                    log::warn!("No token validator configured, update and delete routes are not mounted");
                }
            }
        }

        router
    }
}

/// Creates all API routes protected by the given token validator
pub fn create_routes(jwt_service: Arc<JwtService>) -> Router<AppState> {
    RouterBuilder::with_all_routes()
        .with_auth(jwt_service)
        .build()
}
