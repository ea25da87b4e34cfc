//! HTTP Request Handlers
//!
//! Axum handlers for processing HTTP requests and responses.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;

use super::middleware::AuthUser;
use crate::{
    models::{
        requests::{HealthCheckResponse, UserModificationData, UserRegistrationData},
        user::UserResultData,
    },
    service::UserService,
    utils::error::AppResult,
    VERSION,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
}

/// Standard success response wrapper
#[derive(Debug, serde::Serialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Register a new user
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<UserRegistrationData>,
) -> AppResult<(StatusCode, Json<SuccessResponse<UserResultData>>)> {
    let user = state.user_service.register_user(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::new(user.into())),
    ))
}

/// Update the authenticated user's name and password
pub async fn update_user(
    State(state): State<AppState>,
    Extension(AuthUser(auth_user)): Extension<AuthUser>,
    Path(user_id): Path<i64>,
    Json(request): Json<UserModificationData>,
) -> AppResult<Json<SuccessResponse<UserResultData>>> {
    let user = state
        .user_service
        .update_user(auth_user.user_id, user_id, request)
        .await?;

    Ok(Json(SuccessResponse::new(user.into())))
}

/// Soft-delete the authenticated user
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(AuthUser(auth_user)): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<SuccessResponse<UserResultData>>> {
    let user = state
        .user_service
        .delete_user(auth_user.user_id, user_id)
        .await?;

    Ok(Json(SuccessResponse::new(user.into())))
}

/// Health check endpoint
pub async fn health_check(
    State(state): State<AppState>,
) -> AppResult<Json<SuccessResponse<HealthCheckResponse>>> {
    state.user_service.health_check().await?;

    let response = HealthCheckResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: VERSION.to_string(),
    };

    Ok(Json(SuccessResponse::new(response)))
}
