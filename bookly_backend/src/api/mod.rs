mod activity;
mod profiles;

use crate::config::BooklyConfig;
use crate::database::Database;
use crate::pagination::PaginationError;
use crate::profiles::ProfileError;
use crate::session::SessionError;
use anyhow::{Context, Result};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: BooklyConfig,
    pub database: Database,
}

pub(crate) type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(anyhow::Error),
}

impl ApiError {
    fn into_response_parts(self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse { message: msg }),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse { message: msg }),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, ErrorResponse { message: msg }),
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        message: "internal server error".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.into_response_parts();
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(pagination) = err.downcast_ref::<PaginationError>() {
            return ApiError::BadRequest(pagination.to_string());
        }
        match err.downcast_ref::<SessionError>() {
            Some(SessionError::IncompleteIdentity) => return ApiError::BadRequest(err.to_string()),
            Some(SessionError::EmailClaimed(_)) => return ApiError::Conflict(err.to_string()),
            None => {}
        }
        match err.downcast_ref::<ProfileError>() {
            Some(ProfileError::NotFound(_)) => ApiError::NotFound(err.to_string()),
            Some(ProfileError::NameRequired) => ApiError::BadRequest(err.to_string()),
            None => ApiError::Internal(err),
        }
    }
}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
}

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    version: &'static str,
    api_port: u16,
}

pub(crate) async fn health_handler(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        api_port: state.config.api_port,
    })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/session/profile", post(profiles::ensure_session_profile))
        .route("/profiles/by-email", get(profiles::get_profile_by_email))
        .route("/profiles/by-user/:user_id", get(profiles::get_profile_by_user_id))
        .route(
            "/profiles/:id",
            get(profiles::get_profile).patch(profiles::update_profile),
        )
        .route("/profiles/:id/listings", get(activity::list_listings))
        .route("/profiles/:id/reviews", get(activity::list_reviews))
        .route("/profiles/:id/favorites", get(activity::list_favorites))
        .route("/profiles/:id/wishlist", get(activity::list_wishlist))
        .route("/profiles/:id/friends", get(activity::list_friends))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn serve_http(config: BooklyConfig, database: Database) -> Result<()> {
    let addr = SocketAddr::new(config.api_host, config.api_port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {addr}"))?;

    let state = AppState { config, database };
    tracing::info!(?addr, "HTTP server listening");
    axum::serve(listener, router(state).into_make_service()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_errors_map_to_client_statuses() {
        let cases = [
            (anyhow::Error::from(PaginationError::InvalidPage(0)), StatusCode::BAD_REQUEST),
            (ProfileError::NotFound("p1".into()).into(), StatusCode::NOT_FOUND),
            (ProfileError::NameRequired.into(), StatusCode::BAD_REQUEST),
            (SessionError::IncompleteIdentity.into(), StatusCode::BAD_REQUEST),
            (SessionError::EmailClaimed("a@x.com".into()).into(), StatusCode::CONFLICT),
            (anyhow::anyhow!("disk I/O error"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let (status, _) = ApiError::from(err).into_response_parts();
            assert_eq!(status, expected);
        }
    }
}
