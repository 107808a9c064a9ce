use super::{ApiError, ApiResult, AppState};
use crate::database::models::ProfileRecord;
use crate::profiles::{ProfileService, UpdateProfileInput};
use crate::session::{SessionIdentity, SessionService};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct EmailParams {
    email: String,
}

pub(crate) async fn get_profile_by_email(
    State(state): State<AppState>,
    Query(params): Query<EmailParams>,
) -> ApiResult<Option<ProfileRecord>> {
    let service = ProfileService::new(state.database.clone());
    let profile = service.get_profile_by_email(&params.email).await?;
    Ok(Json(profile))
}

pub(crate) async fn get_profile_by_user_id(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Option<ProfileRecord>> {
    let service = ProfileService::new(state.database.clone());
    let profile = service.get_profile_by_user_id(&user_id).await?;
    Ok(Json(profile))
}

pub(crate) async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ProfileRecord> {
    let service = ProfileService::new(state.database.clone());
    match service.get_profile(&id).await? {
        Some(profile) => Ok(Json(profile)),
        None => Err(ApiError::NotFound(format!("profile {id} not found"))),
    }
}

pub(crate) async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateProfileInput>,
) -> ApiResult<ProfileRecord> {
    let service = ProfileService::new(state.database.clone());
    let profile = service.update_profile(&id, input).await?;
    Ok(Json(profile))
}

pub(crate) async fn ensure_session_profile(
    State(state): State<AppState>,
    Json(identity): Json<SessionIdentity>,
) -> ApiResult<ProfileRecord> {
    let service = SessionService::new(state.database.clone());
    let profile = service.ensure_profile(&identity).await?;
    Ok(Json(profile))
}
