use super::{ApiError, ApiResult, AppState};
use crate::activity::ActivityService;
use crate::config::PaginationConfig;
use crate::database::models::{FavoriteItem, ListingItem, ListingStatus, ReviewItem, WishlistItem};
use crate::friends::{FriendItem, FriendService};
use crate::pagination::{PageRequest, PaginatedResult};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageParams {
    #[serde(default)]
    page: Option<i64>,
    #[serde(default)]
    page_size: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingParams {
    #[serde(default)]
    page: Option<i64>,
    #[serde(default)]
    page_size: Option<i64>,
    #[serde(default)]
    status: Option<ListingStatus>,
}

fn page_request(
    page: Option<i64>,
    page_size: Option<i64>,
    config: &PaginationConfig,
) -> Result<PageRequest, ApiError> {
    let page = page.unwrap_or(1);
    let page_size = page_size.unwrap_or(i64::from(config.default_page_size));
    Ok(PageRequest::new(page, page_size, config.max_page_size)?)
}

pub(crate) async fn list_listings(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Query(params): Query<ListingParams>,
) -> ApiResult<PaginatedResult<ListingItem>> {
    let request = page_request(params.page, params.page_size, &state.config.pagination)?;
    let service = ActivityService::new(state.database.clone());
    let page = service
        .get_my_listings(&profile_id, request, params.status)
        .await?;
    Ok(Json(page))
}

pub(crate) async fn list_reviews(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Query(params): Query<PageParams>,
) -> ApiResult<PaginatedResult<ReviewItem>> {
    let request = page_request(params.page, params.page_size, &state.config.pagination)?;
    let service = ActivityService::new(state.database.clone());
    Ok(Json(service.get_my_reviews(&profile_id, request).await?))
}

pub(crate) async fn list_favorites(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Query(params): Query<PageParams>,
) -> ApiResult<PaginatedResult<FavoriteItem>> {
    let request = page_request(params.page, params.page_size, &state.config.pagination)?;
    let service = ActivityService::new(state.database.clone());
    Ok(Json(service.get_my_favorites(&profile_id, request).await?))
}

pub(crate) async fn list_wishlist(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Query(params): Query<PageParams>,
) -> ApiResult<PaginatedResult<WishlistItem>> {
    let request = page_request(params.page, params.page_size, &state.config.pagination)?;
    let service = ActivityService::new(state.database.clone());
    Ok(Json(service.get_my_wishlist(&profile_id, request).await?))
}

pub(crate) async fn list_friends(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Query(params): Query<PageParams>,
) -> ApiResult<PaginatedResult<FriendItem>> {
    let request = page_request(params.page, params.page_size, &state.config.pagination)?;
    let service = FriendService::new(state.database.clone(), state.config.pagination);
    Ok(Json(service.get_my_friends(&profile_id, request).await?))
}
