use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use std::sync::Arc;

use super::validation::validate_page;
use super::{ApiError, ApiResponse, AppState, ShowsQuery};
use crate::domain::ShowId;
use crate::models::show::{Page, ShowDetail, TagRef, YearRange};
use crate::services::CatalogError;

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => Self::not_found("Show", id),
            CatalogError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// Lists shows matching the query filters, one page at a time.
///
/// # Endpoint
/// `GET /api/shows`
pub async fn list_shows(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ShowsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Page<ShowDetail>>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::validation(e.body_text()))?;

    let page = validate_page(
        query.page,
        query.per_page,
        state.config().catalog.default_per_page,
    )?;

    let result = state
        .catalog_service()
        .search(&query.criteria(), page)
        .await?;

    Ok(Json(ApiResponse::success(result)))
}

/// `GET /api/shows/{id}`
pub async fn get_show(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<ShowDetail>>, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::validation(e.body_text()))?;

    let show = state.catalog_service().get_by_id(ShowId::new(id)).await?;

    Ok(Json(ApiResponse::success(show)))
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TagRef>>>, ApiError> {
    let categories = state.catalog_service().list_categories().await?;
    Ok(Json(ApiResponse::success(categories)))
}

pub async fn list_ratings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TagRef>>>, ApiError> {
    let ratings = state.catalog_service().list_ratings().await?;
    Ok(Json(ApiResponse::success(ratings)))
}

pub async fn list_types(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let types = state.catalog_service().list_types().await?;
    Ok(Json(ApiResponse::success(types)))
}

pub async fn list_countries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let countries = state.catalog_service().list_countries().await?;
    Ok(Json(ApiResponse::success(countries)))
}

pub async fn year_range(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<YearRange>>, ApiError> {
    let range = state.catalog_service().year_range().await?;
    Ok(Json(ApiResponse::success(range)))
}
