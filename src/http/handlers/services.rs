use crate::domain::catalog::{CreatePackageRequest, CreateServiceTypeRequest, UpdateServicePriceRequest};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

pub async fn list_packages(State(state): State<AppState>) -> impl IntoResponse {
    match state.catalog_service.list_packages().await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create_package(
    State(state): State<AppState>,
    Json(req): Json<CreatePackageRequest>,
) -> impl IntoResponse {
    match state.catalog_service.create_package(req).await {
        Ok(package) => (StatusCode::CREATED, Json(package)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create_service_type(
    State(state): State<AppState>,
    Json(req): Json<CreateServiceTypeRequest>,
) -> impl IntoResponse {
    match state.catalog_service.create_service_type(req).await {
        Ok(service_type) => (StatusCode::CREATED, Json(service_type)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update_service_price(
    State(state): State<AppState>,
    Path(service_type_id): Path<i64>,
    Json(req): Json<UpdateServicePriceRequest>,
) -> impl IntoResponse {
    match state
        .booking_service
        .update_service_price(service_type_id, req.price)
        .await
    {
        Ok(service_type) => (StatusCode::OK, Json(service_type)).into_response(),
        Err(e) => e.into_response(),
    }
}
