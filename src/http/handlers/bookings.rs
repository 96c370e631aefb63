use crate::domain::booking::{BookingListQuery, BookingStatusUpdate, CreateBookingRequest};
use crate::service::error::ServiceError;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

pub const CUSTOMER_ID_HEADER: &str = "X-Customer-Id";

/// The customer is resolved by the upstream auth layer and forwarded as a
/// header.
pub fn customer_id(headers: &HeaderMap) -> Result<i64, (StatusCode, Json<serde_json::Value>)> {
    headers
        .get(CUSTOMER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "error": {
                        "code": "UNAUTHENTICATED",
                        "message": format!("missing or invalid {CUSTOMER_ID_HEADER} header"),
                        "details": null
                    }
                })),
            )
        })
}

pub async fn create_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateBookingRequest>,
) -> impl IntoResponse {
    let customer_id = match customer_id(&headers) {
        Ok(id) => id,
        Err(rejection) => return rejection.into_response(),
    };

    match state.booking_service.create_booking(customer_id, req).await {
        Ok(booking) => (StatusCode::CREATED, Json(booking)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_my_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BookingListQuery>,
) -> impl IntoResponse {
    let customer_id = match customer_id(&headers) {
        Ok(id) => id,
        Err(rejection) => return rejection.into_response(),
    };
    list(&state, Some(customer_id), query).await
}

pub async fn list_all_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingListQuery>,
) -> impl IntoResponse {
    list(&state, None, query).await
}

async fn list(state: &AppState, customer_id: Option<i64>, query: BookingListQuery) -> axum::response::Response {
    let filter = match query.into_filter() {
        Ok(f) => f,
        Err(msg) => return ServiceError::Validation(msg).into_response(),
    };

    match state.booking_service.list_bookings(customer_id, &filter).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update_booking_status(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<BookingStatusUpdate>,
) -> impl IntoResponse {
    match state.booking_service.update_status(booking_id, &req.status).await {
        Ok(booking) => (StatusCode::OK, Json(booking)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn customer_header_must_be_a_positive_id() {
        let mut headers = HeaderMap::new();
        assert!(customer_id(&headers).is_err());

        headers.insert(CUSTOMER_ID_HEADER, HeaderValue::from_static("abc"));
        assert!(customer_id(&headers).is_err());

        headers.insert(CUSTOMER_ID_HEADER, HeaderValue::from_static("0"));
        assert!(customer_id(&headers).is_err());

        headers.insert(CUSTOMER_ID_HEADER, HeaderValue::from_static(" 42 "));
        assert_eq!(customer_id(&headers).unwrap(), 42);
    }
}
