use crate::scoring::types::{BookingSnapshot, PriorityAssessment, PriorityInputs, PrioritySegment};
use crate::scoring::PriorityScorer;
use crate::service::error::ServiceError;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Either a full booking snapshot or the already-derived scorer inputs.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CalculatePriorityRequest {
    Snapshot(BookingSnapshot),
    Inputs(PriorityInputs),
}

impl CalculatePriorityRequest {
    pub fn into_inputs(self) -> Result<PriorityInputs, ServiceError> {
        let inputs = match self {
            Self::Snapshot(snapshot) => PriorityInputs::from_snapshot(&snapshot),
            Self::Inputs(inputs) => inputs,
        };
        if inputs.days_until_event < 0 {
            return Err(ServiceError::Validation("days_until_event must be >= 0".to_string()));
        }
        if inputs.party_size < 1 {
            return Err(ServiceError::Validation("party_size must be >= 1".to_string()));
        }
        Ok(inputs)
    }
}

#[derive(Debug, Serialize)]
pub struct PriorityView {
    pub strategy: &'static str,
    pub days_until_event: i64,
    #[serde(flatten)]
    pub assessment: PriorityAssessment,
}

#[derive(Debug, Serialize)]
pub struct RetrainView {
    pub version: u32,
    pub trained_on: usize,
    pub trained_at: DateTime<Utc>,
    pub cluster_segments: Vec<PrioritySegment>,
}

pub async fn calculate_priority(
    State(state): State<AppState>,
    Json(req): Json<CalculatePriorityRequest>,
) -> impl IntoResponse {
    let inputs = match req.into_inputs() {
        Ok(i) => i,
        Err(e) => return e.into_response(),
    };

    let scorer = &state.booking_service.scorer;
    match scorer.assess(&inputs).await {
        Ok(assessment) => (
            StatusCode::OK,
            Json(PriorityView {
                strategy: scorer.strategy(),
                days_until_event: inputs.days_until_event,
                assessment,
            }),
        )
            .into_response(),
        Err(e) => ServiceError::from(e).into_response(),
    }
}

pub async fn retrain_model(State(state): State<AppState>) -> impl IntoResponse {
    let PriorityScorer::Clustered(handle) = &state.booking_service.scorer else {
        return ServiceError::Conflict("rule-based scoring has no model to retrain".to_string()).into_response();
    };

    match handle.retrain().await {
        Ok(model) => {
            tracing::info!(trained_on = model.trained_on, "priority model retrained");
            (
                StatusCode::OK,
                Json(RetrainView {
                    version: model.version,
                    trained_on: model.trained_on,
                    trained_at: model.trained_at,
                    cluster_segments: model.cluster_segments.clone(),
                }),
            )
                .into_response()
        }
        Err(e) => ServiceError::from(e).into_response(),
    }
}
