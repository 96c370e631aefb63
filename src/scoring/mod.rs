use thiserror::Error;

pub mod engine;
pub mod model;
pub mod model_handle;
pub mod model_store;
pub mod types;

use crate::scoring::model::PriorityModel;
use crate::scoring::model_handle::PriorityModelHandle;
use std::sync::Arc;
use crate::scoring::types::{PriorityAssessment, PriorityInputs};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("priority model unavailable: {0}")]
    ModelUnavailable(String),
}

/// The configured priority strategy. The clustered variant never falls
/// back to the rule model.
#[derive(Clone)]
pub enum PriorityScorer {
    Rules,
    Clustered(PriorityModelHandle),
}

impl PriorityScorer {
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Rules => "RULES",
            Self::Clustered(_) => "CLUSTERED",
        }
    }

    /// Resolves the model up front, loading or training it if needed.
    /// Call this before taking any row locks.
    pub async fn prepare(&self) -> Result<PreparedScorer, ScoringError> {
        match self {
            Self::Rules => Ok(PreparedScorer::Rules),
            Self::Clustered(handle) => Ok(PreparedScorer::Clustered(handle.current().await?)),
        }
    }

    pub async fn assess(&self, inputs: &PriorityInputs) -> Result<PriorityAssessment, ScoringError> {
        Ok(self.prepare().await?.assess(inputs))
    }
}

/// A scorer whose model is already in hand; scoring is synchronous.
#[derive(Debug, Clone)]
pub enum PreparedScorer {
    Rules,
    Clustered(Arc<PriorityModel>),
}

impl PreparedScorer {
    pub fn assess(&self, inputs: &PriorityInputs) -> PriorityAssessment {
        match self {
            Self::Rules => engine::calculate_priority(inputs),
            Self::Clustered(model) => model.assess(inputs),
        }
    }
}
