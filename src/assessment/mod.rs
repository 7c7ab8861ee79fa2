//! Assessment Module - form-to-vector contract and the submission handler
//!
//! request → encode → classifier → outcome. Nothing here is persisted.

pub mod encoding;
pub mod layout;
pub mod outcome;
pub mod request;
pub mod vector;

use serde::Serialize;
use uuid::Uuid;

use crate::model::{ModelError, ModelHandle};

pub use encoding::{Categorical, Sex, SmokingHistory, YesNo};
pub use layout::{LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT};
pub use outcome::{Outcome, RiskLevel, HIGH_RISK_MESSAGE, LOW_RISK_MESSAGE};
pub use request::{AssessmentRequest, FormSubmission};
pub use vector::FeatureVector;

/// Any failure while encoding input or invoking the model
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("invalid category for {field}: {value:?}")]
    InvalidCategory { field: &'static str, value: String },

    #[error("invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result of a successful assessment
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub assessment_id: Uuid,
    pub risk: RiskLevel,
    pub label: i64,
    pub message: &'static str,
    pub features: FeatureVector,
}

/// Encode a request, run it through the model and classify the label.
pub fn assess(model: &ModelHandle, request: &AssessmentRequest) -> Result<Assessment, AssessmentError> {
    let assessment_id = Uuid::new_v4();
    let features = request.encode()?;

    tracing::debug!(
        %assessment_id,
        features = %features.to_log_entry(),
        "Encoded assessment request"
    );

    let label = model.predict_one(&features)?;
    let risk = RiskLevel::from_label(label)?;

    tracing::debug!(%assessment_id, label, ?risk, "Assessment complete");

    Ok(Assessment {
        assessment_id,
        risk,
        label,
        message: risk.message(),
        features,
    })
}

/// Run an assessment and collapse the result into a renderable outcome.
/// Errors never propagate past this point.
pub fn assess_outcome(model: &ModelHandle, request: &AssessmentRequest) -> Outcome {
    match assess(model, request) {
        Ok(assessment) => Outcome::Risk(assessment.risk),
        Err(e) => {
            tracing::warn!(error = %e, "Assessment failed");
            Outcome::from_error(&e)
        }
    }
}
