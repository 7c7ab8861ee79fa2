//! Outcome - what the form renders after a submission

use serde::{Deserialize, Serialize};

use super::AssessmentError;
use crate::model::ModelError;

pub const HIGH_RISK_MESSAGE: &str = "High Risk: Clinical indicators suggest potential diabetes risk";
pub const LOW_RISK_MESSAGE: &str = "Low Risk: No significant diabetes indicators detected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Low,
}

impl RiskLevel {
    /// Map a classifier label. Only 0 and 1 are labels the model was trained on.
    pub fn from_label(label: i64) -> Result<Self, ModelError> {
        match label {
            1 => Ok(RiskLevel::High),
            0 => Ok(RiskLevel::Low),
            other => Err(ModelError::UnrecognizedLabel(other)),
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RiskLevel::High => HIGH_RISK_MESSAGE,
            RiskLevel::Low => LOW_RISK_MESSAGE,
        }
    }
}

/// One of the three rendered states
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Risk(RiskLevel),
    Warning(String),
}

impl Outcome {
    pub fn from_error(err: &AssessmentError) -> Self {
        Outcome::Warning(format!("Error processing request: {}", err))
    }

    pub fn message(&self) -> &str {
        match self {
            Outcome::Risk(level) => level.message(),
            Outcome::Warning(msg) => msg,
        }
    }
}
