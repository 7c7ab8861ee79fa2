//! Assessment Request - raw form input for one submission

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::encoding::{Categorical, Sex, SmokingHistory, YesNo};
use super::vector::FeatureVector;
use super::AssessmentError;

/// Input ranges, shared by server-side validation and the rendered widgets
pub mod limits {
    pub const AGE: (i64, i64) = (18, 120);
    pub const BMI: (f64, f64) = (10.0, 50.0);
    pub const HBA1C: (f64, f64) = (3.0, 15.0);
    pub const GLUCOSE: (i64, i64) = (50, 300);
}

/// Eight raw field values as submitted.
///
/// Categorical fields stay as labels until `encode` so an unknown label
/// surfaces as `InvalidCategory` instead of a generic body rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AssessmentRequest {
    #[validate(range(min = 18, max = 120, message = "age must be between 18 and 120"))]
    pub age: i64,

    pub sex: String,

    #[validate(range(min = 10.0, max = 50.0, message = "BMI must be between 10.0 and 50.0"))]
    pub bmi: f64,

    pub hypertension: String,

    pub heart_disease: String,

    #[serde(alias = "smoking")]
    pub smoking_history: String,

    #[validate(range(min = 3.0, max = 15.0, message = "HbA1c must be between 3.0 and 15.0"))]
    pub hba1c: f64,

    #[validate(range(min = 50, max = 300, message = "glucose must be between 50 and 300 mg/dL"))]
    pub glucose: i64,
}

impl Default for AssessmentRequest {
    /// Initial form state: numeric minimums, first option of each choice
    fn default() -> Self {
        Self {
            age: limits::AGE.0,
            sex: Sex::Male.label().to_string(),
            bmi: limits::BMI.0,
            hypertension: YesNo::No.label().to_string(),
            heart_disease: YesNo::No.label().to_string(),
            smoking_history: SmokingHistory::NeverSmoked.label().to_string(),
            hba1c: limits::HBA1C.0,
            glucose: limits::GLUCOSE.0,
        }
    }
}

impl AssessmentRequest {
    /// Validate and encode into the fixed-order feature vector.
    ///
    /// Numeric fields pass through unchanged; any scaling lives in the model.
    pub fn encode(&self) -> Result<FeatureVector, AssessmentError> {
        self.validate()
            .map_err(|e| AssessmentError::Validation(e.to_string()))?;

        // NaN slips past range checks
        for (field, value) in [("bmi", self.bmi), ("hba1c", self.hba1c)] {
            if !value.is_finite() {
                return Err(AssessmentError::Validation(format!("{} must be a finite number", field)));
            }
        }

        let sex = Sex::from_label(&self.sex)?;
        let hypertension = YesNo::parse_for("hypertension", &self.hypertension)?;
        let heart_disease = YesNo::parse_for("heart_disease", &self.heart_disease)?;
        let smoking = SmokingHistory::from_label(&self.smoking_history)?;

        Ok(FeatureVector::from_values([
            self.age as f64,
            f64::from(sex.code()),
            self.bmi,
            f64::from(hypertension.code()),
            f64::from(heart_disease.code()),
            f64::from(smoking.code()),
            self.hba1c,
            self.glucose as f64,
        ]))
    }
}

/// Form fields as text, exactly as the browser sent them.
///
/// The page is re-rendered from this, so a value that fails to parse is
/// shown back unchanged instead of being replaced by a default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormSubmission {
    pub age: String,
    pub sex: String,
    pub bmi: String,
    pub hypertension: String,
    pub heart_disease: String,
    #[serde(alias = "smoking")]
    pub smoking_history: String,
    pub hba1c: String,
    pub glucose: String,
}

impl FormSubmission {
    /// Parse the numeric fields. Range and category checks happen in `encode`.
    pub fn parse(&self) -> Result<AssessmentRequest, AssessmentError> {
        Ok(AssessmentRequest {
            age: parse_field("age", &self.age)?,
            sex: self.sex.clone(),
            bmi: parse_field("bmi", &self.bmi)?,
            hypertension: self.hypertension.clone(),
            heart_disease: self.heart_disease.clone(),
            smoking_history: self.smoking_history.clone(),
            hba1c: parse_field("hba1c", &self.hba1c)?,
            glucose: parse_field("glucose", &self.glucose)?,
        })
    }
}

impl From<&AssessmentRequest> for FormSubmission {
    fn from(req: &AssessmentRequest) -> Self {
        Self {
            age: req.age.to_string(),
            sex: req.sex.clone(),
            // `{:?}` keeps the shortest exact form and always shows a decimal point
            bmi: format!("{:?}", req.bmi),
            hypertension: req.hypertension.clone(),
            heart_disease: req.heart_disease.clone(),
            smoking_history: req.smoking_history.clone(),
            hba1c: format!("{:?}", req.hba1c),
            glucose: req.glucose.to_string(),
        }
    }
}

fn parse_field<T: FromStr>(field: &str, raw: &str) -> Result<T, AssessmentError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AssessmentError::Validation(format!("{} is required", field)));
    }
    raw.parse()
        .map_err(|_| AssessmentError::Validation(format!("{} must be a number, got {:?}", field, raw)))
}
