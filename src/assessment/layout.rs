//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the model input schema**
//!
//! The classifier was trained on features in exactly this order. Reordering
//! does not raise anything at inference time, it just corrupts predictions.
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    "age",                   // 0: years, as-is
    "sex",                   // 1: Male=1, Female=0
    "bmi",                   // 2: as-is
    "hypertension",          // 3: Yes=1, No=0
    "heart_disease",         // 4: Yes=1, No=0
    "smoking_history",       // 5: 0..=4, see SmokingHistory
    "hba1c",                 // 6: %, as-is
    "glucose",               // 7: mg/dL, as-is
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 8;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
pub fn layout_hash() -> u32 {
    hash_names(FEATURE_VERSION, FEATURE_LAYOUT.iter().copied())
}

/// Hash an arbitrary ordered list of feature names the same way as the layout.
pub fn hash_names<'a>(version: u8, names: impl IntoIterator<Item = &'a str>) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[version]);

    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for the model status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Feature names declared by a model artifact don't match the layout
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("feature layout mismatch: expected hash {expected_hash:08x}, artifact declares {actual_hash:08x} ({actual_names:?})")]
pub struct LayoutMismatchError {
    pub expected_hash: u32,
    pub actual_hash: u32,
    pub actual_names: Vec<String>,
}

/// Check a model's declared feature names against the layout
pub fn validate_names(names: &[String]) -> Result<(), LayoutMismatchError> {
    let actual_hash = hash_names(FEATURE_VERSION, names.iter().map(String::as_str));
    let expected_hash = layout_hash();

    if actual_hash != expected_hash {
        return Err(LayoutMismatchError {
            expected_hash,
            actual_hash,
            actual_names: names.to_vec(),
        });
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
