//! Categorical encodings
//!
//! Every categorical input has an explicit label table. Lookups never
//! default: a label outside the table is an `InvalidCategory` error.

use serde::{Deserialize, Serialize};

use super::AssessmentError;

/// A categorical field with a fixed label → code table.
pub trait Categorical: Sized + Copy + 'static {
    /// Field name used in error messages
    const FIELD: &'static str;

    /// (label, variant, code) in display order
    const TABLE: &'static [(&'static str, Self, u8)];

    fn from_label(label: &str) -> Result<Self, AssessmentError> {
        Self::TABLE
            .iter()
            .find(|(l, _, _)| *l == label)
            .map(|(_, v, _)| *v)
            .ok_or_else(|| AssessmentError::InvalidCategory {
                field: Self::FIELD,
                value: label.to_string(),
            })
    }

    /// Labels in display order, for rendering choices
    fn labels() -> impl Iterator<Item = &'static str> {
        Self::TABLE.iter().map(|(l, _, _)| *l)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn code(self) -> u8 {
        match self {
            Sex::Male => 1,
            Sex::Female => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

impl Categorical for Sex {
    const FIELD: &'static str = "sex";
    const TABLE: &'static [(&'static str, Self, u8)] = &[
        ("Male", Sex::Male, 1),
        ("Female", Sex::Female, 0),
    ];
}

/// Yes/No answer (hypertension, heart disease)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    No,
    Yes,
}

impl YesNo {
    pub fn code(self) -> u8 {
        match self {
            YesNo::Yes => 1,
            YesNo::No => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }

    /// Parse a Yes/No label, reporting `field` on failure
    pub fn parse_for(field: &'static str, label: &str) -> Result<Self, AssessmentError> {
        Self::from_label(label).map_err(|_| AssessmentError::InvalidCategory {
            field,
            value: label.to_string(),
        })
    }
}

impl Categorical for YesNo {
    const FIELD: &'static str = "yes/no";
    const TABLE: &'static [(&'static str, Self, u8)] = &[
        ("No", YesNo::No, 0),
        ("Yes", YesNo::Yes, 1),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmokingHistory {
    NeverSmoked,
    FormerSmoker,
    NotCurrentSmoker,
    CurrentSmoker,
    NoInformation,
}

impl SmokingHistory {
    pub fn code(self) -> u8 {
        match self {
            SmokingHistory::NeverSmoked => 4,
            SmokingHistory::FormerSmoker => 3,
            SmokingHistory::NotCurrentSmoker => 2,
            SmokingHistory::CurrentSmoker => 1,
            SmokingHistory::NoInformation => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SmokingHistory::NeverSmoked => "Never smoked",
            SmokingHistory::FormerSmoker => "Former smoker",
            SmokingHistory::NotCurrentSmoker => "Not current smoker",
            SmokingHistory::CurrentSmoker => "Current smoker",
            SmokingHistory::NoInformation => "No information",
        }
    }
}

impl Categorical for SmokingHistory {
    const FIELD: &'static str = "smoking_history";
    const TABLE: &'static [(&'static str, Self, u8)] = &[
        ("Never smoked", SmokingHistory::NeverSmoked, 4),
        ("Former smoker", SmokingHistory::FormerSmoker, 3),
        ("Not current smoker", SmokingHistory::NotCurrentSmoker, 2),
        ("Current smoker", SmokingHistory::CurrentSmoker, 1),
        ("No information", SmokingHistory::NoInformation, 0),
    ];
}
