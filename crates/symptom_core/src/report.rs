//! Case report emitted once per prediction

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::serialization::pretty_json_string;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientCase {
    /// Raw input text, unmodified
    pub symptoms: String,
    pub predicted_disease: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRecommendation {
    pub specialist: String,
}

/// Input text, predicted disease and resolved specialist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    pub patient_case: PatientCase,
    pub doctor_recommendation: DoctorRecommendation,
}

impl CaseReport {
    pub fn new(
        symptoms: impl Into<String>,
        predicted_disease: impl Into<String>,
        specialist: impl Into<String>,
    ) -> Self {
        Self {
            patient_case: PatientCase {
                symptoms: symptoms.into(),
                predicted_disease: predicted_disease.into(),
            },
            doctor_recommendation: DoctorRecommendation {
                specialist: specialist.into(),
            },
        }
    }

    /// Indented JSON with `patient_case` first
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(pretty_json_string(self)?)
    }
}
