//! Per-patient analysis bundle returned by `/patient/{id}/analysis`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::patient::Patient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPayload {
    pub patient: Patient,
    #[serde(default)]
    pub trends: Trends,
    #[serde(default)]
    pub predictions: Vec<RiskPrediction>,
    #[serde(default)]
    pub recent_clinical_notes: Vec<ClinicalNoteInsight>,
    #[serde(default)]
    pub history: History,
}

impl AnalysisPayload {
    /// An analysis with no clinical data, only demographics.
    pub fn empty(patient: Patient) -> Self {
        Self {
            patient,
            trends: Trends::default(),
            predictions: Vec::new(),
            recent_clinical_notes: Vec::new(),
            history: History::default(),
        }
    }

    /// The prediction with the highest severity; the first one wins ties.
    pub fn most_severe_risk(&self) -> Option<&RiskPrediction> {
        self.predictions
            .iter()
            .fold(None, |best: Option<&RiskPrediction>, candidate| match best {
                Some(current) if current.severity_rank() >= candidate.severity_rank() => Some(current),
                _ => Some(candidate),
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trends {
    #[serde(default)]
    pub blood_pressure: Option<Trend>,
    #[serde(default)]
    pub labs: BTreeMap<String, Trend>,
}

/// Current reading of a metric and its direction label ("Rising", "Falling", "Stable").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub status: String,
    pub current: String,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPrediction {
    pub condition: String,
    pub probability: String,
    pub reason: String,
    pub severity: String,
}

impl RiskPrediction {
    pub fn severity_rank(&self) -> u8 {
        match self.severity.to_ascii_lowercase().as_str() {
            "critical" => 4,
            "high" => 3,
            "medium" => 2,
            "low" => 1,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalNoteInsight {
    pub date: NaiveDate,
    #[serde(rename = "doctor", default)]
    pub author: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub sentiment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub vitals: Vec<VitalsEntry>,
    #[serde(default)]
    pub labs: Vec<LabEntry>,
}

impl History {
    /// Lab readings of one test type, in the order the backend sent them.
    pub fn lab_series<'a>(&'a self, test_type: &'a str) -> impl Iterator<Item = &'a LabEntry> + 'a {
        self.labs.iter().filter(move |entry| entry.test_type == test_type)
    }

    pub fn lab_types(&self) -> BTreeSet<&str> {
        self.labs.iter().map(|entry| entry.test_type.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsEntry {
    pub date: NaiveDateTime,
    #[serde(default)]
    pub systolic_bp: Option<f64>,
    #[serde(default)]
    pub diastolic_bp: Option<f64>,
    #[serde(default)]
    pub heart_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabEntry {
    pub date: NaiveDateTime,
    pub test_type: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}
