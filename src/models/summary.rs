use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// A stored multi-agent AI summary for one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSummary {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
    pub summary: String,
    #[serde(rename = "agent_details", default, deserialize_with = "null_as_default")]
    pub details: AgentDetails,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Per-agent report text, keyed by the agent's role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentDetails {
    #[serde(default)]
    pub vitals: Option<String>,
    #[serde(default)]
    pub labs: Option<String>,
    #[serde(default)]
    pub risks: Option<String>,
}

impl AgentDetails {
    pub fn report(&self, role: AgentRole) -> Option<&str> {
        match role {
            AgentRole::Vitals => self.vitals.as_deref(),
            AgentRole::Labs => self.labs.as_deref(),
            AgentRole::Risks => self.risks.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentRole {
    Vitals,
    Labs,
    Risks,
}

impl AgentRole {
    pub const ALL: [AgentRole; 3] = [AgentRole::Vitals, AgentRole::Labs, AgentRole::Risks];

    pub fn specialty(self) -> &'static str {
        match self {
            AgentRole::Vitals => "Cardiology",
            AgentRole::Labs => "Pathology",
            AgentRole::Risks => "Genomics",
        }
    }

    pub fn report_title(self) -> &'static str {
        match self {
            AgentRole::Vitals => "Cardiologist's Report",
            AgentRole::Labs => "Pathologist's Report",
            AgentRole::Risks => "Geneticist's Risk Assessment",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            AgentRole::Vitals => "vitals",
            AgentRole::Labs => "labs",
            AgentRole::Risks => "risks",
        };
        f.write_str(key)
    }
}
