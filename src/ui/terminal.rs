//! Plain-text rendering of the dashboard views.

use crate::core::{AgentState, InsightView, InsightsSnapshot, LoadState, SessionSnapshot, UploadEntry, UploadStatus};
use crate::models::{AgentRole, AnalysisPayload, History, Patient, Trend};
use crate::utils::format_file_size;

pub fn render_patient_card(patient: &Patient) -> String {
    let mut lines = vec![format!("{} (#{})", patient.name, patient.id)];
    let mut demographics = Vec::new();
    if let Some(age) = patient.age {
        demographics.push(format!("{} years", age));
    }
    if let Some(gender) = &patient.gender {
        demographics.push(gender.clone());
    }
    if !demographics.is_empty() {
        lines.push(format!("  {}", demographics.join(", ")));
    }
    if let Some(contact) = patient.contact_info.as_deref().filter(|c| !c.is_empty()) {
        lines.push(format!("  Contact: {}", contact));
    }
    if let Some(address) = patient.address.as_deref().filter(|a| !a.is_empty()) {
        lines.push(format!("  Address: {}", address));
    }
    lines.join("\n")
}

fn trend_line(name: &str, trend: &Trend) -> String {
    let mut line = format!("  {:<16} {:<14} {}", name, trend.current, trend.status);
    if let Some(previous) = &trend.previous {
        line.push_str(&format!(" (was {})", previous));
    }
    if let Some(flag) = trend.flag.as_deref().filter(|f| !f.is_empty()) {
        line.push_str(&format!(" [{}]", flag));
    }
    line
}

pub fn render_analysis(analysis: &AnalysisPayload) -> String {
    let mut lines = vec![render_patient_card(&analysis.patient), String::new(), "Health trends".to_string()];

    if let Some(bp) = &analysis.trends.blood_pressure {
        lines.push(trend_line("Blood pressure", bp));
    }
    for (test, trend) in &analysis.trends.labs {
        lines.push(trend_line(test, trend));
    }
    if analysis.trends.blood_pressure.is_none() && analysis.trends.labs.is_empty() {
        lines.push("  No trend data available".to_string());
    }

    lines.push(String::new());
    lines.push("Risk predictions".to_string());
    match analysis.most_severe_risk() {
        Some(top) => lines.push(format!("  Most severe: {} ({})", top.condition, top.severity)),
        None => lines.push("  No elevated risks detected".to_string()),
    }
    for risk in &analysis.predictions {
        lines.push(format!(
            "  {} - probability {}, severity {}: {}",
            risk.condition, risk.probability, risk.severity, risk.reason
        ));
    }

    lines.push(String::new());
    lines.push("Recent clinical notes".to_string());
    if analysis.recent_clinical_notes.is_empty() {
        lines.push("  No notes on file".to_string());
    }
    for note in &analysis.recent_clinical_notes {
        lines.push(format!(
            "  {} {} [{}] {}",
            note.date,
            note.author.as_deref().unwrap_or("Unknown"),
            note.sentiment.as_deref().unwrap_or("n/a"),
            note.summary
        ));
    }

    lines.push(String::new());
    lines.extend(render_history(&analysis.history));
    lines.join("\n")
}

fn reading(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn render_history(history: &History) -> Vec<String> {
    let mut lines = vec!["Vitals history".to_string()];
    if history.vitals.is_empty() {
        lines.push("  No vitals recorded".to_string());
    }
    for entry in &history.vitals {
        lines.push(format!(
            "  {}  BP {}/{}  HR {}",
            entry.date.format("%Y-%m-%d %H:%M"),
            reading(entry.systolic_bp),
            reading(entry.diastolic_bp),
            reading(entry.heart_rate)
        ));
    }

    lines.push(String::new());
    lines.push("Lab history".to_string());
    let lab_types = history.lab_types();
    if lab_types.is_empty() {
        lines.push("  No lab results".to_string());
    }
    for test_type in lab_types {
        let series = history
            .lab_series(test_type)
            .map(|entry| {
                let value = reading(entry.value);
                match entry.unit.as_deref().filter(|u| !u.is_empty()) {
                    Some(unit) => format!("{} ({} {})", entry.date.format("%Y-%m-%d"), value, unit),
                    None => format!("{} ({})", entry.date.format("%Y-%m-%d"), value),
                }
            })
            .collect::<Vec<_>>()
            .join(" -> ");
        lines.push(format!("  {:<16} {}", test_type, series));
    }
    lines
}

pub fn render_session(snapshot: &SessionSnapshot) -> String {
    match (snapshot.state, &snapshot.analysis) {
        (LoadState::Idle, _) => format!("Patient #{}: not loaded", snapshot.patient_id),
        (LoadState::Loading, _) => format!("Patient #{}: loading...", snapshot.patient_id),
        (LoadState::Failed, _) | (LoadState::Loaded, None) => {
            format!("Patient #{}: no data available", snapshot.patient_id)
        }
        (LoadState::Loaded, Some(analysis)) => render_analysis(analysis),
    }
}

pub fn render_search_results(patients: &[Patient]) -> String {
    if patients.is_empty() {
        return "No patients found.".to_string();
    }
    patients
        .iter()
        .map(|patient| format!("{}\n  {}", patient.name, patient.suggestion_label()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn agent_state_label(state: AgentState) -> &'static str {
    match state {
        AgentState::Idle => "idle",
        AgentState::Working => "working",
        AgentState::Done => "done",
    }
}

pub fn render_insights(snapshot: &InsightsSnapshot) -> String {
    let state = agent_state_label(snapshot.state);
    let mut lines = vec!["AI Medical Board".to_string()];
    for role in AgentRole::ALL {
        lines.push(format!("  {:<8} {:<11} {}", role.to_string(), role.specialty(), state));
    }
    lines.push(format!("  {:<8} {:<11} {}", "scribe", "CMO", state));

    let title = match snapshot.view {
        InsightView::Summary => "Executive Summary",
        InsightView::Report(role) => role.report_title(),
    };
    lines.push(String::new());
    match (snapshot.state, snapshot.visible_text()) {
        (AgentState::Working, _) => lines.push("Orchestrating agents...".to_string()),
        (_, Some(text)) => {
            lines.push(title.to_string());
            lines.push(text.to_string());
        }
        (AgentState::Done, None) => lines.push(format!("{}: no report", title)),
        (AgentState::Idle, None) => lines.push("No analysis yet. Run generation to start.".to_string()),
    }
    lines.join("\n")
}

pub fn render_uploads(entries: &[UploadEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let status = match &entry.status {
                UploadStatus::Uploading => format!("{}%", entry.progress),
                UploadStatus::Completed => "Uploaded".to_string(),
                UploadStatus::Errored(message) => format!("Failed: {}", message),
            };
            format!("{}  {}  {}", entry.name, format_file_size(entry.size), status)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
