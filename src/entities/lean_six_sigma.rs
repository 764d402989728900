//! Lean six sigma projects and kaizen events

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::presentation::{self, BadgeColor};

/// DMAIC phase, in order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DmaicPhase {
    Define,
    Measure,
    Analyze,
    Improve,
    Control,
}

impl DmaicPhase {
    pub const ALL: [DmaicPhase; 5] = [
        DmaicPhase::Define,
        DmaicPhase::Measure,
        DmaicPhase::Analyze,
        DmaicPhase::Improve,
        DmaicPhase::Control,
    ];

    /// The following phase; `None` after control
    pub fn next(self) -> Option<DmaicPhase> {
        match self {
            DmaicPhase::Define => Some(DmaicPhase::Measure),
            DmaicPhase::Measure => Some(DmaicPhase::Analyze),
            DmaicPhase::Analyze => Some(DmaicPhase::Improve),
            DmaicPhase::Improve => Some(DmaicPhase::Control),
            DmaicPhase::Control => None,
        }
    }

    /// One-based position within DMAIC
    pub fn ordinal(self) -> usize {
        self as usize + 1
    }
}

impl std::fmt::Display for DmaicPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DmaicPhase::Define => write!(f, "define"),
            DmaicPhase::Measure => write!(f, "measure"),
            DmaicPhase::Analyze => write!(f, "analyze"),
            DmaicPhase::Improve => write!(f, "improve"),
            DmaicPhase::Control => write!(f, "control"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    OnHold,
    Completed,
    Cancelled,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Active => write!(f, "active"),
            ProjectStatus::OnHold => write!(f, "on_hold"),
            ProjectStatus::Completed => write!(f, "completed"),
            ProjectStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LssProject {
    pub id: String,
    pub name: String,
    pub problem_statement: String,
    pub phase: DmaicPhase,
    pub status: ProjectStatus,
    #[serde(default)]
    pub champion: Option<String>,
    #[serde(default)]
    pub belt_level: Option<String>,
    #[serde(default)]
    pub estimated_savings: Option<f64>,
    #[serde(default)]
    pub actual_savings: Option<f64>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
}

impl LssProject {
    /// Percent of DMAIC phases reached
    pub fn progress_percent(&self) -> f64 {
        self.phase.ordinal() as f64 * 100.0 / DmaicPhase::ALL.len() as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub problem_statement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub champion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub belt_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_savings: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseUpdate {
    pub phase: DmaicPhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KaizenEvent {
    pub id: String,
    pub title: String,
    pub area: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub team: Vec<String>,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub results: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateKaizenRequest {
    pub title: String,
    pub area: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub team: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objectives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LssDashboard {
    pub active_projects: u32,
    pub completed_projects: u32,
    pub total_savings: f64,
    /// Savings change against the previous period, percent
    #[serde(default)]
    pub savings_change: f64,
    #[serde(default)]
    pub average_sigma_level: Option<f64>,
    #[serde(default)]
    pub upcoming_kaizen_events: u32,
    #[serde(default)]
    pub projects_by_phase: Vec<PhaseCount>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl LssDashboard {
    pub fn savings_trend(&self) -> BadgeColor {
        presentation::change_color(self.savings_change)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseCount {
    pub phase: DmaicPhase,
    pub count: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<DmaicPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_phase_order() {
        assert_eq!(DmaicPhase::Define.next(), Some(DmaicPhase::Measure));
        assert_eq!(DmaicPhase::Control.next(), None);
        assert!(DmaicPhase::Measure < DmaicPhase::Improve);
        assert_eq!(DmaicPhase::Analyze.ordinal(), 3);
    }

    #[test]
    fn test_project_progress() {
        let project: LssProject = serde_json::from_value(json!({
            "id": "p1",
            "name": "Reduce changeover",
            "problem_statement": "Changeovers take 90 minutes",
            "phase": "improve",
            "status": "active"
        }))
        .unwrap();
        assert!((project.progress_percent() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_phase_update_wire_shape() {
        let update = PhaseUpdate {
            phase: DmaicPhase::Control,
            notes: None,
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"phase": "control"}));
    }
}
