//! Board governance: boards, board meetings, resolutions, votes, compliance

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::presentation::{BadgeColor, RiskLevel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub next_meeting_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardMember {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Board position, e.g. "Chair", "Independent Director"
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub is_voting: bool,
    #[serde(default)]
    pub term_ends: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BoardMeetingStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl std::fmt::Display for BoardMeetingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardMeetingStatus::Scheduled => write!(f, "scheduled"),
            BoardMeetingStatus::InProgress => write!(f, "in_progress"),
            BoardMeetingStatus::Completed => write!(f, "completed"),
            BoardMeetingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardMeeting {
    pub id: String,
    pub board_id: String,
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: BoardMeetingStatus,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub agenda: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBoardMeetingRequest {
    pub board_id: String,
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agenda: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStatus {
    Draft,
    Proposed,
    Voting,
    Passed,
    Rejected,
    Withdrawn,
}

impl ResolutionStatus {
    pub fn color(self) -> BadgeColor {
        match self {
            ResolutionStatus::Draft => BadgeColor::Gray,
            ResolutionStatus::Proposed => BadgeColor::Blue,
            ResolutionStatus::Voting => BadgeColor::Yellow,
            ResolutionStatus::Passed => BadgeColor::Green,
            ResolutionStatus::Rejected => BadgeColor::Red,
            ResolutionStatus::Withdrawn => BadgeColor::Gray,
        }
    }
}

impl std::fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionStatus::Draft => write!(f, "draft"),
            ResolutionStatus::Proposed => write!(f, "proposed"),
            ResolutionStatus::Voting => write!(f, "voting"),
            ResolutionStatus::Passed => write!(f, "passed"),
            ResolutionStatus::Rejected => write!(f, "rejected"),
            ResolutionStatus::Withdrawn => write!(f, "withdrawn"),
        }
    }
}

/// Vote tallies on a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteTally {
    #[serde(default, rename = "for")]
    pub votes_for: u32,
    #[serde(default)]
    pub against: u32,
    #[serde(default)]
    pub abstain: u32,
}

impl VoteTally {
    pub fn total(&self) -> u32 {
        self.votes_for + self.against + self.abstain
    }

    /// Share of cast (non-abstaining) votes in favour, percent
    pub fn approval_percent(&self) -> Option<f64> {
        let cast = self.votes_for + self.against;
        (cast > 0).then(|| f64::from(self.votes_for) * 100.0 / f64::from(cast))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub id: String,
    pub board_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ResolutionStatus,
    #[serde(default)]
    pub votes: VoteTally,
    #[serde(default)]
    pub proposed_by: Option<String>,
    #[serde(default)]
    pub voting_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateResolutionRequest {
    pub board_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    For,
    Against,
    Abstain,
}

impl std::fmt::Display for Vote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Vote::For => write!(f, "for"),
            Vote::Against => write!(f, "against"),
            Vote::Abstain => write!(f, "abstain"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRequest {
    pub vote: Vote,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    AtRisk,
    NonCompliant,
    UnderReview,
}

impl ComplianceStatus {
    pub fn color(self) -> BadgeColor {
        match self {
            ComplianceStatus::Compliant => BadgeColor::Green,
            ComplianceStatus::AtRisk => BadgeColor::Yellow,
            ComplianceStatus::NonCompliant => BadgeColor::Red,
            ComplianceStatus::UnderReview => BadgeColor::Blue,
        }
    }
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceStatus::Compliant => write!(f, "compliant"),
            ComplianceStatus::AtRisk => write!(f, "at_risk"),
            ComplianceStatus::NonCompliant => write!(f, "non_compliant"),
            ComplianceStatus::UnderReview => write!(f, "under_review"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceItem {
    pub id: String,
    pub title: String,
    pub category: String,
    pub status: ComplianceStatus,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceDashboard {
    pub total_boards: u32,
    pub upcoming_meetings: u32,
    pub open_resolutions: u32,
    /// Percent of compliance items in the compliant state
    pub compliance_score: f64,
    #[serde(default)]
    pub high_risk_items: u32,
    #[serde(default)]
    pub recent_resolutions: Vec<Resolution>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MeetingQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BoardMeetingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolutionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ResolutionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ComplianceQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ComplianceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vote_request_wire_shape() {
        let req = VoteRequest {
            vote: Vote::Against,
            comments: None,
        };
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"vote": "against"}));
    }

    #[test]
    fn test_resolution_tally() {
        let resolution: Resolution = serde_json::from_value(json!({
            "id": "r1",
            "board_id": "b1",
            "title": "Approve FY budget",
            "status": "voting",
            "votes": {"for": 5, "against": 1, "abstain": 1}
        }))
        .unwrap();
        assert_eq!(resolution.votes.total(), 7);
        let approval = resolution.votes.approval_percent().unwrap();
        assert!((approval - 83.333).abs() < 0.01);
        assert_eq!(resolution.status.color(), BadgeColor::Yellow);
    }

    #[test]
    fn test_no_cast_votes_has_no_approval() {
        let tally = VoteTally {
            votes_for: 0,
            against: 0,
            abstain: 3,
        };
        assert_eq!(tally.approval_percent(), None);
    }

    #[test]
    fn test_compliance_item_risk_color() {
        let item: ComplianceItem = serde_json::from_value(json!({
            "id": "c1",
            "title": "SOX access review",
            "category": "financial",
            "status": "at_risk",
            "risk_level": "high"
        }))
        .unwrap();
        assert_eq!(item.risk_level.color(), BadgeColor::Orange);
        assert_eq!(item.status.color(), BadgeColor::Yellow);
    }
}
