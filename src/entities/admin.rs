//! Super-admin console shapes

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::presentation::{self, BadgeColor};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformStats {
    pub total_organizations: u32,
    pub active_organizations: u32,
    pub total_users: u32,
    pub active_users_30d: u32,
    /// Monthly recurring revenue
    pub mrr: f64,
    /// Month-over-month MRR change, percent
    #[serde(default)]
    pub mrr_change: f64,
    #[serde(default)]
    pub new_signups_30d: u32,
}

impl PlatformStats {
    pub fn mrr_trend(&self) -> BadgeColor {
        presentation::change_color(self.mrr_change)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationStatus {
    Active,
    Trial,
    Suspended,
    Cancelled,
}

impl OrganizationStatus {
    pub fn color(self) -> BadgeColor {
        match self {
            OrganizationStatus::Active => BadgeColor::Green,
            OrganizationStatus::Trial => BadgeColor::Blue,
            OrganizationStatus::Suspended => BadgeColor::Orange,
            OrganizationStatus::Cancelled => BadgeColor::Gray,
        }
    }
}

impl std::fmt::Display for OrganizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrganizationStatus::Active => write!(f, "active"),
            OrganizationStatus::Trial => write!(f, "trial"),
            OrganizationStatus::Suspended => write!(f, "suspended"),
            OrganizationStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub status: OrganizationStatus,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub mrr: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationStatusUpdate {
    pub status: OrganizationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub is_superadmin: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: String,
    pub action: String,
    pub actor_email: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Degraded,
    Down,
}

impl HealthState {
    pub fn color(self) -> BadgeColor {
        match self {
            HealthState::Healthy => BadgeColor::Green,
            HealthState::Degraded => BadgeColor::Yellow,
            HealthState::Down => BadgeColor::Red,
        }
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthState::Healthy => write!(f, "healthy"),
            HealthState::Degraded => write!(f, "degraded"),
            HealthState::Down => write!(f, "down"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub name: String,
    pub status: HealthState,
    #[serde(default)]
    pub latency_ms: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemHealth {
    pub status: HealthState,
    #[serde(default)]
    pub services: Vec<ServiceHealth>,
    #[serde(default)]
    pub checked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizationQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrganizationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditLogQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_platform_stats_trend() {
        let stats: PlatformStats = serde_json::from_value(json!({
            "total_organizations": 42,
            "active_organizations": 38,
            "total_users": 910,
            "active_users_30d": 640,
            "mrr": 128500.0,
            "mrr_change": -2.5
        }))
        .unwrap();
        assert_eq!(stats.mrr_trend(), BadgeColor::Red);
        assert_eq!(stats.new_signups_30d, 0);
    }

    #[test]
    fn test_status_update_wire_shape() {
        let update = OrganizationStatusUpdate {
            status: OrganizationStatus::Suspended,
            reason: Some("payment overdue".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"status": "suspended", "reason": "payment overdue"})
        );
    }

    #[test]
    fn test_system_health_decodes() {
        let health: SystemHealth = serde_json::from_value(json!({
            "status": "degraded",
            "services": [
                {"name": "database", "status": "healthy", "latency_ms": 3.2},
                {"name": "transcription", "status": "down", "message": "worker offline"}
            ]
        }))
        .unwrap();
        assert_eq!(health.status.color(), BadgeColor::Yellow);
        assert_eq!(health.services[1].status, HealthState::Down);
    }
}
