//! Team administration shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::team::{AssignableRole, InvitationStatus, Permissions, TeamRole};

/// A member of the current organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: TeamRole,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_active_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl TeamMember {
    /// Permissions come from the static role table, never from the wire
    pub fn permissions(&self) -> Permissions {
        self.role.permissions()
    }

    pub fn is_owner(&self) -> bool {
        self.role == TeamRole::Owner
    }

    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }
}

/// The organization's owner, if present in `members`
pub fn owner(members: &[TeamMember]) -> Option<&TeamMember> {
    members.iter().find(|m| m.is_owner())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: String,
    pub email: String,
    pub role: TeamRole,
    pub status: InvitationStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub invited_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Invitation {
    /// Pending but past its expiry timestamp (the backend flips it lazily)
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.status == InvitationStatus::Pending && self.expires_at.is_some_and(|t| t <= now)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamOverview {
    pub organization_name: String,
    pub total_members: u32,
    pub active_members: u32,
    pub pending_invitations: u32,
    #[serde(default)]
    pub seat_limit: Option<u32>,
    #[serde(default)]
    pub members_by_role: HashMap<TeamRole, u32>,
}

impl TeamOverview {
    pub fn seats_remaining(&self) -> Option<u32> {
        self.seat_limit
            .map(|limit| limit.saturating_sub(self.total_members + self.pending_invitations))
    }
}

/// Overview, members and invitations loaded together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamDashboard {
    pub overview: TeamOverview,
    pub members: Vec<TeamMember>,
    pub invitations: Vec<Invitation>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MemberQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<TeamRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InvitationQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvitationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Member update; the owner role is not representable here
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateMemberRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<AssignableRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateInvitationRequest {
    pub email: String,
    pub role: AssignableRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvitationTokenRequest {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvitationVerifyResponse {
    pub valid: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<TeamRole>,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub invited_by: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptInvitationRequest {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptInvitationResponse {
    pub success: bool,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub role: Option<TeamRole>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn member(id: &str, role: TeamRole) -> TeamMember {
        TeamMember {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            full_name: None,
            role,
            is_active: true,
            joined_at: None,
            last_active_at: None,
        }
    }

    #[test]
    fn test_owner_lookup() {
        let members = vec![
            member("a", TeamRole::Admin),
            member("o", TeamRole::Owner),
            member("v", TeamRole::Viewer),
        ];
        assert_eq!(owner(&members).map(|m| m.id.as_str()), Some("o"));
        assert!(owner(&members[..1]).is_none());
    }

    #[test]
    fn test_member_permissions_from_role() {
        let m = member("v", TeamRole::Viewer);
        assert!(!m.permissions().invite_members);
        assert_eq!(m.display_name(), "v@example.com");
    }

    #[test]
    fn test_member_decodes_with_defaults() {
        let m: TeamMember = serde_json::from_value(json!({
            "id": "u1", "email": "x@example.com", "role": "analyst"
        }))
        .unwrap();
        assert!(m.is_active);
        assert_eq!(m.role, TeamRole::Analyst);
    }

    #[test]
    fn test_overview_members_by_role_keys() {
        let overview: TeamOverview = serde_json::from_value(json!({
            "organization_name": "Acme",
            "total_members": 8,
            "active_members": 7,
            "pending_invitations": 1,
            "seat_limit": 10,
            "members_by_role": {"owner": 1, "analyst": 5, "viewer": 2}
        }))
        .unwrap();
        assert_eq!(overview.members_by_role.get(&TeamRole::Analyst), Some(&5));
        assert_eq!(overview.seats_remaining(), Some(1));
    }

    #[test]
    fn test_update_request_only_sends_set_fields() {
        let req = UpdateMemberRequest {
            role: Some(AssignableRole::Manager),
            is_active: None,
        };
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"role": "manager"}));
    }

    #[test]
    fn test_stale_invitation() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let inv = Invitation {
            id: "i1".to_string(),
            email: "new@example.com".to_string(),
            role: TeamRole::Viewer,
            status: InvitationStatus::Pending,
            message: None,
            invited_by: None,
            created_at: None,
            expires_at: Some(Utc.with_ymd_and_hms(2024, 4, 30, 0, 0, 0).unwrap()),
        };
        assert!(inv.is_stale(now));

        let revoked = Invitation {
            status: InvitationStatus::Revoked,
            ..inv
        };
        assert!(!revoked.is_stale(now));
    }
}
