//! Team roles, permissions, and invitation lifecycle

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::presentation::BadgeColor;

/// Organization role of a team member
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    Owner,
    Admin,
    Manager,
    Analyst,
    Viewer,
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamRole::Owner => write!(f, "owner"),
            TeamRole::Admin => write!(f, "admin"),
            TeamRole::Manager => write!(f, "manager"),
            TeamRole::Analyst => write!(f, "analyst"),
            TeamRole::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for TeamRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(TeamRole::Owner),
            "admin" => Ok(TeamRole::Admin),
            "manager" => Ok(TeamRole::Manager),
            "analyst" => Ok(TeamRole::Analyst),
            "viewer" => Ok(TeamRole::Viewer),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Capabilities granted by a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Permissions {
    pub view_dashboard: bool,
    pub view_analytics: bool,
    pub create_analyses: bool,
    pub edit_analyses: bool,
    pub delete_analyses: bool,
    pub export_reports: bool,
    pub manage_process_maps: bool,
    pub invite_members: bool,
    pub manage_members: bool,
    pub manage_billing: bool,
    pub manage_settings: bool,
}

impl Permissions {
    pub const ALL: Permissions = Permissions {
        view_dashboard: true,
        view_analytics: true,
        create_analyses: true,
        edit_analyses: true,
        delete_analyses: true,
        export_reports: true,
        manage_process_maps: true,
        invite_members: true,
        manage_members: true,
        manage_billing: true,
        manage_settings: true,
    };

    /// Every capability with its name, in display order
    pub fn entries(&self) -> [(&'static str, bool); 11] {
        [
            ("view_dashboard", self.view_dashboard),
            ("view_analytics", self.view_analytics),
            ("create_analyses", self.create_analyses),
            ("edit_analyses", self.edit_analyses),
            ("delete_analyses", self.delete_analyses),
            ("export_reports", self.export_reports),
            ("manage_process_maps", self.manage_process_maps),
            ("invite_members", self.invite_members),
            ("manage_members", self.manage_members),
            ("manage_billing", self.manage_billing),
            ("manage_settings", self.manage_settings),
        ]
    }

    pub fn granted_count(&self) -> usize {
        self.entries().iter().filter(|(_, granted)| *granted).count()
    }
}

impl TeamRole {
    pub const ALL: [TeamRole; 5] = [
        TeamRole::Owner,
        TeamRole::Admin,
        TeamRole::Manager,
        TeamRole::Analyst,
        TeamRole::Viewer,
    ];

    /// Fixed permission table
    pub const fn permissions(self) -> Permissions {
        match self {
            TeamRole::Owner => Permissions::ALL,
            TeamRole::Admin => Permissions {
                manage_billing: false,
                ..Permissions::ALL
            },
            TeamRole::Manager => Permissions {
                view_dashboard: true,
                view_analytics: true,
                create_analyses: true,
                edit_analyses: true,
                delete_analyses: false,
                export_reports: true,
                manage_process_maps: true,
                invite_members: true,
                manage_members: false,
                manage_billing: false,
                manage_settings: false,
            },
            TeamRole::Analyst => Permissions {
                view_dashboard: true,
                view_analytics: true,
                create_analyses: true,
                edit_analyses: true,
                delete_analyses: false,
                export_reports: true,
                manage_process_maps: false,
                invite_members: false,
                manage_members: false,
                manage_billing: false,
                manage_settings: false,
            },
            TeamRole::Viewer => Permissions {
                view_dashboard: true,
                view_analytics: true,
                create_analyses: false,
                edit_analyses: false,
                delete_analyses: false,
                export_reports: false,
                manage_process_maps: false,
                invite_members: false,
                manage_members: false,
                manage_billing: false,
                manage_settings: false,
            },
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TeamRole::Owner => "Owner",
            TeamRole::Admin => "Administrator",
            TeamRole::Manager => "Manager",
            TeamRole::Analyst => "Analyst",
            TeamRole::Viewer => "Viewer",
        }
    }

    pub fn color(self) -> BadgeColor {
        match self {
            TeamRole::Owner => BadgeColor::Purple,
            TeamRole::Admin => BadgeColor::Red,
            TeamRole::Manager => BadgeColor::Blue,
            TeamRole::Analyst => BadgeColor::Green,
            TeamRole::Viewer => BadgeColor::Gray,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TeamRole::Owner => "Full access including billing; one per organization",
            TeamRole::Admin => "Manage members, settings and all analyses",
            TeamRole::Manager => "Run analyses, maintain process maps, invite members",
            TeamRole::Analyst => "Create, edit and export analyses",
            TeamRole::Viewer => "Read-only access to dashboards and analytics",
        }
    }
}

/// A role that may be granted through invitations or member updates
///
/// Ownership is never assigned through those paths, so there is no owner
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AssignableRole {
    Admin,
    Manager,
    Analyst,
    Viewer,
}

impl From<AssignableRole> for TeamRole {
    fn from(role: AssignableRole) -> Self {
        match role {
            AssignableRole::Admin => TeamRole::Admin,
            AssignableRole::Manager => TeamRole::Manager,
            AssignableRole::Analyst => TeamRole::Analyst,
            AssignableRole::Viewer => TeamRole::Viewer,
        }
    }
}

impl TryFrom<TeamRole> for AssignableRole {
    type Error = String;

    fn try_from(role: TeamRole) -> Result<Self, Self::Error> {
        match role {
            TeamRole::Owner => Err("the owner role cannot be assigned".to_string()),
            TeamRole::Admin => Ok(AssignableRole::Admin),
            TeamRole::Manager => Ok(AssignableRole::Manager),
            TeamRole::Analyst => Ok(AssignableRole::Analyst),
            TeamRole::Viewer => Ok(AssignableRole::Viewer),
        }
    }
}

impl std::fmt::Display for AssignableRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        TeamRole::from(*self).fmt(f)
    }
}

/// Invitation lifecycle state
///
/// `pending` moves to one of the terminal states; resending keeps it pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Expired,
    Revoked,
}

impl InvitationStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, InvitationStatus::Pending)
    }

    /// Whether `self -> next` is a legal transition (`pending -> pending` is a resend)
    pub fn can_transition_to(self, next: InvitationStatus) -> bool {
        matches!((self, next), (InvitationStatus::Pending, _))
    }

    pub fn can_resend(self) -> bool {
        self == InvitationStatus::Pending
    }

    pub fn can_revoke(self) -> bool {
        self == InvitationStatus::Pending
    }

    pub fn color(self) -> BadgeColor {
        match self {
            InvitationStatus::Pending => BadgeColor::Yellow,
            InvitationStatus::Accepted => BadgeColor::Green,
            InvitationStatus::Expired => BadgeColor::Gray,
            InvitationStatus::Revoked => BadgeColor::Red,
        }
    }
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvitationStatus::Pending => write!(f, "pending"),
            InvitationStatus::Accepted => write!(f, "accepted"),
            InvitationStatus::Expired => write!(f, "expired"),
            InvitationStatus::Revoked => write!(f, "revoked"),
        }
    }
}
