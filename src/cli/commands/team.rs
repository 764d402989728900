//! `pulse team` command - members, invitations, and the role table

use chrono::Utc;
use clap::{Args, Subcommand};
use console::style;
use dialoguer::Confirm;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::utils::{
    api_error, field, print_list, print_structured, rule, section, Session,
};
use crate::cli::table::{paint, CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::team::{AssignableRole, InvitationStatus, TeamRole};
use crate::entities::team::{
    self, AcceptInvitationRequest, CreateInvitationRequest, InvitationQuery, MemberQuery,
    TeamDashboard, TeamMember, UpdateMemberRequest,
};

#[derive(Subcommand, Debug)]
pub enum TeamCommands {
    /// Organization overview with members and pending invitations
    Overview,

    /// List team members
    Members(MembersArgs),

    /// Show one member and their permissions
    Member { id: String },

    /// Change a member's role or active state
    Update(UpdateArgs),

    /// Remove a member from the organization
    Remove {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List invitations
    Invitations(InvitationsArgs),

    /// Invite someone by email
    Invite(InviteArgs),

    /// Resend a pending invitation
    Resend { id: String },

    /// Revoke a pending invitation
    Revoke { id: String },

    /// Check an invitation token
    Verify { token: String },

    /// Accept an invitation token
    Accept {
        token: String,
        /// Your full name as it should appear to the team
        #[arg(long)]
        name: Option<String>,
    },

    /// Show the role permission table (offline)
    Roles {
        /// Limit to one role
        role: Option<TeamRole>,
    },
}

#[derive(Args, Debug)]
pub struct MembersArgs {
    /// Filter by role
    #[arg(long, short = 'r')]
    pub role: Option<TeamRole>,

    /// Only active members
    #[arg(long, conflicts_with = "inactive")]
    pub active: bool,

    /// Only deactivated members
    #[arg(long)]
    pub inactive: bool,

    /// Maximum number of results
    #[arg(long, short = 'n')]
    pub limit: Option<u32>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Member ID
    pub id: String,

    /// New role (ownership cannot be assigned)
    #[arg(long, short = 'r')]
    pub role: Option<AssignableRole>,

    /// Reactivate the member
    #[arg(long, conflicts_with = "deactivate")]
    pub activate: bool,

    /// Deactivate the member
    #[arg(long)]
    pub deactivate: bool,
}

#[derive(Args, Debug)]
pub struct InvitationsArgs {
    /// Filter by status
    #[arg(long, short = 's')]
    pub status: Option<InvitationStatus>,

    /// Maximum number of results
    #[arg(long, short = 'n')]
    pub limit: Option<u32>,
}

#[derive(Args, Debug)]
pub struct InviteArgs {
    /// Email address to invite
    pub email: String,

    /// Role granted on acceptance
    #[arg(long, short = 'r', default_value = "viewer")]
    pub role: AssignableRole,

    /// Personal note included in the email
    #[arg(long, short = 'm')]
    pub message: Option<String>,
}

const MEMBER_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("name", "NAME", 22),
    ColumnDef::new("email", "EMAIL", 32),
    ColumnDef::new("role", "ROLE", 13),
    ColumnDef::new("active", "ACTIVE", 6),
    ColumnDef::new("last_active", "LAST ACTIVE", 10),
];

const INVITATION_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("email", "EMAIL", 32),
    ColumnDef::new("role", "ROLE", 13),
    ColumnDef::new("status", "STATUS", 9),
    ColumnDef::new("expires", "EXPIRES", 10),
];

/// Run a team subcommand
pub async fn run(cmd: TeamCommands, global: &GlobalOpts) -> Result<()> {
    if let TeamCommands::Roles { role } = cmd {
        return run_roles(role, global.format);
    }

    let session = Session::open(global)?;
    let api = session.client.team();

    match cmd {
        TeamCommands::Overview => {
            let dashboard: TeamDashboard = session
                .load("team_dashboard", "Failed to load team", api.load_dashboard())
                .await?;
            show_dashboard(&dashboard, &session)
        }
        TeamCommands::Members(args) => {
            let is_active = match (args.active, args.inactive) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let query = MemberQuery {
                role: args.role,
                is_active,
                limit: args.limit,
            };
            let members: Vec<TeamMember> = session
                .load("team_members", "Failed to load team members", api.list_members(&query))
                .await?;
            print_list(&members, session.format, MEMBER_COLUMNS, "member", member_row)
        }
        TeamCommands::Member { id } => {
            let member = api
                .get_member(&id)
                .await
                .map_err(api_error("Failed to load member"))?;
            show_member(&member, &session)
        }
        TeamCommands::Update(args) => {
            let is_active = match (args.activate, args.deactivate) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            if args.role.is_none() && is_active.is_none() {
                return Err(miette::miette!(
                    "Nothing to update: pass --role, --activate, or --deactivate"
                ));
            }
            let req = UpdateMemberRequest {
                role: args.role,
                is_active,
            };
            let member = api
                .update_member(&args.id, &req)
                .await
                .map_err(api_error("Failed to update member"))?;
            session.success(format!(
                "Updated {} ({})",
                style(member.display_name()).cyan(),
                paint(member.role.display_name(), member.role.color())
            ));
            if session.format.is_structured() {
                print_structured(&member, session.format)?;
            }
            Ok(())
        }
        TeamCommands::Remove { id, yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Remove member {} from the organization?", id))
                    .default(false)
                    .interact()
                    .into_diagnostic()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            api.remove_member(&id)
                .await
                .map_err(api_error("Failed to remove member"))?;
            session.success(format!("Removed member {}", style(&id).cyan()));
            Ok(())
        }
        TeamCommands::Invitations(args) => {
            let query = InvitationQuery {
                status: args.status,
                limit: args.limit,
            };
            let invitations = session
                .load(
                    "team_invitations",
                    "Failed to load invitations",
                    api.list_invitations(&query),
                )
                .await?;
            let now = Utc::now();
            print_list(
                &invitations,
                session.format,
                INVITATION_COLUMNS,
                "invitation",
                |inv| invitation_row(inv, now),
            )
        }
        TeamCommands::Invite(args) => {
            let req = CreateInvitationRequest {
                email: args.email,
                role: args.role,
                message: args.message,
            };
            let invitation = api
                .create_invitation(&req)
                .await
                .map_err(api_error("Failed to send invitation"))?;
            if session.format == OutputFormat::Id {
                println!("{}", invitation.id);
            } else if session.format.is_structured() {
                print_structured(&invitation, session.format)?;
            } else {
                session.success(format!(
                    "Invited {} as {}",
                    style(&invitation.email).cyan(),
                    invitation.role
                ));
            }
            Ok(())
        }
        TeamCommands::Resend { id } => {
            let invitation = api
                .resend_invitation(&id)
                .await
                .map_err(api_error("Failed to resend invitation"))?;
            let expires = invitation
                .expires_at
                .map(|t| format!(" (expires {})", t.format("%Y-%m-%d")))
                .unwrap_or_default();
            session.success(format!(
                "Resent invitation to {}{}",
                style(&invitation.email).cyan(),
                expires
            ));
            Ok(())
        }
        TeamCommands::Revoke { id } => {
            let invitation = api
                .revoke_invitation(&id)
                .await
                .map_err(api_error("Failed to revoke invitation"))?;
            session.success(format!(
                "Invitation to {} is {}",
                style(&invitation.email).cyan(),
                paint(invitation.status, invitation.status.color())
            ));
            Ok(())
        }
        TeamCommands::Verify { token } => {
            let info = api
                .verify_invitation(&token)
                .await
                .map_err(api_error("Failed to verify invitation"))?;
            if session.format.is_structured() {
                return print_structured(&info, session.format);
            }
            rule();
            if info.valid {
                field("Valid", style("yes").green());
            } else {
                field("Valid", style("no").red());
            }
            if let Some(org) = &info.organization_name {
                field("Organization", org);
            }
            if let Some(email) = &info.email {
                field("Email", email);
            }
            if let Some(role) = info.role {
                field("Role", paint(role.display_name(), role.color()));
            }
            if let Some(by) = &info.invited_by {
                field("Invited by", by);
            }
            if let Some(expires) = info.expires_at {
                field("Expires", expires.format("%Y-%m-%d %H:%M"));
            }
            if let Some(message) = &info.message {
                field("Message", message);
            }
            rule();
            Ok(())
        }
        TeamCommands::Accept { token, name } => {
            let req = AcceptInvitationRequest {
                token,
                full_name: name,
            };
            let accepted = api
                .accept_invitation(&req)
                .await
                .map_err(api_error("Failed to accept invitation"))?;
            if session.format.is_structured() {
                return print_structured(&accepted, session.format);
            }
            if accepted.success {
                let org = accepted.organization_name.as_deref().unwrap_or("the organization");
                session.success(format!("Joined {}", style(org).cyan()));
            } else {
                let reason = accepted.message.as_deref().unwrap_or("invitation not accepted");
                return Err(miette::miette!("Failed to accept invitation: {}", reason));
            }
            Ok(())
        }
        TeamCommands::Roles { .. } => Ok(()),
    }
}

fn member_row(m: &TeamMember) -> TableRow {
    TableRow::new(m.id.clone())
        .cell("id", CellValue::Id(m.id.clone()))
        .cell("name", CellValue::OptionalText(m.full_name.clone()))
        .cell("email", CellValue::Text(m.email.clone()))
        .cell(
            "role",
            CellValue::Badge(m.role.display_name().to_string(), m.role.color()),
        )
        .cell("active", CellValue::Flag(m.is_active))
        .cell("last_active", CellValue::date_opt(m.last_active_at))
}

fn invitation_row(inv: &team::Invitation, now: chrono::DateTime<Utc>) -> TableRow {
    let status = if inv.is_stale(now) {
        CellValue::Badge("stale".to_string(), InvitationStatus::Expired.color())
    } else {
        CellValue::Badge(inv.status.to_string(), inv.status.color())
    };
    TableRow::new(inv.id.clone())
        .cell("id", CellValue::Id(inv.id.clone()))
        .cell("email", CellValue::Text(inv.email.clone()))
        .cell(
            "role",
            CellValue::Badge(inv.role.display_name().to_string(), inv.role.color()),
        )
        .cell("status", status)
        .cell("expires", CellValue::date_opt(inv.expires_at))
}

fn show_dashboard(dashboard: &TeamDashboard, session: &Session) -> Result<()> {
    if session.format.is_structured() {
        return print_structured(dashboard, session.format);
    }

    let overview = &dashboard.overview;
    rule();
    field("Organization", style(&overview.organization_name).yellow());
    field(
        "Members",
        format!("{} ({} active)", overview.total_members, overview.active_members),
    );
    field("Pending invitations", overview.pending_invitations);
    if let (Some(limit), Some(remaining)) = (overview.seat_limit, overview.seats_remaining()) {
        field("Seats", format!("{} of {} available", remaining, limit));
    }
    if let Some(owner) = team::owner(&dashboard.members) {
        field("Owner", owner.display_name());
    }
    rule();

    if !overview.members_by_role.is_empty() {
        section("By role");
        for role in TeamRole::ALL {
            if let Some(count) = overview.members_by_role.get(&role) {
                println!(
                    "  {} {}",
                    paint(format!("{:<14}", role.display_name()), role.color()),
                    count
                );
            }
        }
    }

    section("Members");
    let rows: Vec<TableRow> = dashboard.members.iter().map(member_row).collect();
    TableFormatter::new(MEMBER_COLUMNS, "member").output(&rows, session.format);

    let pending: Vec<&team::Invitation> = dashboard
        .invitations
        .iter()
        .filter(|i| i.status == InvitationStatus::Pending)
        .collect();
    if !pending.is_empty() {
        section("Pending invitations");
        let now = Utc::now();
        let rows: Vec<TableRow> = pending.iter().map(|i| invitation_row(i, now)).collect();
        TableFormatter::new(INVITATION_COLUMNS, "invitation").output(&rows, session.format);
    }
    Ok(())
}

fn show_member(member: &TeamMember, session: &Session) -> Result<()> {
    match session.format {
        OutputFormat::Id => {
            println!("{}", member.id);
            return Ok(());
        }
        f if f.is_structured() => return print_structured(member, f),
        _ => {}
    }

    rule();
    field("ID", style(&member.id).cyan());
    field("Name", style(member.display_name()).yellow());
    field("Email", &member.email);
    field("Role", paint(member.role.display_name(), member.role.color()));
    field(
        "Active",
        if member.is_active {
            style("yes").green()
        } else {
            style("no").dim()
        },
    );
    if let Some(joined) = member.joined_at {
        field("Joined", joined.format("%Y-%m-%d"));
    }
    rule();
    print_permissions(member.role);
    Ok(())
}

fn print_permissions(role: TeamRole) {
    let perms = role.permissions();
    section(&format!(
        "Permissions ({}/{})",
        perms.granted_count(),
        perms.entries().len()
    ));
    for (name, granted) in perms.entries() {
        let mark = if granted {
            style("✓").green()
        } else {
            style("✗").dim()
        };
        println!("  {} {}", mark, name.replace('_', " "));
    }
}

fn run_roles(role: Option<TeamRole>, format: OutputFormat) -> Result<()> {
    let roles: Vec<TeamRole> = match role {
        Some(r) => vec![r],
        None => TeamRole::ALL.to_vec(),
    };

    if format.is_structured() {
        let table: Vec<serde_json::Value> = roles
            .iter()
            .map(|r| {
                serde_json::json!({
                    "role": r,
                    "display_name": r.display_name(),
                    "color": r.color(),
                    "description": r.description(),
                    "permissions": r.permissions(),
                })
            })
            .collect();
        return print_structured(&table, format);
    }

    for r in roles {
        println!();
        println!(
            "{} {}",
            paint(r.display_name(), r.color()).bold(),
            style(format!("({})", r)).dim()
        );
        println!("  {}", r.description());
        print_permissions(r);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::team::Invitation;
    use chrono::{Duration, TimeZone};

    fn invitation(status: InvitationStatus, expires_in_days: i64) -> Invitation {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Invitation {
            id: "inv-1".to_string(),
            email: "lee@example.com".to_string(),
            role: TeamRole::Analyst,
            status,
            message: None,
            invited_by: None,
            created_at: None,
            expires_at: Some(now + Duration::days(expires_in_days)),
        }
    }

    #[test]
    fn test_stale_pending_invitation_is_flagged() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let row = invitation_row(&invitation(InvitationStatus::Pending, -1), now);
        assert_eq!(row.get("status").unwrap().raw(), "stale");

        let row = invitation_row(&invitation(InvitationStatus::Pending, 3), now);
        assert_eq!(row.get("status").unwrap().raw(), "pending");
    }

    #[test]
    fn test_revoked_invitation_keeps_status() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let row = invitation_row(&invitation(InvitationStatus::Revoked, -1), now);
        assert_eq!(row.get("status").unwrap().raw(), "revoked");
    }
}
