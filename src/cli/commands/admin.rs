//! `pulse admin` command - platform administration (super-admin only)

use clap::{Args, Subcommand};
use console::style;
use miette::Result;

use crate::cli::commands::utils::{
    api_error, field, print_list, print_structured, rule, Session,
};
use crate::cli::table::{paint, CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::presentation::{format_compact_currency, format_currency, BadgeColor};
use crate::entities::admin::{
    AuditLogQuery, Organization, OrganizationQuery, OrganizationStatus, OrganizationStatusUpdate,
    PlatformStats, UserQuery,
};

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Platform-wide statistics
    Stats,

    /// List organizations
    Orgs(OrgsArgs),

    /// Show an organization
    Org { id: String },

    /// Change an organization's status
    SetStatus(SetStatusArgs),

    /// List users across organizations
    Users(UsersArgs),

    /// Recent audit log entries
    Audit(AuditArgs),

    /// Backend service health
    Health,
}

#[derive(Args, Debug)]
pub struct OrgsArgs {
    #[arg(long, short = 's')]
    pub status: Option<OrganizationStatus>,

    /// Name contains
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, short = 'n')]
    pub limit: Option<u32>,
}

#[derive(Args, Debug)]
pub struct SetStatusArgs {
    /// Organization ID
    pub id: String,

    /// New status
    pub status: OrganizationStatus,

    /// Reason recorded in the audit log
    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Args, Debug)]
pub struct UsersArgs {
    /// Only users of this organization
    #[arg(long)]
    pub org: Option<String>,

    /// Email or name contains
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, short = 'n')]
    pub limit: Option<u32>,
}

#[derive(Args, Debug)]
pub struct AuditArgs {
    #[arg(long)]
    pub org: Option<String>,

    /// Action name, e.g. member.removed
    #[arg(long)]
    pub action: Option<String>,

    #[arg(long, short = 'n', default_value = "50")]
    pub limit: u32,
}

/// Run an admin subcommand
pub async fn run(cmd: AdminCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let api = session.client.admin();

    match cmd {
        AdminCommands::Stats => {
            let stats: PlatformStats = session
                .load(
                    "platform_stats",
                    "Failed to load platform stats",
                    api.get_platform_stats(),
                )
                .await?;
            if session.format.is_structured() {
                return print_structured(&stats, session.format);
            }
            rule();
            field(
                "Organizations",
                format!(
                    "{} ({} active)",
                    stats.total_organizations, stats.active_organizations
                ),
            );
            field(
                "Users",
                format!("{} ({} active in 30d)", stats.total_users, stats.active_users_30d),
            );
            field("New signups (30d)", stats.new_signups_30d);
            field(
                "MRR",
                format!(
                    "{} {}",
                    style(format_currency(stats.mrr, "$")).bold(),
                    paint(format!("{:+.1}%", stats.mrr_change), stats.mrr_trend())
                ),
            );
            rule();
            Ok(())
        }
        AdminCommands::Orgs(args) => {
            let query = OrganizationQuery {
                status: args.status,
                search: args.search,
                limit: args.limit,
            };
            let orgs: Vec<Organization> = session
                .load(
                    "organizations",
                    "Failed to load organizations",
                    api.list_organizations(&query),
                )
                .await?;
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("id", "ID", 16),
                ColumnDef::new("name", "NAME", 28),
                ColumnDef::new("status", "STATUS", 9),
                ColumnDef::new("plan", "PLAN", 12),
                ColumnDef::new("members", "MEMBERS", 7),
                ColumnDef::new("mrr", "MRR", 10),
                ColumnDef::new("created", "CREATED", 10),
            ];
            print_list(&orgs, session.format, COLUMNS, "organization", |o| {
                TableRow::new(o.id.clone())
                    .cell("id", CellValue::Id(o.id.clone()))
                    .cell("name", CellValue::Text(o.name.clone()))
                    .cell("status", CellValue::Badge(o.status.to_string(), o.status.color()))
                    .cell("plan", CellValue::OptionalText(o.plan.clone()))
                    .cell("members", CellValue::Number(i64::from(o.member_count)))
                    .cell("mrr", CellValue::Currency(o.mrr))
                    .cell("created", CellValue::date_opt(o.created_at))
            })
        }
        AdminCommands::Org { id } => {
            let org = api
                .get_organization(&id)
                .await
                .map_err(api_error("Failed to load organization"))?;
            show_organization(&org, session.format)
        }
        AdminCommands::SetStatus(args) => {
            let update = OrganizationStatusUpdate {
                status: args.status,
                reason: args.reason,
            };
            let org = api
                .update_organization_status(&args.id, &update)
                .await
                .map_err(api_error("Failed to update organization"))?;
            session.success(format!(
                "{} is now {}",
                style(&org.name).cyan(),
                paint(org.status, org.status.color())
            ));
            Ok(())
        }
        AdminCommands::Users(args) => {
            let query = UserQuery {
                organization_id: args.org,
                search: args.search,
                limit: args.limit,
            };
            let users = api
                .list_users(&query)
                .await
                .map_err(api_error("Failed to load users"))?;
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("id", "ID", 16),
                ColumnDef::new("email", "EMAIL", 32),
                ColumnDef::new("name", "NAME", 20),
                ColumnDef::new("org", "ORGANIZATION", 22),
                ColumnDef::new("active", "ACTIVE", 6),
                ColumnDef::new("login", "LAST LOGIN", 10),
            ];
            print_list(&users, session.format, COLUMNS, "user", |u| {
                let email = if u.is_superadmin {
                    CellValue::Badge(u.email.clone(), BadgeColor::Purple)
                } else {
                    CellValue::Text(u.email.clone())
                };
                TableRow::new(u.id.clone())
                    .cell("id", CellValue::Id(u.id.clone()))
                    .cell("email", email)
                    .cell("name", CellValue::OptionalText(u.full_name.clone()))
                    .cell("org", CellValue::OptionalText(u.organization_name.clone()))
                    .cell("active", CellValue::Flag(u.is_active))
                    .cell("login", CellValue::date_opt(u.last_login_at))
            })
        }
        AdminCommands::Audit(args) => {
            let query = AuditLogQuery {
                organization_id: args.org,
                action: args.action,
                limit: Some(args.limit),
            };
            let entries = api
                .list_audit_log(&query)
                .await
                .map_err(api_error("Failed to load audit log"))?;
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("when", "WHEN", 16),
                ColumnDef::new("actor", "ACTOR", 28),
                ColumnDef::new("action", "ACTION", 24),
                ColumnDef::new("target", "TARGET", 20),
                ColumnDef::new("ip", "IP", 15),
            ];
            print_list(&entries, session.format, COLUMNS, "audit entry", |e| {
                TableRow::new(e.id.clone())
                    .cell("when", CellValue::DateTime(e.created_at))
                    .cell("actor", CellValue::Text(e.actor_email.clone()))
                    .cell("action", CellValue::Text(e.action.clone()))
                    .cell("target", CellValue::OptionalText(e.target.clone()))
                    .cell("ip", CellValue::OptionalText(e.ip_address.clone()))
            })
        }
        AdminCommands::Health => {
            let health = api
                .get_system_health()
                .await
                .map_err(api_error("Failed to load system health"))?;
            if session.format.is_structured() {
                return print_structured(&health, session.format);
            }
            println!(
                "{}: {}",
                style("Overall").bold(),
                paint(health.status, health.status.color()).bold()
            );
            println!();
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("service", "SERVICE", 20),
                ColumnDef::new("status", "STATUS", 9),
                ColumnDef::new("latency", "LATENCY MS", 10),
                ColumnDef::new("message", "MESSAGE", 40),
            ];
            let rows: Vec<TableRow> = health
                .services
                .iter()
                .map(|s| {
                    TableRow::new(s.name.clone())
                        .cell("service", CellValue::Text(s.name.clone()))
                        .cell("status", CellValue::Badge(s.status.to_string(), s.status.color()))
                        .cell("latency", CellValue::float_opt(s.latency_ms, 0))
                        .cell("message", CellValue::OptionalText(s.message.clone()))
                })
                .collect();
            TableFormatter::new(COLUMNS, "service")
                .without_summary()
                .output(&rows, session.format);
            Ok(())
        }
    }
}

fn show_organization(org: &Organization, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Id => {
            println!("{}", org.id);
            return Ok(());
        }
        f if f.is_structured() => return print_structured(org, f),
        _ => {}
    }

    rule();
    field("ID", style(&org.id).cyan());
    field("Name", style(&org.name).yellow());
    field("Status", paint(org.status, org.status.color()));
    if let Some(plan) = &org.plan {
        field("Plan", plan);
    }
    field("Members", org.member_count);
    field("MRR", format_compact_currency(org.mrr, "$"));
    if let Some(created) = org.created_at {
        field("Created", created.format("%Y-%m-%d"));
    }
    rule();
    Ok(())
}
