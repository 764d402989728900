//! `pulse gov` command - boards, meetings, resolutions, votes, compliance

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Subcommand};
use console::style;
use miette::Result;

use crate::cli::commands::utils::{
    api_error, field, print_list, print_structured, rule, section, Session,
};
use crate::cli::helpers::split_list;
use crate::cli::table::{paint, CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::presentation::{format_percent, BadgeColor, RiskLevel};
use crate::entities::governance::{
    Board, BoardMeeting, BoardMeetingStatus, ComplianceItem, ComplianceQuery, ComplianceStatus,
    CreateBoardMeetingRequest, CreateResolutionRequest, GovernanceDashboard, MeetingQuery,
    Resolution, ResolutionQuery, ResolutionStatus, Vote, VoteRequest,
};

#[derive(Subcommand, Debug)]
pub enum GovCommands {
    /// Governance dashboard
    Dashboard,

    /// List boards
    Boards,

    /// Show a board and its members
    Board { id: String },

    /// List board meetings
    Meetings(MeetingsArgs),

    /// Schedule a board meeting
    Schedule(ScheduleArgs),

    /// List resolutions
    Resolutions(ResolutionsArgs),

    /// Show a resolution with its vote tally
    Resolution { id: String },

    /// Propose a resolution
    Propose(ProposeArgs),

    /// Cast a vote on a resolution
    Vote(VoteArgs),

    /// List compliance items
    Compliance(ComplianceArgs),
}

#[derive(Args, Debug)]
pub struct MeetingsArgs {
    /// Only meetings of this board
    #[arg(long, short = 'b')]
    pub board: Option<String>,

    #[arg(long, short = 's')]
    pub status: Option<BoardMeetingStatus>,

    /// Earliest date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    #[arg(long, short = 'n')]
    pub limit: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Board ID
    #[arg(long, short = 'b')]
    pub board: String,

    #[arg(long)]
    pub title: String,

    /// Start time (RFC 3339, e.g. 2024-06-12T14:00:00Z)
    #[arg(long)]
    pub at: DateTime<Utc>,

    #[arg(long)]
    pub location: Option<String>,

    /// Agenda items, comma-separated
    #[arg(long)]
    pub agenda: Option<String>,
}

#[derive(Args, Debug)]
pub struct ResolutionsArgs {
    #[arg(long, short = 'b')]
    pub board: Option<String>,

    #[arg(long, short = 's')]
    pub status: Option<ResolutionStatus>,

    #[arg(long, short = 'n')]
    pub limit: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ProposeArgs {
    #[arg(long, short = 'b')]
    pub board: String,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Voting closes at (RFC 3339)
    #[arg(long)]
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
pub struct VoteArgs {
    /// Resolution ID
    pub id: String,

    /// Your vote
    pub vote: Vote,

    /// Comments recorded with the vote
    #[arg(long, short = 'c')]
    pub comments: Option<String>,
}

#[derive(Args, Debug)]
pub struct ComplianceArgs {
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long, short = 's')]
    pub status: Option<ComplianceStatus>,

    #[arg(long, short = 'r')]
    pub risk: Option<RiskLevel>,

    #[arg(long, short = 'n')]
    pub limit: Option<u32>,
}

const RESOLUTION_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("title", "TITLE", 36),
    ColumnDef::new("status", "STATUS", 9),
    ColumnDef::new("votes", "FOR/AGN/ABS", 11),
    ColumnDef::new("approval", "APPROVAL", 8),
    ColumnDef::new("deadline", "DEADLINE", 10),
];

/// Run a governance subcommand
pub async fn run(cmd: GovCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let api = session.client.governance();

    match cmd {
        GovCommands::Dashboard => {
            let dashboard: GovernanceDashboard = session
                .load(
                    "governance_dashboard",
                    "Failed to load governance dashboard",
                    api.get_dashboard(),
                )
                .await?;
            show_dashboard(&dashboard, &session)
        }
        GovCommands::Boards => {
            let boards: Vec<Board> = session
                .load("boards", "Failed to load boards", api.list_boards())
                .await?;
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("id", "ID", 16),
                ColumnDef::new("name", "NAME", 30),
                ColumnDef::new("members", "MEMBERS", 7),
                ColumnDef::new("next", "NEXT MEETING", 12),
            ];
            print_list(&boards, session.format, COLUMNS, "board", |b| {
                TableRow::new(b.id.clone())
                    .cell("id", CellValue::Id(b.id.clone()))
                    .cell("name", CellValue::Text(b.name.clone()))
                    .cell("members", CellValue::Number(i64::from(b.member_count)))
                    .cell("next", CellValue::date_opt(b.next_meeting_at))
            })
        }
        GovCommands::Board { id } => {
            let (board, members) = tokio::try_join!(api.get_board(&id), api.list_board_members(&id))
                .map_err(api_error("Failed to load board"))?;
            if session.format.is_structured() {
                let both = serde_json::json!({ "board": board, "members": members });
                return print_structured(&both, session.format);
            }
            rule();
            field("ID", style(&board.id).cyan());
            field("Name", style(&board.name).yellow());
            if let Some(desc) = &board.description {
                field("Description", desc);
            }
            if let Some(next) = board.next_meeting_at {
                field("Next meeting", next.format("%Y-%m-%d %H:%M"));
            }
            rule();
            section(&format!("Members ({})", members.len()));
            for m in &members {
                let position = m.position.as_deref().unwrap_or("member");
                let voting = if m.is_voting { "" } else { " (non-voting)" };
                println!(
                    "  {:<24} {}{}",
                    m.name,
                    style(position).dim(),
                    style(voting).dim()
                );
            }
            Ok(())
        }
        GovCommands::Meetings(args) => {
            let query = MeetingQuery {
                board_id: args.board,
                status: args.status,
                from_date: args.from,
                to_date: args.to,
                limit: args.limit,
            };
            let meetings: Vec<BoardMeeting> = session
                .load(
                    "board_meetings",
                    "Failed to load board meetings",
                    api.list_meetings(&query),
                )
                .await?;
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("id", "ID", 16),
                ColumnDef::new("title", "TITLE", 32),
                ColumnDef::new("board", "BOARD", 16),
                ColumnDef::new("when", "WHEN", 16),
                ColumnDef::new("status", "STATUS", 11),
                ColumnDef::new("location", "LOCATION", 18),
            ];
            print_list(&meetings, session.format, COLUMNS, "meeting", |m| {
                TableRow::new(m.id.clone())
                    .cell("id", CellValue::Id(m.id.clone()))
                    .cell("title", CellValue::Text(m.title.clone()))
                    .cell("board", CellValue::Id(m.board_id.clone()))
                    .cell("when", CellValue::DateTime(m.scheduled_at))
                    .cell(
                        "status",
                        CellValue::Badge(m.status.to_string(), meeting_status_color(m.status)),
                    )
                    .cell("location", CellValue::OptionalText(m.location.clone()))
            })
        }
        GovCommands::Schedule(args) => {
            let req = CreateBoardMeetingRequest {
                board_id: args.board,
                title: args.title,
                scheduled_at: args.at,
                location: args.location,
                agenda: split_list(args.agenda.as_deref()),
            };
            let meeting = api
                .create_meeting(&req)
                .await
                .map_err(api_error("Failed to schedule meeting"))?;
            match session.format {
                OutputFormat::Id => println!("{}", meeting.id),
                f if f.is_structured() => print_structured(&meeting, f)?,
                _ => session.success(format!(
                    "Scheduled {} for {}",
                    style(&meeting.title).cyan(),
                    meeting.scheduled_at.format("%Y-%m-%d %H:%M")
                )),
            }
            Ok(())
        }
        GovCommands::Resolutions(args) => {
            let query = ResolutionQuery {
                board_id: args.board,
                status: args.status,
                limit: args.limit,
            };
            let resolutions: Vec<Resolution> = session
                .load(
                    "resolutions",
                    "Failed to load resolutions",
                    api.list_resolutions(&query),
                )
                .await?;
            print_list(
                &resolutions,
                session.format,
                RESOLUTION_COLUMNS,
                "resolution",
                resolution_row,
            )
        }
        GovCommands::Resolution { id } => {
            let resolution = api
                .get_resolution(&id)
                .await
                .map_err(api_error("Failed to load resolution"))?;
            show_resolution(&resolution, &session)
        }
        GovCommands::Propose(args) => {
            let req = CreateResolutionRequest {
                board_id: args.board,
                title: args.title,
                description: args.description,
                voting_deadline: args.deadline,
            };
            let resolution = api
                .create_resolution(&req)
                .await
                .map_err(api_error("Failed to create resolution"))?;
            session.success(format!(
                "Proposed resolution {}",
                style(&resolution.id).cyan()
            ));
            show_resolution(&resolution, &session)
        }
        GovCommands::Vote(args) => {
            let req = VoteRequest {
                vote: args.vote,
                comments: args.comments,
            };
            let resolution = api
                .cast_vote(&args.id, &req)
                .await
                .map_err(api_error("Failed to cast vote"))?;
            session.success(format!(
                "Voted {} on {}",
                style(args.vote).bold(),
                style(&resolution.title).cyan()
            ));
            show_resolution(&resolution, &session)
        }
        GovCommands::Compliance(args) => {
            let query = ComplianceQuery {
                category: args.category,
                status: args.status,
                risk_level: args.risk,
                limit: args.limit,
            };
            let items: Vec<ComplianceItem> = session
                .load(
                    "compliance",
                    "Failed to load compliance items",
                    api.list_compliance_items(&query),
                )
                .await?;
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("id", "ID", 16),
                ColumnDef::new("title", "TITLE", 34),
                ColumnDef::new("category", "CATEGORY", 14),
                ColumnDef::new("status", "STATUS", 13),
                ColumnDef::new("risk", "RISK", 8),
                ColumnDef::new("owner", "OWNER", 16),
                ColumnDef::new("due", "DUE", 10),
            ];
            print_list(&items, session.format, COLUMNS, "compliance item", |c| {
                TableRow::new(c.id.clone())
                    .cell("id", CellValue::Id(c.id.clone()))
                    .cell("title", CellValue::Text(c.title.clone()))
                    .cell("category", CellValue::Text(c.category.clone()))
                    .cell("status", CellValue::Badge(c.status.to_string(), c.status.color()))
                    .cell(
                        "risk",
                        CellValue::Badge(c.risk_level.to_string(), c.risk_level.color()),
                    )
                    .cell("owner", CellValue::OptionalText(c.owner.clone()))
                    .cell("due", CellValue::day_opt(c.due_date))
            })
        }
    }
}

fn meeting_status_color(status: BoardMeetingStatus) -> BadgeColor {
    match status {
        BoardMeetingStatus::Scheduled => BadgeColor::Blue,
        BoardMeetingStatus::InProgress => BadgeColor::Yellow,
        BoardMeetingStatus::Completed => BadgeColor::Green,
        BoardMeetingStatus::Cancelled => BadgeColor::Gray,
    }
}

fn resolution_row(r: &Resolution) -> TableRow {
    TableRow::new(r.id.clone())
        .cell("id", CellValue::Id(r.id.clone()))
        .cell("title", CellValue::Text(r.title.clone()))
        .cell("status", CellValue::Badge(r.status.to_string(), r.status.color()))
        .cell(
            "votes",
            CellValue::Text(format!(
                "{}/{}/{}",
                r.votes.votes_for, r.votes.against, r.votes.abstain
            )),
        )
        .cell("approval", CellValue::Percent(r.votes.approval_percent()))
        .cell("deadline", CellValue::date_opt(r.voting_deadline))
}

fn show_dashboard(dashboard: &GovernanceDashboard, session: &Session) -> Result<()> {
    if session.format.is_structured() {
        return print_structured(dashboard, session.format);
    }

    let score_color = if dashboard.compliance_score >= 90.0 {
        BadgeColor::Green
    } else if dashboard.compliance_score >= 75.0 {
        BadgeColor::Yellow
    } else {
        BadgeColor::Red
    };

    rule();
    field("Boards", dashboard.total_boards);
    field("Upcoming meetings", dashboard.upcoming_meetings);
    field("Open resolutions", dashboard.open_resolutions);
    field(
        "Compliance",
        paint(format_percent(dashboard.compliance_score), score_color),
    );
    if dashboard.high_risk_items > 0 {
        field("High-risk items", style(dashboard.high_risk_items).red());
    }
    rule();

    if !dashboard.recent_resolutions.is_empty() {
        section("Recent resolutions");
        let rows: Vec<TableRow> = dashboard
            .recent_resolutions
            .iter()
            .map(resolution_row)
            .collect();
        TableFormatter::new(RESOLUTION_COLUMNS, "resolution")
            .without_summary()
            .output(&rows, session.format);
    }
    Ok(())
}

fn show_resolution(r: &Resolution, session: &Session) -> Result<()> {
    match session.format {
        OutputFormat::Id => {
            println!("{}", r.id);
            return Ok(());
        }
        f if f.is_structured() => return print_structured(r, f),
        _ => {}
    }
    if session.quiet {
        return Ok(());
    }

    rule();
    field("ID", style(&r.id).cyan());
    field("Title", style(&r.title).yellow());
    field("Board", &r.board_id);
    field("Status", paint(r.status, r.status.color()));
    if let Some(by) = &r.proposed_by {
        field("Proposed by", by);
    }
    if let Some(deadline) = r.voting_deadline {
        field("Voting closes", deadline.format("%Y-%m-%d %H:%M"));
    }
    rule();

    if let Some(desc) = &r.description {
        println!("{}", desc);
    }

    let votes = &r.votes;
    section(&format!("Votes ({})", votes.total()));
    println!("  {:<8} {}", style("for").green(), votes.votes_for);
    println!("  {:<8} {}", style("against").red(), votes.against);
    println!("  {:<8} {}", style("abstain").dim(), votes.abstain);
    if let Some(approval) = votes.approval_percent() {
        println!("  approval {}", format_percent(approval));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::governance::VoteTally;

    #[test]
    fn test_resolution_row_tally() {
        let r = Resolution {
            id: "res-1".to_string(),
            board_id: "brd-1".to_string(),
            title: "Approve FY25 capex".to_string(),
            description: None,
            status: ResolutionStatus::Voting,
            votes: VoteTally {
                votes_for: 3,
                against: 1,
                abstain: 1,
            },
            proposed_by: None,
            voting_deadline: None,
            created_at: None,
        };
        let row = resolution_row(&r);
        assert_eq!(row.get("votes").unwrap().raw(), "3/1/1");
        assert_eq!(row.get("approval").unwrap().raw(), "75.0%");
    }
}
