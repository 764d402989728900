//! `pulse lss` command - lean six sigma projects and kaizen events

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use console::style;
use miette::Result;

use crate::cli::commands::utils::{
    api_error, field, print_list, print_structured, rule, section, Session,
};
use crate::cli::helpers::split_list;
use crate::cli::table::{paint, CellValue, ColumnDef, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::presentation::{format_compact_currency, format_currency, BadgeColor};
use crate::entities::analytics::ListQuery;
use crate::entities::lean_six_sigma::{
    CreateKaizenRequest, CreateProjectRequest, DmaicPhase, KaizenEvent, LssDashboard, LssProject,
    PhaseUpdate, ProjectQuery, ProjectStatus,
};

#[derive(Subcommand, Debug)]
pub enum LssCommands {
    /// Program dashboard: savings, sigma level, projects per phase
    Dashboard,

    /// List DMAIC projects
    Projects(ProjectsArgs),

    /// Show a project
    Project { id: String },

    /// Start a DMAIC project
    NewProject(NewProjectArgs),

    /// Move a project to the next (or a given) DMAIC phase
    Advance(AdvanceArgs),

    /// Kaizen events
    #[command(subcommand)]
    Kaizen(KaizenCommands),
}

#[derive(Subcommand, Debug)]
pub enum KaizenCommands {
    /// List kaizen events
    List {
        #[arg(long, short = 'n')]
        limit: Option<u32>,
    },
    /// Plan a kaizen event
    Create(NewKaizenArgs),
}

#[derive(Args, Debug)]
pub struct ProjectsArgs {
    #[arg(long, short = 'p')]
    pub phase: Option<DmaicPhase>,

    #[arg(long, short = 's')]
    pub status: Option<ProjectStatus>,

    #[arg(long, short = 'n')]
    pub limit: Option<u32>,
}

#[derive(Args, Debug)]
pub struct NewProjectArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub problem: String,

    #[arg(long)]
    pub champion: Option<String>,

    /// Green belt, black belt, ...
    #[arg(long)]
    pub belt: Option<String>,

    /// Estimated annual savings
    #[arg(long)]
    pub savings: Option<f64>,

    /// Target completion date (YYYY-MM-DD)
    #[arg(long)]
    pub target_date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct AdvanceArgs {
    /// Project ID
    pub id: String,

    /// Phase to move to (default: the next phase)
    #[arg(long)]
    pub to: Option<DmaicPhase>,

    /// Tollgate notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct NewKaizenArgs {
    #[arg(long)]
    pub title: String,

    /// Work area or cell
    #[arg(long)]
    pub area: String,

    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Last day (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Team members, comma-separated
    #[arg(long)]
    pub team: Option<String>,

    /// Objectives, comma-separated
    #[arg(long)]
    pub objectives: Option<String>,
}

/// Run a lean six sigma subcommand
pub async fn run(cmd: LssCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let api = session.client.lean_six_sigma();

    match cmd {
        LssCommands::Dashboard => {
            let dashboard: LssDashboard = session
                .load("lss_dashboard", "Failed to load dashboard", api.get_dashboard())
                .await?;
            show_dashboard(&dashboard, session.format)
        }
        LssCommands::Projects(args) => {
            let query = ProjectQuery {
                phase: args.phase,
                status: args.status,
                limit: args.limit,
            };
            let projects: Vec<LssProject> = session
                .load("lss_projects", "Failed to load projects", api.list_projects(&query))
                .await?;
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("id", "ID", 16),
                ColumnDef::new("name", "NAME", 30),
                ColumnDef::new("phase", "PHASE", 8),
                ColumnDef::new("status", "STATUS", 10),
                ColumnDef::new("champion", "CHAMPION", 18),
                ColumnDef::new("savings", "EST. SAVINGS", 12),
                ColumnDef::new("target", "TARGET", 10),
            ];
            print_list(&projects, session.format, COLUMNS, "project", |p| {
                TableRow::new(p.id.clone())
                    .cell("id", CellValue::Id(p.id.clone()))
                    .cell("name", CellValue::Text(p.name.clone()))
                    .cell("phase", CellValue::Badge(p.phase.to_string(), BadgeColor::Blue))
                    .cell(
                        "status",
                        CellValue::Badge(p.status.to_string(), status_color(p.status)),
                    )
                    .cell("champion", CellValue::OptionalText(p.champion.clone()))
                    .cell(
                        "savings",
                        p.estimated_savings
                            .map_or(CellValue::Empty, CellValue::Currency),
                    )
                    .cell("target", CellValue::day_opt(p.target_date))
            })
        }
        LssCommands::Project { id } => {
            let project = api
                .get_project(&id)
                .await
                .map_err(api_error("Failed to load project"))?;
            show_project(&project, &session)
        }
        LssCommands::NewProject(args) => {
            let req = CreateProjectRequest {
                name: args.name,
                problem_statement: args.problem,
                champion: args.champion,
                belt_level: args.belt,
                estimated_savings: args.savings,
                target_date: args.target_date,
            };
            let project = api
                .create_project(&req)
                .await
                .map_err(api_error("Failed to create project"))?;
            session.success(format!("Created project {}", style(&project.id).cyan()));
            show_project(&project, &session)
        }
        LssCommands::Advance(args) => {
            let phase = match args.to {
                Some(phase) => phase,
                None => {
                    let current = api
                        .get_project(&args.id)
                        .await
                        .map_err(api_error("Failed to load project"))?;
                    current.phase.next().ok_or_else(|| {
                        miette::miette!(
                            "Project {} is already in the control phase",
                            current.id
                        )
                    })?
                }
            };
            let update = PhaseUpdate {
                phase,
                notes: args.notes,
            };
            let project = api
                .advance_phase(&args.id, &update)
                .await
                .map_err(api_error("Failed to update project phase"))?;
            session.success(format!(
                "{} moved to {}",
                style(&project.name).cyan(),
                style(project.phase).bold()
            ));
            if session.format.is_structured() {
                print_structured(&project, session.format)?;
            }
            Ok(())
        }
        LssCommands::Kaizen(KaizenCommands::List { limit }) => {
            let events = api
                .list_kaizen_events(&ListQuery { limit })
                .await
                .map_err(api_error("Failed to load kaizen events"))?;
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("id", "ID", 16),
                ColumnDef::new("title", "TITLE", 30),
                ColumnDef::new("area", "AREA", 16),
                ColumnDef::new("start", "START", 10),
                ColumnDef::new("end", "END", 10),
                ColumnDef::new("team", "TEAM", 5),
            ];
            print_list(&events, session.format, COLUMNS, "kaizen event", |e: &KaizenEvent| {
                TableRow::new(e.id.clone())
                    .cell("id", CellValue::Id(e.id.clone()))
                    .cell("title", CellValue::Text(e.title.clone()))
                    .cell("area", CellValue::Text(e.area.clone()))
                    .cell("start", CellValue::Day(e.start_date))
                    .cell("end", CellValue::day_opt(e.end_date))
                    .cell("team", CellValue::Number(e.team.len() as i64))
            })
        }
        LssCommands::Kaizen(KaizenCommands::Create(args)) => {
            let req = CreateKaizenRequest {
                title: args.title,
                area: args.area,
                start_date: args.start,
                end_date: args.end,
                team: split_list(args.team.as_deref()),
                objectives: split_list(args.objectives.as_deref()),
            };
            let event = api
                .create_kaizen_event(&req)
                .await
                .map_err(api_error("Failed to create kaizen event"))?;
            match session.format {
                OutputFormat::Id => println!("{}", event.id),
                f if f.is_structured() => print_structured(&event, f)?,
                _ => session.success(format!(
                    "Planned {} in {} starting {}",
                    style(&event.title).cyan(),
                    event.area,
                    event.start_date
                )),
            }
            Ok(())
        }
    }
}

fn status_color(status: ProjectStatus) -> BadgeColor {
    match status {
        ProjectStatus::Active => BadgeColor::Green,
        ProjectStatus::OnHold => BadgeColor::Yellow,
        ProjectStatus::Completed => BadgeColor::Blue,
        ProjectStatus::Cancelled => BadgeColor::Gray,
    }
}

/// `define > measure > [analyze] > improve > control`
fn phase_track(current: DmaicPhase) -> String {
    DmaicPhase::ALL
        .iter()
        .map(|&p| {
            if p == current {
                style(format!("[{}]", p)).cyan().bold().to_string()
            } else if p < current {
                style(p.to_string()).green().to_string()
            } else {
                style(p.to_string()).dim().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" > ")
}

fn show_dashboard(dashboard: &LssDashboard, format: OutputFormat) -> Result<()> {
    if format.is_structured() {
        return print_structured(dashboard, format);
    }

    rule();
    field("Active projects", dashboard.active_projects);
    field("Completed projects", dashboard.completed_projects);
    field(
        "Total savings",
        format!(
            "{} {}",
            style(format_compact_currency(dashboard.total_savings, "$")).bold(),
            paint(
                format!("{:+.1}%", dashboard.savings_change),
                dashboard.savings_trend()
            )
        ),
    );
    if let Some(sigma) = dashboard.average_sigma_level {
        field("Average sigma", format!("{:.2}", sigma));
    }
    field("Upcoming kaizen events", dashboard.upcoming_kaizen_events);
    rule();

    if !dashboard.projects_by_phase.is_empty() {
        section("Projects by phase");
        let max = dashboard
            .projects_by_phase
            .iter()
            .map(|p| p.count)
            .max()
            .unwrap_or(0)
            .max(1);
        for entry in &dashboard.projects_by_phase {
            let bar = "█".repeat((entry.count * 30 / max) as usize);
            println!(
                "  {:<8} {:>3} {}",
                entry.phase.to_string(),
                entry.count,
                style(bar).cyan()
            );
        }
    }
    Ok(())
}

fn show_project(project: &LssProject, session: &Session) -> Result<()> {
    match session.format {
        OutputFormat::Id => {
            println!("{}", project.id);
            return Ok(());
        }
        f if f.is_structured() => return print_structured(project, f),
        _ => {}
    }
    if session.quiet {
        return Ok(());
    }

    rule();
    field("ID", style(&project.id).cyan());
    field("Name", style(&project.name).yellow());
    field("Status", paint(project.status, status_color(project.status)));
    field(
        "Phase",
        format!(
            "{} ({:.0}%)",
            phase_track(project.phase),
            project.progress_percent()
        ),
    );
    if let Some(champion) = &project.champion {
        field("Champion", champion);
    }
    if let Some(belt) = &project.belt_level {
        field("Belt", belt);
    }
    if let Some(est) = project.estimated_savings {
        field("Estimated savings", format_currency(est, "$"));
    }
    if let Some(actual) = project.actual_savings {
        field("Actual savings", format_currency(actual, "$"));
    }
    if let Some(target) = project.target_date {
        field("Target date", target);
    }
    rule();
    println!("{}", project.problem_statement);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_track_marks_current() {
        console::set_colors_enabled(false);
        assert_eq!(
            phase_track(DmaicPhase::Analyze),
            "define > measure > [analyze] > improve > control"
        );
    }
}
