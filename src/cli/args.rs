//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    admin::AdminCommands, analytics::AnalyticsCommands, completions::CompletionsArgs,
    config::ConfigCommands, gov::GovCommands, lss::LssCommands, meetings::MeetingCommands,
    parse::ParseArgs, process::ProcessCommands, rating::RatingCommands, team::TeamCommands,
};

#[derive(Parser)]
#[command(name = "pulse")]
#[command(author, version, about = "Pulse AI executive console")]
#[command(long_about = "Command-line console for the Pulse AI dashboard: quality analytics, process maps, board governance, team administration, meetings, and lean six sigma.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Backend API base URL (overrides config and PULSE_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token (overrides config and PULSE_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Show bundled demo data when a list or dashboard fetch fails
    #[arg(long, global = true)]
    pub demo_fallback: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Statistical process control and predictive analytics
    #[command(subcommand)]
    Analytics(AnalyticsCommands),

    /// Process maps (SIPOC, value stream maps, process flows)
    #[command(subcommand)]
    Process(ProcessCommands),

    /// Team members and invitations
    #[command(subcommand)]
    Team(TeamCommands),

    /// Board governance (boards, resolutions, votes, compliance)
    #[command(subcommand)]
    Gov(GovCommands),

    /// Meetings and transcription
    #[command(subcommand)]
    Meetings(MeetingCommands),

    /// Platform administration (super-admin)
    #[command(subcommand)]
    Admin(AdminCommands),

    /// Lean six sigma projects and kaizen events
    #[command(subcommand)]
    Lss(LssCommands),

    /// Parse tabular text input offline and print the structured rows
    Parse(ParseArgs),

    /// Classify metrics with the dashboard's rating thresholds (offline)
    #[command(subcommand)]
    Rating(RatingCommands),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically pick (detail view for single items, table for lists)
    #[default]
    Auto,
    /// Aligned columns (for terminals)
    #[value(alias = "table")]
    Tsv,
    /// JSON format (for programming)
    Json,
    /// YAML format (full fidelity)
    Yaml,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

impl OutputFormat {
    /// JSON and YAML print the raw response shape
    pub fn is_structured(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Yaml)
    }
}
