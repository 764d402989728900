//! `pulse meetings` command - meetings, transcripts, summaries, action items

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Subcommand};
use console::style;
use miette::Result;

use crate::cli::commands::utils::{
    api_error, field, print_list, print_structured, rule, section, Session,
};
use crate::cli::helpers::split_list;
use crate::cli::table::{paint, CellValue, ColumnDef, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::presentation::BadgeColor;
use crate::entities::meeting::{
    CreateMeetingRequest, Meeting, MeetingListQuery, TranscriptionRequest, TranscriptionStatus,
};

#[derive(Subcommand, Debug)]
pub enum MeetingCommands {
    /// List meetings
    List(ListArgs),

    /// Show a meeting
    Show { id: String },

    /// Create a meeting
    Create(CreateArgs),

    /// Delete a meeting
    Delete { id: String },

    /// Queue transcription of a meeting recording
    Transcribe(TranscribeArgs),

    /// Print a meeting transcript
    Transcript {
        id: String,
        /// Plain `speaker: text` lines without timestamps
        #[arg(long)]
        plain: bool,
    },

    /// Show the generated meeting summary
    Summary { id: String },

    /// List action items extracted from a meeting
    Actions { id: String },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by transcription status
    #[arg(long, short = 's')]
    pub status: Option<TranscriptionStatus>,

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
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,

    /// Start time (RFC 3339)
    #[arg(long)]
    pub at: DateTime<Utc>,

    /// Planned duration in minutes
    #[arg(long)]
    pub duration: Option<u32>,

    /// Participants, comma-separated
    #[arg(long)]
    pub participants: Option<String>,
}

#[derive(Args, Debug)]
pub struct TranscribeArgs {
    /// Meeting ID
    pub id: String,

    /// Recording URL, when not already attached to the meeting
    #[arg(long)]
    pub recording_url: Option<String>,

    /// Spoken language code (e.g. en)
    #[arg(long)]
    pub language: Option<String>,
}

/// Run a meetings subcommand
pub async fn run(cmd: MeetingCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let api = session.client.meetings();

    match cmd {
        MeetingCommands::List(args) => {
            let query = MeetingListQuery {
                transcription_status: args.status,
                from_date: args.from,
                to_date: args.to,
                limit: args.limit,
            };
            let meetings: Vec<Meeting> = session
                .load("meetings", "Failed to load meetings", api.list_meetings(&query))
                .await?;
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("id", "ID", 16),
                ColumnDef::new("title", "TITLE", 34),
                ColumnDef::new("when", "WHEN", 16),
                ColumnDef::new("duration", "MIN", 4),
                ColumnDef::new("people", "PEOPLE", 6),
                ColumnDef::new("transcript", "TRANSCRIPT", 10),
            ];
            print_list(&meetings, session.format, COLUMNS, "meeting", |m| {
                TableRow::new(m.id.clone())
                    .cell("id", CellValue::Id(m.id.clone()))
                    .cell("title", CellValue::Text(m.title.clone()))
                    .cell("when", CellValue::DateTime(m.scheduled_at))
                    .cell(
                        "duration",
                        m.duration_minutes
                            .map_or(CellValue::Empty, |d| CellValue::Number(i64::from(d))),
                    )
                    .cell("people", CellValue::Number(m.participants.len() as i64))
                    .cell(
                        "transcript",
                        CellValue::Badge(
                            m.transcription_status.to_string(),
                            transcription_color(m.transcription_status),
                        ),
                    )
            })
        }
        MeetingCommands::Show { id } => {
            let meeting = api
                .get_meeting(&id)
                .await
                .map_err(api_error("Failed to load meeting"))?;
            show_meeting(&meeting, &session)
        }
        MeetingCommands::Create(args) => {
            let req = CreateMeetingRequest {
                title: args.title,
                scheduled_at: args.at,
                duration_minutes: args.duration,
                participants: split_list(args.participants.as_deref()),
            };
            let meeting = api
                .create_meeting(&req)
                .await
                .map_err(api_error("Failed to create meeting"))?;
            session.success(format!("Created meeting {}", style(&meeting.id).cyan()));
            show_meeting(&meeting, &session)
        }
        MeetingCommands::Delete { id } => {
            api.delete_meeting(&id)
                .await
                .map_err(api_error("Failed to delete meeting"))?;
            session.success(format!("Deleted meeting {}", style(&id).cyan()));
            Ok(())
        }
        MeetingCommands::Transcribe(args) => {
            let req = TranscriptionRequest {
                recording_url: args.recording_url,
                language: args.language,
            };
            let job = api
                .start_transcription(&args.id, &req)
                .await
                .map_err(api_error("Failed to start transcription"))?;
            if session.format.is_structured() {
                return print_structured(&job, session.format);
            }
            let job_id = job.job_id.as_deref().unwrap_or("-");
            session.success(format!(
                "Transcription {} (job {})",
                style(job.status).yellow(),
                style(job_id).cyan()
            ));
            Ok(())
        }
        MeetingCommands::Transcript { id, plain } => {
            let transcript = api
                .get_transcript(&id)
                .await
                .map_err(api_error("Failed to load transcript"))?;
            if session.format.is_structured() {
                return print_structured(&transcript, session.format);
            }
            if plain {
                println!("{}", transcript.to_text());
                return Ok(());
            }
            rule();
            field("Meeting", style(&transcript.meeting_id).cyan());
            if let Some(lang) = &transcript.language {
                field("Language", lang);
            }
            field("Speakers", transcript.speakers().join(", "));
            rule();
            for seg in &transcript.segments {
                println!(
                    "{} {}: {}",
                    style(format!("[{}]", clock(seg.start))).dim(),
                    style(&seg.speaker).bold(),
                    seg.text
                );
            }
            Ok(())
        }
        MeetingCommands::Summary { id } => {
            let summary = api
                .get_summary(&id)
                .await
                .map_err(api_error("Failed to load summary"))?;
            if session.format.is_structured() {
                return print_structured(&summary, session.format);
            }
            println!("{}", summary.summary);
            if !summary.key_points.is_empty() {
                section("Key points");
                for point in &summary.key_points {
                    println!("  • {}", point);
                }
            }
            if !summary.decisions.is_empty() {
                section("Decisions");
                for decision in &summary.decisions {
                    println!("  • {}", decision);
                }
            }
            Ok(())
        }
        MeetingCommands::Actions { id } => {
            let items = api
                .list_action_items(&id)
                .await
                .map_err(api_error("Failed to load action items"))?;
            const COLUMNS: &[ColumnDef] = &[
                ColumnDef::new("id", "ID", 16),
                ColumnDef::new("description", "DESCRIPTION", 44),
                ColumnDef::new("assignee", "ASSIGNEE", 18),
                ColumnDef::new("due", "DUE", 10),
                ColumnDef::new("done", "DONE", 4),
            ];
            print_list(&items, session.format, COLUMNS, "action item", |a| {
                TableRow::new(a.id.clone())
                    .cell("id", CellValue::Id(a.id.clone()))
                    .cell("description", CellValue::Text(a.description.clone()))
                    .cell("assignee", CellValue::OptionalText(a.assignee.clone()))
                    .cell("due", CellValue::day_opt(a.due_date))
                    .cell("done", CellValue::Flag(a.completed))
            })
        }
    }
}

fn transcription_color(status: TranscriptionStatus) -> BadgeColor {
    match status {
        TranscriptionStatus::None => BadgeColor::Gray,
        TranscriptionStatus::Queued | TranscriptionStatus::Processing => BadgeColor::Yellow,
        TranscriptionStatus::Completed => BadgeColor::Green,
        TranscriptionStatus::Failed => BadgeColor::Red,
    }
}

/// `mm:ss`, or `h:mm:ss` past the first hour
fn clock(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}

fn show_meeting(meeting: &Meeting, session: &Session) -> Result<()> {
    match session.format {
        OutputFormat::Id => {
            println!("{}", meeting.id);
            return Ok(());
        }
        f if f.is_structured() => return print_structured(meeting, f),
        _ => {}
    }
    if session.quiet {
        return Ok(());
    }

    rule();
    field("ID", style(&meeting.id).cyan());
    field("Title", style(&meeting.title).yellow());
    field("When", meeting.scheduled_at.format("%Y-%m-%d %H:%M UTC"));
    if let Some(d) = meeting.duration_minutes {
        field("Duration", format!("{} min", d));
    }
    field(
        "Transcription",
        paint(
            meeting.transcription_status,
            transcription_color(meeting.transcription_status),
        ),
    );
    if let Some(url) = &meeting.recording_url {
        field("Recording", url);
    }
    rule();
    if !meeting.participants.is_empty() {
        section("Participants");
        for p in &meeting.participants {
            println!("  • {}", p);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_formatting() {
        assert_eq!(clock(0.0), "00:00");
        assert_eq!(clock(75.4), "01:15");
        assert_eq!(clock(3725.0), "1:02:05");
        assert_eq!(clock(-3.0), "00:00");
    }

    #[test]
    fn test_in_flight_transcription_is_yellow() {
        assert_eq!(transcription_color(TranscriptionStatus::Queued), BadgeColor::Yellow);
        assert!(!TranscriptionStatus::Processing.is_finished());
    }
}
