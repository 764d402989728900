//! Meeting transcription shapes

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionStatus {
    #[default]
    None,
    Queued,
    Processing,
    Completed,
    Failed,
}

impl TranscriptionStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, TranscriptionStatus::Completed | TranscriptionStatus::Failed)
    }
}

impl std::fmt::Display for TranscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptionStatus::None => write!(f, "none"),
            TranscriptionStatus::Queued => write!(f, "queued"),
            TranscriptionStatus::Processing => write!(f, "processing"),
            TranscriptionStatus::Completed => write!(f, "completed"),
            TranscriptionStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub transcription_status: TranscriptionStatus,
    #[serde(default)]
    pub recording_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMeetingRequest {
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionJob {
    pub meeting_id: String,
    pub status: TranscriptionStatus,
    #[serde(default)]
    pub job_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub speaker: String,
    /// Offset from the start of the recording, seconds
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub meeting_id: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Distinct speakers in order of first appearance
    pub fn speakers(&self) -> Vec<&str> {
        let mut speakers: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if !speakers.contains(&segment.speaker.as_str()) {
                speakers.push(&segment.speaker);
            }
        }
        speakers
    }

    /// Plain text, one `speaker: text` line per segment
    pub fn to_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("{}: {}", s.speaker, s.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingSummary {
    pub meeting_id: String,
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub decisions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MeetingListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription_status: Option<TranscriptionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transcript() -> Transcript {
        serde_json::from_value(json!({
            "meeting_id": "m1",
            "segments": [
                {"speaker": "Dana", "start": 0.0, "end": 4.2, "text": "Let's start."},
                {"speaker": "Lee", "start": 4.2, "end": 9.0, "text": "Scrap is down."},
                {"speaker": "Dana", "start": 9.0, "end": 11.5, "text": "Good."}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_speakers_first_seen() {
        assert_eq!(transcript().speakers(), vec!["Dana", "Lee"]);
    }

    #[test]
    fn test_transcript_text() {
        let text = transcript().to_text();
        assert!(text.starts_with("Dana: Let's start.\nLee:"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_meeting_defaults_to_no_transcription() {
        let meeting: Meeting = serde_json::from_value(json!({
            "id": "m1",
            "title": "Weekly ops",
            "scheduled_at": "2024-05-06T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(meeting.transcription_status, TranscriptionStatus::None);
        assert!(!meeting.transcription_status.is_finished());
    }
}
