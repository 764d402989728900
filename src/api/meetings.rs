//! `/meetings` contract: meetings and their transcription artifacts

use crate::core::client::{ApiClient, ApiResult};
use crate::entities::meeting::{
    ActionItem, CreateMeetingRequest, Meeting, MeetingListQuery, MeetingSummary, Transcript,
    TranscriptionJob, TranscriptionRequest,
};

const BASE: &str = "/meetings";

pub struct MeetingsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MeetingsApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_meetings(&self, query: &MeetingListQuery) -> ApiResult<Vec<Meeting>> {
        self.client.get_with(BASE, query).await
    }

    pub async fn get_meeting(&self, id: &str) -> ApiResult<Meeting> {
        self.client.get(&format!("{BASE}/{id}")).await
    }

    pub async fn create_meeting(&self, req: &CreateMeetingRequest) -> ApiResult<Meeting> {
        self.client.post(BASE, req).await
    }

    pub async fn delete_meeting(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&format!("{BASE}/{id}")).await
    }

    /// Queue transcription of the meeting recording
    pub async fn start_transcription(
        &self,
        id: &str,
        req: &TranscriptionRequest,
    ) -> ApiResult<TranscriptionJob> {
        self.client.post(&format!("{BASE}/{id}/transcribe"), req).await
    }

    pub async fn get_transcript(&self, id: &str) -> ApiResult<Transcript> {
        self.client.get(&format!("{BASE}/{id}/transcript")).await
    }

    pub async fn get_summary(&self, id: &str) -> ApiResult<MeetingSummary> {
        self.client.get(&format!("{BASE}/{id}/summary")).await
    }

    pub async fn list_action_items(&self, id: &str) -> ApiResult<Vec<ActionItem>> {
        self.client.get(&format!("{BASE}/{id}/action-items")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use crate::core::client::{ApiResponse, Method};
    use crate::entities::meeting::TranscriptionStatus;
    use serde_json::json;

    #[tokio::test]
    async fn test_start_transcription() {
        let mock = MockTransport::new();
        mock.respond(ApiResponse::json(
            202,
            &json!({"meeting_id": "m1", "status": "queued", "job_id": "j-77"}),
        ));
        let client = mock.client();

        let req = TranscriptionRequest {
            recording_url: None,
            language: Some("en".to_string()),
        };
        let job = client.meetings().start_transcription("m1", &req).await.unwrap();
        assert_eq!(job.status, TranscriptionStatus::Queued);

        let sent = mock.only_request();
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.path, "/meetings/m1/transcribe");
        assert_eq!(sent.body, Some(json!({"language": "en"})));
    }

    #[tokio::test]
    async fn test_list_meetings_at_base_path() {
        let mock = MockTransport::new();
        mock.respond(ApiResponse::json(200, &json!([])));
        let client = mock.client();

        let query = MeetingListQuery {
            transcription_status: Some(TranscriptionStatus::Completed),
            ..Default::default()
        };
        client.meetings().list_meetings(&query).await.unwrap();

        let sent = mock.only_request();
        assert_eq!(sent.path, "/meetings");
        assert_eq!(
            sent.query,
            vec![("transcription_status".to_string(), "completed".to_string())]
        );
    }

    #[tokio::test]
    async fn test_action_items_path() {
        let mock = MockTransport::new();
        mock.respond(ApiResponse::json(
            200,
            &json!([{"id": "ai1", "description": "Send minutes", "assignee": "Lee"}]),
        ));
        let client = mock.client();

        let items = client.meetings().list_action_items("m1").await.unwrap();
        assert!(!items[0].completed);
        assert_eq!(mock.only_request().path, "/meetings/m1/action-items");
    }
}
