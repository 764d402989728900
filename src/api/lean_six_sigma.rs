//! `/leansixsigma` contract: DMAIC projects and kaizen events

use crate::core::client::{ApiClient, ApiResult};
use crate::entities::analytics::ListQuery;
use crate::entities::lean_six_sigma::{
    CreateKaizenRequest, CreateProjectRequest, KaizenEvent, LssDashboard, LssProject, PhaseUpdate,
    ProjectQuery,
};

const BASE: &str = "/leansixsigma";

pub struct LeanSixSigmaApi<'a> {
    client: &'a ApiClient,
}

impl<'a> LeanSixSigmaApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_dashboard(&self) -> ApiResult<LssDashboard> {
        self.client.get(&format!("{BASE}/dashboard")).await
    }

    pub async fn list_projects(&self, query: &ProjectQuery) -> ApiResult<Vec<LssProject>> {
        self.client.get_with(&format!("{BASE}/projects"), query).await
    }

    pub async fn get_project(&self, id: &str) -> ApiResult<LssProject> {
        self.client.get(&format!("{BASE}/projects/{id}")).await
    }

    pub async fn create_project(&self, req: &CreateProjectRequest) -> ApiResult<LssProject> {
        self.client.post(&format!("{BASE}/projects"), req).await
    }

    /// Move a project to another DMAIC phase
    pub async fn advance_phase(&self, id: &str, update: &PhaseUpdate) -> ApiResult<LssProject> {
        self.client
            .patch(&format!("{BASE}/projects/{id}/phase"), update)
            .await
    }

    pub async fn list_kaizen_events(&self, query: &ListQuery) -> ApiResult<Vec<KaizenEvent>> {
        self.client
            .get_with(&format!("{BASE}/kaizen-events"), query)
            .await
    }

    pub async fn create_kaizen_event(&self, req: &CreateKaizenRequest) -> ApiResult<KaizenEvent> {
        self.client.post(&format!("{BASE}/kaizen-events"), req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use crate::core::client::{ApiResponse, Method};
    use crate::entities::lean_six_sigma::DmaicPhase;
    use chrono::NaiveDate;
    use serde_json::json;

    #[tokio::test]
    async fn test_advance_phase() {
        let mock = MockTransport::new();
        mock.respond(ApiResponse::json(
            200,
            &json!({"id": "p1", "name": "Scrap", "problem_statement": "Scrap at 6%",
                    "phase": "analyze", "status": "active"}),
        ));
        let client = mock.client();

        let update = PhaseUpdate {
            phase: DmaicPhase::Analyze,
            notes: Some("Baseline signed off".to_string()),
        };
        let project = client.lean_six_sigma().advance_phase("p1", &update).await.unwrap();
        assert_eq!(project.phase, DmaicPhase::Analyze);

        let sent = mock.only_request();
        assert_eq!(sent.method, Method::Patch);
        assert_eq!(sent.path, "/leansixsigma/projects/p1/phase");
        assert_eq!(
            sent.body,
            Some(json!({"phase": "analyze", "notes": "Baseline signed off"}))
        );
    }

    #[tokio::test]
    async fn test_create_kaizen_event() {
        let mock = MockTransport::new();
        mock.respond(ApiResponse::json(
            201,
            &json!({"id": "k1", "title": "5S blitz", "area": "Cell 4", "start_date": "2024-06-03"}),
        ));
        let client = mock.client();

        let req = CreateKaizenRequest {
            title: "5S blitz".to_string(),
            area: "Cell 4".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            end_date: None,
            team: vec![],
            objectives: vec![],
        };
        let event = client.lean_six_sigma().create_kaizen_event(&req).await.unwrap();
        assert_eq!(event.area, "Cell 4");

        let sent = mock.only_request();
        assert_eq!(sent.path, "/leansixsigma/kaizen-events");
        assert_eq!(
            sent.body,
            Some(json!({"title": "5S blitz", "area": "Cell 4", "start_date": "2024-06-03"}))
        );
    }
}
