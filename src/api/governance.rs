//! `/governai` contract: boards, meetings, resolutions, compliance

use crate::core::client::{ApiClient, ApiResult};
use crate::entities::governance::{
    Board, BoardMeeting, BoardMember, ComplianceItem, ComplianceQuery, CreateBoardMeetingRequest,
    CreateResolutionRequest, GovernanceDashboard, MeetingQuery, Resolution, ResolutionQuery,
    VoteRequest,
};

const BASE: &str = "/governai";

pub struct GovernanceApi<'a> {
    client: &'a ApiClient,
}

impl<'a> GovernanceApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_dashboard(&self) -> ApiResult<GovernanceDashboard> {
        self.client.get(&format!("{BASE}/dashboard")).await
    }

    pub async fn list_boards(&self) -> ApiResult<Vec<Board>> {
        self.client.get(&format!("{BASE}/boards")).await
    }

    pub async fn get_board(&self, id: &str) -> ApiResult<Board> {
        self.client.get(&format!("{BASE}/boards/{id}")).await
    }

    pub async fn list_board_members(&self, board_id: &str) -> ApiResult<Vec<BoardMember>> {
        self.client
            .get(&format!("{BASE}/boards/{board_id}/members"))
            .await
    }

    pub async fn list_meetings(&self, query: &MeetingQuery) -> ApiResult<Vec<BoardMeeting>> {
        self.client.get_with(&format!("{BASE}/meetings"), query).await
    }

    pub async fn create_meeting(&self, req: &CreateBoardMeetingRequest) -> ApiResult<BoardMeeting> {
        self.client.post(&format!("{BASE}/meetings"), req).await
    }

    pub async fn list_resolutions(&self, query: &ResolutionQuery) -> ApiResult<Vec<Resolution>> {
        self.client
            .get_with(&format!("{BASE}/resolutions"), query)
            .await
    }

    pub async fn get_resolution(&self, id: &str) -> ApiResult<Resolution> {
        self.client.get(&format!("{BASE}/resolutions/{id}")).await
    }

    pub async fn create_resolution(&self, req: &CreateResolutionRequest) -> ApiResult<Resolution> {
        self.client.post(&format!("{BASE}/resolutions"), req).await
    }

    /// Cast a vote; returns the resolution with updated tallies
    pub async fn cast_vote(&self, resolution_id: &str, req: &VoteRequest) -> ApiResult<Resolution> {
        self.client
            .post(&format!("{BASE}/resolutions/{resolution_id}/vote"), req)
            .await
    }

    pub async fn list_compliance_items(&self, query: &ComplianceQuery) -> ApiResult<Vec<ComplianceItem>> {
        self.client
            .get_with(&format!("{BASE}/compliance"), query)
            .await
    }
}
