//! `/team` contract: members and invitations

use tracing::debug;

use crate::core::client::{ApiClient, ApiResult};
use crate::entities::team::{
    AcceptInvitationRequest, AcceptInvitationResponse, CreateInvitationRequest, Invitation,
    InvitationQuery, InvitationTokenRequest, InvitationVerifyResponse, MemberQuery, TeamDashboard,
    TeamMember, TeamOverview, UpdateMemberRequest,
};

const BASE: &str = "/team";

pub struct TeamApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TeamApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_overview(&self) -> ApiResult<TeamOverview> {
        self.client.get(&format!("{BASE}/overview")).await
    }

    pub async fn list_members(&self, query: &MemberQuery) -> ApiResult<Vec<TeamMember>> {
        self.client.get_with(&format!("{BASE}/members"), query).await
    }

    pub async fn get_member(&self, id: &str) -> ApiResult<TeamMember> {
        self.client.get(&format!("{BASE}/members/{id}")).await
    }

    /// Change a member's role or active flag
    ///
    /// `UpdateMemberRequest` cannot carry the owner role. Whether the target
    /// member is the owner is checked by the backend.
    pub async fn update_member(&self, id: &str, req: &UpdateMemberRequest) -> ApiResult<TeamMember> {
        self.client.patch(&format!("{BASE}/members/{id}"), req).await
    }

    pub async fn remove_member(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&format!("{BASE}/members/{id}")).await
    }

    pub async fn list_invitations(&self, query: &InvitationQuery) -> ApiResult<Vec<Invitation>> {
        self.client
            .get_with(&format!("{BASE}/invitations"), query)
            .await
    }

    pub async fn create_invitation(&self, req: &CreateInvitationRequest) -> ApiResult<Invitation> {
        self.client.post(&format!("{BASE}/invitations"), req).await
    }

    /// Resend a pending invitation; it stays pending with a new expiry
    pub async fn resend_invitation(&self, id: &str) -> ApiResult<Invitation> {
        self.client
            .post_action(&format!("{BASE}/invitations/{id}/resend"))
            .await
    }

    /// Revoke an invitation. Revoking twice is relayed as-is.
    pub async fn revoke_invitation(&self, id: &str) -> ApiResult<Invitation> {
        self.client
            .post_action(&format!("{BASE}/invitations/{id}/revoke"))
            .await
    }

    pub async fn verify_invitation(&self, token: &str) -> ApiResult<InvitationVerifyResponse> {
        let req = InvitationTokenRequest {
            token: token.to_string(),
        };
        self.client
            .post(&format!("{BASE}/invitations/verify"), &req)
            .await
    }

    pub async fn accept_invitation(
        &self,
        req: &AcceptInvitationRequest,
    ) -> ApiResult<AcceptInvitationResponse> {
        self.client
            .post(&format!("{BASE}/invitations/accept"), req)
            .await
    }

    /// Overview, members and invitations fetched concurrently
    ///
    /// All three must succeed; the first failure is returned.
    pub async fn load_dashboard(&self) -> ApiResult<TeamDashboard> {
        let members_query = MemberQuery::default();
        let invitations_query = InvitationQuery::default();
        let (overview, members, invitations) = tokio::try_join!(
            self.get_overview(),
            self.list_members(&members_query),
            self.list_invitations(&invitations_query),
        )?;
        debug!(
            members = members.len(),
            invitations = invitations.len(),
            "loaded team dashboard"
        );
        Ok(TeamDashboard {
            overview,
            members,
            invitations,
        })
    }
}
