//! `/admin` contract: platform-wide super-admin console

use crate::core::client::{ApiClient, ApiResult};
use crate::entities::admin::{
    AdminUser, AuditLogEntry, AuditLogQuery, Organization, OrganizationQuery,
    OrganizationStatusUpdate, PlatformStats, SystemHealth, UserQuery,
};

const BASE: &str = "/admin";

pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_platform_stats(&self) -> ApiResult<PlatformStats> {
        self.client.get(&format!("{BASE}/stats")).await
    }

    pub async fn list_organizations(&self, query: &OrganizationQuery) -> ApiResult<Vec<Organization>> {
        self.client
            .get_with(&format!("{BASE}/organizations"), query)
            .await
    }

    pub async fn get_organization(&self, id: &str) -> ApiResult<Organization> {
        self.client.get(&format!("{BASE}/organizations/{id}")).await
    }

    pub async fn update_organization_status(
        &self,
        id: &str,
        update: &OrganizationStatusUpdate,
    ) -> ApiResult<Organization> {
        self.client
            .patch(&format!("{BASE}/organizations/{id}/status"), update)
            .await
    }

    pub async fn list_users(&self, query: &UserQuery) -> ApiResult<Vec<AdminUser>> {
        self.client.get_with(&format!("{BASE}/users"), query).await
    }

    pub async fn list_audit_log(&self, query: &AuditLogQuery) -> ApiResult<Vec<AuditLogEntry>> {
        self.client
            .get_with(&format!("{BASE}/audit-log"), query)
            .await
    }

    pub async fn get_system_health(&self) -> ApiResult<SystemHealth> {
        self.client.get(&format!("{BASE}/health")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use crate::core::client::{ApiResponse, Method};
    use crate::entities::admin::OrganizationStatus;
    use serde_json::json;

    #[tokio::test]
    async fn test_update_organization_status() {
        let mock = MockTransport::new();
        mock.respond(ApiResponse::json(
            200,
            &json!({"id": "org-9", "name": "Globex", "status": "suspended"}),
        ));
        let client = mock.client();

        let update = OrganizationStatusUpdate {
            status: OrganizationStatus::Suspended,
            reason: None,
        };
        let org = client
            .admin()
            .update_organization_status("org-9", &update)
            .await
            .unwrap();
        assert_eq!(org.status, OrganizationStatus::Suspended);

        let sent = mock.only_request();
        assert_eq!(sent.method, Method::Patch);
        assert_eq!(sent.path, "/admin/organizations/org-9/status");
        assert_eq!(sent.body, Some(json!({"status": "suspended"})));
    }

    #[tokio::test]
    async fn test_audit_log_query() {
        let mock = MockTransport::new();
        mock.respond(ApiResponse::json(
            200,
            &json!([{"id": "a1", "action": "member.removed", "actor_email": "o@example.com",
                     "created_at": "2024-05-01T12:00:00Z"}]),
        ));
        let client = mock.client();

        let query = AuditLogQuery {
            action: Some("member.removed".to_string()),
            ..Default::default()
        };
        let entries = client.admin().list_audit_log(&query).await.unwrap();
        assert_eq!(entries[0].actor_email, "o@example.com");
        assert_eq!(mock.only_request().path, "/admin/audit-log");
    }
}
