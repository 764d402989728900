//! `/lean-analytics` contract: SPC, capability, predictive analytics, process maps

use crate::core::blob::Blob;
use crate::core::client::{ApiClient, ApiResult};
use crate::entities::ai_analysis::{AiAnalysisRequest, AiAnalysisResult};
use crate::entities::analytics::{
    BottleneckRequest, BottleneckResult, CapabilityRequest, CapabilityResult,
    CapabilityStudySummary, ControlChartSummary, ExportFormat, ExportKind, ImrChartRequest,
    ImrChartResult, ListQuery, OeeTrendRequest, OeeTrendResult, ParetoRequest, ParetoResult,
    TaktTimeRequest, TaktTimeResult, XBarRChartRequest, XBarRChartResult,
};
use crate::entities::process_map::{
    ProcessFlowDiagram, ProcessFlowRequest, SipocDiagram, SipocRequest, ValueStreamMap,
    VsmRequest,
};

const BASE: &str = "/lean-analytics";

pub struct LeanAnalyticsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> LeanAnalyticsApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    // ------------------------------------------------------------------------
    // Control charts
    // ------------------------------------------------------------------------

    pub async fn create_xbar_r_chart(&self, req: &XBarRChartRequest) -> ApiResult<XBarRChartResult> {
        self.client
            .post(&format!("{BASE}/control-charts/xbar-r"), req)
            .await
    }

    pub async fn create_imr_chart(&self, req: &ImrChartRequest) -> ApiResult<ImrChartResult> {
        self.client
            .post(&format!("{BASE}/control-charts/imr"), req)
            .await
    }

    pub async fn list_control_charts(&self, query: &ListQuery) -> ApiResult<Vec<ControlChartSummary>> {
        self.client
            .get_with(&format!("{BASE}/control-charts"), query)
            .await
    }

    /// The stored chart; its shape depends on the chart type
    pub async fn get_control_chart(&self, id: &str) -> ApiResult<serde_json::Value> {
        self.client
            .get(&format!("{BASE}/control-charts/{id}"))
            .await
    }

    // ------------------------------------------------------------------------
    // Analyses
    // ------------------------------------------------------------------------

    pub async fn pareto_analysis(&self, req: &ParetoRequest) -> ApiResult<ParetoResult> {
        self.client
            .post(&format!("{BASE}/pareto-analysis"), req)
            .await
    }

    pub async fn capability_analysis(&self, req: &CapabilityRequest) -> ApiResult<CapabilityResult> {
        self.client
            .post(&format!("{BASE}/capability-analysis"), req)
            .await
    }

    pub async fn list_capability_studies(
        &self,
        query: &ListQuery,
    ) -> ApiResult<Vec<CapabilityStudySummary>> {
        self.client
            .get_with(&format!("{BASE}/capability-studies"), query)
            .await
    }

    pub async fn predict_oee_trend(&self, req: &OeeTrendRequest) -> ApiResult<OeeTrendResult> {
        self.client
            .post(&format!("{BASE}/predict/oee-trend"), req)
            .await
    }

    pub async fn identify_bottlenecks(&self, req: &BottleneckRequest) -> ApiResult<BottleneckResult> {
        self.client
            .post(&format!("{BASE}/predict/bottlenecks"), req)
            .await
    }

    pub async fn calculate_takt_time(&self, req: &TaktTimeRequest) -> ApiResult<TaktTimeResult> {
        self.client.post(&format!("{BASE}/takt-time"), req).await
    }

    pub async fn run_ai_analysis(&self, req: &AiAnalysisRequest) -> ApiResult<AiAnalysisResult> {
        self.client.post(&format!("{BASE}/ai/analyze"), req).await
    }

    // ------------------------------------------------------------------------
    // SIPOC
    // ------------------------------------------------------------------------

    pub async fn create_sipoc(&self, req: &SipocRequest) -> ApiResult<SipocDiagram> {
        self.client.post(&format!("{BASE}/sipoc"), req).await
    }

    pub async fn list_sipocs(&self, query: &ListQuery) -> ApiResult<Vec<SipocDiagram>> {
        self.client.get_with(&format!("{BASE}/sipoc"), query).await
    }

    pub async fn get_sipoc(&self, id: &str) -> ApiResult<SipocDiagram> {
        self.client.get(&format!("{BASE}/sipoc/{id}")).await
    }

    pub async fn update_sipoc(&self, id: &str, req: &SipocRequest) -> ApiResult<SipocDiagram> {
        self.client.put(&format!("{BASE}/sipoc/{id}"), req).await
    }

    pub async fn delete_sipoc(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&format!("{BASE}/sipoc/{id}")).await
    }

    // ------------------------------------------------------------------------
    // Value stream maps
    // ------------------------------------------------------------------------

    pub async fn create_vsm(&self, req: &VsmRequest) -> ApiResult<ValueStreamMap> {
        self.client.post(&format!("{BASE}/vsm"), req).await
    }

    pub async fn list_vsms(&self, query: &ListQuery) -> ApiResult<Vec<ValueStreamMap>> {
        self.client.get_with(&format!("{BASE}/vsm"), query).await
    }

    pub async fn get_vsm(&self, id: &str) -> ApiResult<ValueStreamMap> {
        self.client.get(&format!("{BASE}/vsm/{id}")).await
    }

    pub async fn update_vsm(&self, id: &str, req: &VsmRequest) -> ApiResult<ValueStreamMap> {
        self.client.put(&format!("{BASE}/vsm/{id}"), req).await
    }

    pub async fn delete_vsm(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&format!("{BASE}/vsm/{id}")).await
    }

    // ------------------------------------------------------------------------
    // Process flows
    // ------------------------------------------------------------------------

    pub async fn create_process_flow(&self, req: &ProcessFlowRequest) -> ApiResult<ProcessFlowDiagram> {
        self.client.post(&format!("{BASE}/process-flow"), req).await
    }

    pub async fn list_process_flows(&self, query: &ListQuery) -> ApiResult<Vec<ProcessFlowDiagram>> {
        self.client
            .get_with(&format!("{BASE}/process-flow"), query)
            .await
    }

    pub async fn get_process_flow(&self, id: &str) -> ApiResult<ProcessFlowDiagram> {
        self.client.get(&format!("{BASE}/process-flow/{id}")).await
    }

    pub async fn update_process_flow(
        &self,
        id: &str,
        req: &ProcessFlowRequest,
    ) -> ApiResult<ProcessFlowDiagram> {
        self.client
            .put(&format!("{BASE}/process-flow/{id}"), req)
            .await
    }

    pub async fn delete_process_flow(&self, id: &str) -> ApiResult<()> {
        self.client
            .delete(&format!("{BASE}/process-flow/{id}"))
            .await
    }

    // ------------------------------------------------------------------------
    // Exports
    // ------------------------------------------------------------------------

    /// Download a rendered report; content type and filename are preserved
    pub async fn export(&self, kind: ExportKind, id: &str, format: ExportFormat) -> ApiResult<Blob> {
        self.client
            .get_blob(&format!("{BASE}/export/{kind}/{id}/{format}"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use crate::core::client::{ApiError, ApiResponse, Method};
    use crate::core::presentation::BadgeColor;
    use crate::core::tabular::{parse_rows, BottleneckStep};
    use crate::entities::ai_analysis::RcaPayload;
    use serde_json::json;

    fn chart_json() -> serde_json::Value {
        json!({"center_line": 10.0, "ucl": 10.6, "lcl": 9.4,
               "data_points": [10.1, 9.9, 10.8], "out_of_control_points": [2]})
    }

    #[tokio::test]
    async fn test_create_xbar_r_chart() {
        let mock = MockTransport::new();
        mock.respond(ApiResponse::json(
            200,
            &json!({"name": "Bore", "subgroup_size": 2,
                    "xbar_chart": chart_json(), "r_chart": chart_json()}),
        ));
        let client = mock.client();

        let req = XBarRChartRequest {
            name: "Bore".to_string(),
            subgroup_size: Some(2),
            data: vec![vec![10.0, 10.2], vec![9.9, 10.1]],
            usl: None,
            lsl: None,
        };
        let result = client.lean_analytics().create_xbar_r_chart(&req).await.unwrap();
        assert_eq!(result.xbar_chart.out_of_control_values(), vec![(2, 10.8)]);

        let sent = mock.only_request();
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.path, "/lean-analytics/control-charts/xbar-r");
        assert_eq!(
            sent.body,
            Some(json!({"name": "Bore", "subgroup_size": 2,
                        "data": [[10.0, 10.2], [9.9, 10.1]]}))
        );
    }

    #[tokio::test]
    async fn test_capability_analysis_passes_input_through() {
        let mock = MockTransport::new();
        mock.respond(ApiResponse::json(
            200,
            &json!({
                "statistics": {"mean": 10.0, "std_dev": 0.05, "min": 9.9, "max": 10.1, "range": 0.2},
                "specification_limits": {"usl": 9.0, "lsl": 11.0, "tolerance": -2.0},
                "capability_indices": {"cp": 1.5, "cpk": 1.4, "cpu": 1.4, "cpl": 1.6},
                "performance": {"sigma_level": 4.2, "ppm_total": 26.0, "ppm_upper": 20.0,
                                "ppm_lower": 6.0, "yield_percent": 99.9974},
                "interpretation": {"cpk_rating": "Capable", "cpk_color": "blue",
                                   "centering": "Well centered", "cp_vs_cpk": "close"}
            }),
        ));
        let client = mock.client();

        // usl < lsl is the backend's problem
        let req = CapabilityRequest {
            name: "Study 1".to_string(),
            process_name: "Machining".to_string(),
            characteristic: "Bore".to_string(),
            data: vec![],
            usl: 9.0,
            lsl: 11.0,
            target: None,
        };
        let result = client.lean_analytics().capability_analysis(&req).await.unwrap();
        assert_eq!(result.color(), BadgeColor::Blue);

        let sent = mock.only_request();
        assert_eq!(sent.path, "/lean-analytics/capability-analysis");
        assert_eq!(sent.body.unwrap()["usl"], 9.0);
    }

    #[tokio::test]
    async fn test_pareto_failure_carries_detail() {
        let mock = MockTransport::new();
        mock.respond(ApiResponse::json(
            422,
            &json!({"detail": "categories and values differ in length"}),
        ));
        let client = mock.client();

        let req = ParetoRequest {
            categories: vec!["Scratch".to_string()],
            values: vec![],
            labels: None,
        };
        let err = client.lean_analytics().pareto_analysis(&req).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 422, .. }));
        assert_eq!(
            err.user_message("Analysis failed"),
            "Analysis failed: categories and values differ in length"
        );
    }

    #[tokio::test]
    async fn test_identify_bottlenecks_uses_parsed_rows() {
        let mock = MockTransport::new();
        mock.respond(ApiResponse::json(200, &json!({"primary_bottleneck": "Welding"})));
        let client = mock.client();

        let steps: Vec<BottleneckStep> = parse_rows("Assembly, 45, 40, 10, 85\nWelding, 60, 40, 5, 95");
        let req = BottleneckRequest { process_steps: steps };
        let result = client.lean_analytics().identify_bottlenecks(&req).await.unwrap();
        assert_eq!(result.primary_bottleneck.as_deref(), Some("Welding"));

        let sent = mock.only_request();
        assert_eq!(sent.path, "/lean-analytics/predict/bottlenecks");
        assert_eq!(
            sent.body.unwrap()["process_steps"][1],
            json!({"name": "Welding", "cycle_time": 60.0, "takt_time": 40.0,
                   "wait_time": 5.0, "utilization": 95.0})
        );
    }

    #[tokio::test]
    async fn test_list_capability_studies_query() {
        let mock = MockTransport::new();
        mock.respond(ApiResponse::json(200, &json!([])));
        let client = mock.client();

        let studies = client
            .lean_analytics()
            .list_capability_studies(&ListQuery { limit: Some(5) })
            .await
            .unwrap();
        assert!(studies.is_empty());

        let sent = mock.only_request();
        assert_eq!(sent.method, Method::Get);
        assert_eq!(sent.path, "/lean-analytics/capability-studies");
        assert_eq!(sent.query, vec![("limit".to_string(), "5".to_string())]);
    }

    #[tokio::test]
    async fn test_ai_analysis_sends_tagged_body() {
        let mock = MockTransport::new();
        mock.respond(ApiResponse::json(
            200,
            &json!({"analysis_type": "rca", "summary": "Worn seal"}),
        ));
        let client = mock.client();

        let req = AiAnalysisRequest::Rca(RcaPayload {
            problem: "Leak".to_string(),
            symptoms: vec![],
            context: None,
        });
        let result = client.lean_analytics().run_ai_analysis(&req).await.unwrap();
        assert_eq!(result.summary, "Worn seal");

        let sent = mock.only_request();
        assert_eq!(sent.path, "/lean-analytics/ai/analyze");
        assert_eq!(
            sent.body,
            Some(json!({"analysis_type": "rca", "data": {"problem": "Leak"}}))
        );
    }

    #[tokio::test]
    async fn test_document_crud_paths() {
        let mock = MockTransport::new();
        let doc = json!({"id": "v1", "name": "Line 1", "product_family": "Pumps"});
        mock.respond(ApiResponse::json(200, &doc));
        mock.respond(ApiResponse::json(200, &doc));
        mock.respond(ApiResponse {
            status: 204,
            ..Default::default()
        });
        let client = mock.client();
        let api = client.lean_analytics();

        let req = VsmRequest {
            name: "Line 1".to_string(),
            product_family: "Pumps".to_string(),
            customer_demand: None,
            available_time: None,
            process_steps: vec![],
        };
        api.get_vsm("v1").await.unwrap();
        api.update_vsm("v1", &req).await.unwrap();
        api.delete_vsm("v1").await.unwrap();

        let sent: Vec<(Method, String)> = mock
            .requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect();
        assert_eq!(
            sent,
            vec![
                (Method::Get, "/lean-analytics/vsm/v1".to_string()),
                (Method::Put, "/lean-analytics/vsm/v1".to_string()),
                (Method::Delete, "/lean-analytics/vsm/v1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_export_returns_blob() {
        let mock = MockTransport::new();
        mock.respond(ApiResponse {
            status: 200,
            content_type: Some("application/pdf".to_string()),
            content_disposition: Some("attachment; filename=\"capability_42.pdf\"".to_string()),
            body: b"%PDF-1.7".to_vec(),
        });
        let client = mock.client();

        let blob = client
            .lean_analytics()
            .export(ExportKind::Capability, "42", ExportFormat::Pdf)
            .await
            .unwrap();
        assert_eq!(blob.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(blob.filename.as_deref(), Some("capability_42.pdf"));
        assert_eq!(mock.only_request().path, "/lean-analytics/export/capability/42/pdf");
    }

    #[tokio::test]
    async fn test_excel_export_path() {
        let mock = MockTransport::new();
        mock.respond(ApiResponse {
            status: 200,
            body: vec![0x50, 0x4b],
            ..Default::default()
        });
        let client = mock.client();

        client
            .lean_analytics()
            .export(ExportKind::ControlChart, "7", ExportFormat::Excel)
            .await
            .unwrap();
        assert_eq!(mock.only_request().path, "/lean-analytics/export/control-chart/7/excel");
    }
}
