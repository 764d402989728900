//! Recording transport for contract tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::core::client::{ApiClient, ApiError, ApiRequest, ApiResponse, ApiResult, Transport};

#[derive(Default)]
struct State {
    responses: VecDeque<ApiResponse>,
    requests: Vec<ApiRequest>,
}

/// Replays queued responses in order and records every request it sees
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue the response for the next request
    pub(crate) fn respond(&self, response: ApiResponse) {
        self.state.lock().unwrap().responses.push_back(response);
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// The single request seen so far
    pub(crate) fn only_request(&self) -> ApiRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }

    pub(crate) fn client(&self) -> ApiClient {
        ApiClient::new(Arc::new(self.clone()))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request);
        state.responses.pop_front().ok_or_else(|| ApiError::Transport {
            message: "no response queued".to_string(),
        })
    }
}
