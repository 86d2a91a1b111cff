//! HTTP client for the assistant API.
//!
//! Each operation is a single blocking `POST` with a JSON body:
//! - `POST {base}/groom` - one `BacklogItem` in, one out
//! - `POST {base}/cluster-feedback` - `FeedbackItem[]` in, `FeedbackCluster[]` out
//! - `POST {base}/roadmap` - `BacklogItem[]` in, `RoadmapPlan` out
//!
//! Any non-2xx status fails the whole call.

use super::{AssistantService, DEFAULT_API_BASE_URL};
use crate::models::{BacklogItem, FeedbackCluster, FeedbackItem, RoadmapPlan};
use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// User-Agent header sent with every request
const USER_AGENT: &str = concat!("smart-pm/", env!("CARGO_PKG_VERSION"));

/// Assistant service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAssistant {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpAssistant {
    /// Create a client for `base_url`. Requests never time out.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::build(base_url.into(), None)
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self::build(base_url.into(), Some(timeout))
    }

    fn build(base_url: String, timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: builder.build(),
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let payload = serde_json::to_value(body)?;

        let response = self
            .agent
            .post(&url)
            .set("Accept", "application/json")
            .send_json(payload);

        match response {
            Ok(resp) => resp
                .into_json::<T>()
                .map_err(|e| Error::Remote(format!("invalid response from {}: {}", url, e))),
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(Error::Remote(format!("{} returned HTTP {}: {}", url, code, body)))
            }
            Err(e) => Err(Error::Remote(format!("{}: {}", url, e))),
        }
    }
}

impl Default for HttpAssistant {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl AssistantService for HttpAssistant {
    fn groom(&self, item: &BacklogItem) -> Result<BacklogItem> {
        self.post("groom", item)
    }

    fn cluster_feedback(&self, items: &[FeedbackItem]) -> Result<Vec<FeedbackCluster>> {
        self.post("cluster-feedback", items)
    }

    fn generate_roadmap(&self, items: &[BacklogItem]) -> Result<RoadmapPlan> {
        self.post("roadmap", items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = HttpAssistant::new("http://localhost:8000/api/");
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.endpoint("groom"), "http://localhost:8000/api/groom");
        assert_eq!(
            client.endpoint("/cluster-feedback"),
            "http://localhost:8000/api/cluster-feedback"
        );
    }

    #[test]
    fn test_default_points_at_local_api() {
        assert_eq!(HttpAssistant::default().base_url(), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_unreachable_service_is_remote_error() {
        // Port 1 is never served in the test environment.
        let client = HttpAssistant::with_timeout("http://127.0.0.1:1/api", Duration::from_secs(2));
        let err = client.groom(&BacklogItem::new("1", "x")).unwrap_err();
        assert!(matches!(err, Error::Remote(_)));
    }
}
