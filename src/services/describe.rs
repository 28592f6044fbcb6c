//! Description generator
//!
//! Drafts a workshop description from a few structured hints by calling
//! an external generation endpoint. The feature is strictly best-effort:
//! no endpoint configured, a failed request, or a malformed response all
//! yield `None` and the admin writes the description by hand.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::DescriberConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Hints the generator drafts from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeRequest {
    /// Category name, e.g. "Technology"
    pub category: String,
    /// Display time, e.g. "4:00 PM - 6:00 PM"
    pub time: String,
    /// Presenter name
    pub presenter: String,
    /// Free-form topic keywords
    pub keywords: String,
}

#[derive(Debug, Deserialize)]
struct DescribeResponse {
    description: String,
}

/// Client for the external description endpoint.
pub struct Describer {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl Describer {
    pub fn new(config: &DescriberConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            endpoint: config.endpoint.clone(),
            client,
        }
    }

    /// Whether an endpoint is configured at all.
    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Draft a description, `None` when disabled or on any failure.
    pub async fn describe(&self, request: &DescribeRequest) -> Option<String> {
        let endpoint = self.endpoint.as_deref()?;

        let response = match self.client.post(endpoint).json(request).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Description request failed: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!("Description endpoint returned {}", response.status());
            return None;
        }

        match response.json::<DescribeResponse>().await {
            Ok(body) => {
                let description = body.description.trim().to_string();
                if description.is_empty() {
                    None
                } else {
                    Some(description)
                }
            }
            Err(e) => {
                tracing::warn!("Description response was malformed: {e}");
                None
            }
        }
    }
}
