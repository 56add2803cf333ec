//! Thin client for the submission flow: submit an entry, then refresh the
//! visible list and counters by re-querying. No caching, no retries.

use std::time::Duration;

use anyhow::Context as _;
use serde::Deserialize;

use verdant_database::model::entry::{Category, Domain, Entry, UsageCounts};

const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct FeedbackBody {
    feedback: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
            .build()
            .context("failed to build the api http client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    /// Submit one entry and return the feedback text, which may be the
    /// server's fallback message when enrichment was unavailable.
    pub async fn submit(
        &self,
        category: Category,
        entry_text: &str,
        user_id: &str,
    ) -> anyhow::Result<String> {
        let url = format!(
            "{}{}",
            self.base_url,
            feedback_endpoint(category.domain())
        );
        let body = serde_json::json!({
            "category": category,
            "entry": entry_text,
            "user_id": user_id,
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("failed to reach the feedback service")?;

        if !response.status().is_success() {
            anyhow::bail!(error_message(response).await);
        }

        let body: FeedbackBody = response
            .json()
            .await
            .context("failed to decode the feedback response")?;
        Ok(body.feedback)
    }

    /// Fetch a user's entries newest first, optionally restricted to one
    /// domain. Called after every successful submit to refresh the list.
    pub async fn list_entries(
        &self,
        user_id: &str,
        domain: Option<Domain>,
    ) -> anyhow::Result<Vec<Entry>> {
        let url = format!("{}/api/entries", self.base_url);
        let mut query = vec![("user_id", user_id.to_owned())];
        if let Some(domain) = domain {
            query.push(("domain", domain.as_str().to_owned()));
        }

        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .context("failed to reach the entries endpoint")?;

        if !response.status().is_success() {
            anyhow::bail!(error_message(response).await);
        }

        response
            .json()
            .await
            .context("failed to decode the entries response")
    }

    /// Fetch a user's aggregate per-domain counts.
    pub async fn usage_counts(&self, user_id: &str) -> anyhow::Result<UsageCounts> {
        let url = format!("{}/api/usage", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("user_id", user_id)])
            .send()
            .await
            .context("failed to reach the usage endpoint")?;

        if !response.status().is_success() {
            anyhow::bail!(error_message(response).await);
        }

        response
            .json()
            .await
            .context("failed to decode the usage response")
    }
}

fn feedback_endpoint(domain: Domain) -> String {
    format!("/functions/v1/{domain}-feedback")
}

async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => format!("request failed with status {status}"),
    }
}

#[cfg(test)]
mod tests {
    use verdant_database::model::entry::Domain;

    use super::feedback_endpoint;

    #[test]
    fn feedback_endpoints_follow_domain_naming() {
        assert_eq!(
            feedback_endpoint(Domain::Energy),
            "/functions/v1/energy-feedback"
        );
        assert_eq!(
            feedback_endpoint(Domain::Water),
            "/functions/v1/water-feedback"
        );
        assert_eq!(
            feedback_endpoint(Domain::Waste),
            "/functions/v1/waste-feedback"
        );
    }
}
