use crate::analytics::AnalyticsSummary;
use crate::config::Settings;
use crate::domain::contract::RecommendationQuery;
use crate::domain::recommendation::Recommendation;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[async_trait::async_trait]
pub trait RecommendationApi: Send + Sync {
    async fn recommend(&self, query: &RecommendationQuery) -> Result<Recommendation>;

    async fn analytics(&self, state: Option<&str>) -> Result<AnalyticsSummary>;
}

#[derive(Debug, Clone)]
pub struct HttpRecommendationClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpRecommendationClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.api_timeout)
            .build()
            .context("failed to build recommendation service http client")?;

        Ok(Self {
            http,
            base_url: settings.api_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn decode<T: DeserializeOwned>(res: reqwest::Response, what: &str) -> Result<T> {
        let status = res.status();
        let text = res
            .text()
            .await
            .with_context(|| format!("failed to read {what} response"))?;

        if !status.is_success() {
            let reason = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or(text);
            anyhow::bail!("{what} HTTP {status}: {reason}");
        }

        serde_json::from_str::<T>(&text)
            .with_context(|| format!("{what} response has an unexpected shape: {text}"))
    }
}

#[async_trait::async_trait]
impl RecommendationApi for HttpRecommendationClient {
    async fn recommend(&self, query: &RecommendationQuery) -> Result<Recommendation> {
        let res = self
            .http
            .post(self.url("/recommendation"))
            .json(query)
            .send()
            .await
            .context("recommendation request failed")?;

        Self::decode(res, "recommendation").await
    }

    async fn analytics(&self, state: Option<&str>) -> Result<AnalyticsSummary> {
        let mut req = self.http.get(self.url("/analytics"));
        if let Some(state) = state {
            req = req.query(&[("state", state)]);
        }
        let res = req.send().await.context("analytics request failed")?;

        Self::decode(res, "analytics").await
    }
}
