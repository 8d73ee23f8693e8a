//! Computation provider client
//!
//! **[RG-PRV-010]** Uniform interface to the external chart-computation API.
//! One call per named fact; the client always returns a `FactResult`: a
//! transport error, timeout, or malformed response maps to `Failed` with no
//! payload and is never propagated to the caller. Retry policy, if any,
//! belongs to the aggregator.

use graha_common::SubjectParams;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = "GRAHA/0.1.0 (report generator)";
/// Minimum interval between provider requests (client-side pacing)
const PACING_INTERVAL_MS: u64 = 100;

/// Provider client construction errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Outcome status of one fact request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactStatus {
    Ok,
    Failed,
}

/// Outcome of one fact request. Immutable once created.
#[derive(Debug, Clone)]
pub struct FactResult {
    /// Requested fact name
    pub fact: String,
    pub status: FactStatus,
    /// Structured payload; `None` exactly when status is Failed
    pub payload: Option<Value>,
}

impl FactResult {
    pub fn ok(fact: &str, payload: Value) -> Self {
        Self {
            fact: fact.to_string(),
            status: FactStatus::Ok,
            payload: Some(payload),
        }
    }

    pub fn failed(fact: &str) -> Self {
        Self {
            fact: fact.to_string(),
            status: FactStatus::Failed,
            payload: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == FactStatus::Ok
    }
}

/// Name-addressed computation provider
///
/// Implementations must be total: every call settles with a `FactResult`.
#[async_trait::async_trait]
pub trait FactProvider: Send + Sync {
    /// Fetch one fact for one subject
    async fn fetch_fact(&self, subject: &SubjectParams, fact: &str) -> FactResult;

    /// Fetch one pair-addressed fact (both subjects' parameters in one request)
    async fn fetch_pair_fact(
        &self,
        primary: &SubjectParams,
        partner: &SubjectParams,
        fact: &str,
    ) -> FactResult;
}

/// Request pacer enforcing a minimum interval between provider calls
struct RequestPacer {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RequestPacer {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with the pacing interval
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Request pacing: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// HTTP implementation of the provider boundary
///
/// **[RG-PRV-020]** POSTs birth parameters as JSON to `{base_url}/{fact}`
/// with basic-auth credentials. Any non-success status, transport failure,
/// or non-JSON body is absorbed into a Failed result.
pub struct HttpFactProvider {
    http_client: reqwest::Client,
    base_url: String,
    user_id: String,
    api_key: String,
    pacer: Arc<RequestPacer>,
}

impl HttpFactProvider {
    pub fn new(base_url: &str, user_id: &str, api_key: &str) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id: user_id.to_string(),
            api_key: api_key.to_string(),
            pacer: Arc::new(RequestPacer::new(PACING_INTERVAL_MS)),
        })
    }

    fn subject_body(subject: &SubjectParams) -> Value {
        use chrono::{Datelike, Timelike};
        json!({
            "day": subject.birth_date.day(),
            "month": subject.birth_date.month(),
            "year": subject.birth_date.year(),
            "hour": subject.birth_time.hour(),
            "min": subject.birth_time.minute(),
            "lat": subject.latitude,
            "lon": subject.longitude,
            "tzone": subject.tz_offset_hours,
        })
    }

    fn pair_body(primary: &SubjectParams, partner: &SubjectParams) -> Value {
        use chrono::{Datelike, Timelike};
        json!({
            "m_day": primary.birth_date.day(),
            "m_month": primary.birth_date.month(),
            "m_year": primary.birth_date.year(),
            "m_hour": primary.birth_time.hour(),
            "m_min": primary.birth_time.minute(),
            "m_lat": primary.latitude,
            "m_lon": primary.longitude,
            "m_tzone": primary.tz_offset_hours,
            "f_day": partner.birth_date.day(),
            "f_month": partner.birth_date.month(),
            "f_year": partner.birth_date.year(),
            "f_hour": partner.birth_time.hour(),
            "f_min": partner.birth_time.minute(),
            "f_lat": partner.latitude,
            "f_lon": partner.longitude,
            "f_tzone": partner.tz_offset_hours,
        })
    }

    /// POST a fact request and absorb every failure mode into `FactResult`
    async fn post_fact(&self, fact: &str, body: Value) -> FactResult {
        self.pacer.wait().await;

        let url = format!("{}/{}", self.base_url, fact);
        tracing::debug!(fact = %fact, url = %url, "Querying provider");

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.user_id, Some(&self.api_key))
            .json(&body)
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(fact = %fact, error = %e, "Provider request failed");
                return FactResult::failed(fact);
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(fact = %fact, status = %status, "Provider returned error status");
            return FactResult::failed(fact);
        }

        match response.json::<Value>().await {
            Ok(payload) => {
                tracing::debug!(fact = %fact, "Fact retrieved");
                FactResult::ok(fact, payload)
            }
            Err(e) => {
                tracing::warn!(fact = %fact, error = %e, "Provider response was not valid JSON");
                FactResult::failed(fact)
            }
        }
    }
}

#[async_trait::async_trait]
impl FactProvider for HttpFactProvider {
    async fn fetch_fact(&self, subject: &SubjectParams, fact: &str) -> FactResult {
        self.post_fact(fact, Self::subject_body(subject)).await
    }

    async fn fetch_pair_fact(
        &self,
        primary: &SubjectParams,
        partner: &SubjectParams,
        fact: &str,
    ) -> FactResult {
        self.post_fact(fact, Self::pair_body(primary, partner)).await
    }
}

/// In-memory provider serving canned payloads
///
/// Used by tests and offline development. A fact with no canned payload
/// resolves as Failed, which makes partial-data scenarios easy to stage.
#[derive(Default)]
pub struct StaticFactProvider {
    facts: std::collections::HashMap<String, Value>,
    pair_facts: std::collections::HashMap<String, Value>,
}

impl StaticFactProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fact(mut self, fact: &str, payload: Value) -> Self {
        self.facts.insert(fact.to_string(), payload);
        self
    }

    pub fn with_pair_fact(mut self, fact: &str, payload: Value) -> Self {
        self.pair_facts.insert(fact.to_string(), payload);
        self
    }
}

#[async_trait::async_trait]
impl FactProvider for StaticFactProvider {
    async fn fetch_fact(&self, _subject: &SubjectParams, fact: &str) -> FactResult {
        match self.facts.get(fact) {
            Some(payload) => FactResult::ok(fact, payload.clone()),
            None => FactResult::failed(fact),
        }
    }

    async fn fetch_pair_fact(
        &self,
        _primary: &SubjectParams,
        _partner: &SubjectParams,
        fact: &str,
    ) -> FactResult {
        match self.pair_facts.get(fact) {
            Some(payload) => FactResult::ok(fact, payload.clone()),
            None => FactResult::failed(fact),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use graha_common::Gender;

    fn subject() -> SubjectParams {
        SubjectParams {
            name: "Test".to_string(),
            gender: Gender::Male,
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
            birth_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            latitude: 19.076,
            longitude: 72.8777,
            tz_offset_hours: 5.5,
            place: "Mumbai".to_string(),
        }
    }

    #[test]
    fn test_pacer_creation() {
        let pacer = RequestPacer::new(100);
        assert_eq!(pacer.min_interval, Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_pacer_timing() {
        let pacer = RequestPacer::new(50);

        let start = Instant::now();
        pacer.wait().await;
        let first_elapsed = start.elapsed();

        pacer.wait().await;
        let second_elapsed = start.elapsed();

        assert!(first_elapsed < Duration::from_millis(40));
        assert!(second_elapsed >= Duration::from_millis(45));
    }

    #[test]
    fn test_http_provider_creation() {
        let provider = HttpFactProvider::new("https://api.example.com/v1/", "user", "key");
        assert!(provider.is_ok());
        assert_eq!(provider.unwrap().base_url, "https://api.example.com/v1");
    }

    #[test]
    fn test_subject_body_fields() {
        let body = HttpFactProvider::subject_body(&subject());
        assert_eq!(body["day"], 15);
        assert_eq!(body["month"], 1);
        assert_eq!(body["year"], 1990);
        assert_eq!(body["hour"], 10);
        assert_eq!(body["min"], 30);
        assert_eq!(body["tzone"], 5.5);
    }

    #[test]
    fn test_pair_body_prefixes() {
        let a = subject();
        let mut b = subject();
        b.birth_date = NaiveDate::from_ymd_opt(1992, 6, 1).unwrap();
        let body = HttpFactProvider::pair_body(&a, &b);
        assert_eq!(body["m_year"], 1990);
        assert_eq!(body["f_year"], 1992);
    }

    #[tokio::test]
    async fn test_static_provider_ok_and_failed() {
        let provider =
            StaticFactProvider::new().with_fact("planets", serde_json::json!([{"name": "Sun"}]));

        let ok = provider.fetch_fact(&subject(), "planets").await;
        assert!(ok.is_ok());
        assert!(ok.payload.is_some());

        let failed = provider.fetch_fact(&subject(), "panchang").await;
        assert_eq!(failed.status, FactStatus::Failed);
        assert!(failed.payload.is_none());
    }
}
