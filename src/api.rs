//! Thin client for the remote contest API.
//!
//! All scoring and ranking happens server-side; this module only moves JSON.
//! Error bodies are reduced to the backend's `detail`/`message` string.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use urlencoding::encode;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::submission::SubmissionPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitStatus {
    Ok,
    Duplicate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: SubmitStatus,
    pub contest_id: String,
    pub submission_id: String,
    pub score: f64,
    pub primary_metric: String,
    #[serde(default)]
    pub metrics: serde_json::Map<String, Value>,
    #[serde(default)]
    pub portfolio_returns: Option<Vec<f64>>,
    #[serde(default)]
    pub attempts: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub contest_id: String,
    #[serde(default)]
    pub contest: Value,
    #[serde(default)]
    pub participant: Value,
    #[serde(default)]
    pub attempts: Value,
    #[serde(default)]
    pub leaderboard_me: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub actor_id: String,
    #[serde(default)]
    pub actor_type: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub best_score: Option<f64>,
    #[serde(default)]
    pub last_score: Option<f64>,
    #[serde(default)]
    pub n_submissions: Option<u32>,
    #[serde(default)]
    pub primary_metric: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub contest_id: String,
    #[serde(default)]
    pub contest: Value,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub top: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub me: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionListItem {
    pub submission_id: String,
    pub status: Option<SubmitStatus>,
    pub score: Option<f64>,
    pub primary_metric: Option<String>,
    pub created_at: Option<String>,
    pub rank_at_submit: Option<u32>,
}

impl SubmissionListItem {
    /// Normalize one raw listing entry; entries without an id are dropped.
    pub fn from_value(x: &Value) -> Option<Self> {
        let submission_id = x["submission_id"]
            .as_str()
            .or_else(|| x["id"].as_str())
            .filter(|s| !s.is_empty())?
            .to_string();
        Some(Self {
            submission_id,
            status: serde_json::from_value(x["status"].clone()).ok(),
            score: x["score"].as_f64(),
            primary_metric: x["primary_metric"].as_str().map(str::to_string),
            created_at: x["created_at"]
                .as_str()
                .or_else(|| x["submitted_at"].as_str())
                .map(str::to_string),
            rank_at_submit: x["rank_at_submit"].as_u64().map(|r| r as u32),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionSeries {
    #[serde(default)]
    pub portfolio_returns: Option<Vec<f64>>,
    #[serde(default)]
    pub returns: Option<Vec<f64>>,
    #[serde(default)]
    pub equity: Option<Vec<f64>>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Pull a display message out of an error body.
pub fn error_detail(status: u16, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["detail", "message"].iter().find_map(|k| match &v[*k] {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Null => None,
                other if !other.is_string() => Some(other.to_string()),
                _ => None,
            })
        })
        .unwrap_or_else(|| format!("HTTP {status}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiStatus {
    Ok,
    Down,
    MissingBaseUrl,
}

impl ApiStatus {
    /// Status for a configuration attempt: no base URL means nothing to check.
    pub async fn check(config: Result<ClientConfig, ApiError>) -> Self {
        let api = match config.and_then(ContestApi::new) {
            Ok(api) => api,
            Err(ApiError::MissingBaseUrl) => return Self::MissingBaseUrl,
            Err(_) => return Self::Down,
        };
        api.status().await
    }
}

/// Id of a `/contests` entry: `contest_id`, then `id`, then `slug`.
pub fn listing_contest_id(item: &Value) -> Option<&str> {
    ["contest_id", "id", "slug"]
        .iter()
        .find_map(|k| item[*k].as_str().filter(|s| !s.is_empty()))
}

/// "Name (id)" when the entry carries a contest name, else the bare id.
pub fn listing_label(item: &Value) -> String {
    let id = listing_contest_id(item).unwrap_or("?");
    match item["contest"]["name"].as_str().map(str::trim) {
        Some(name) if !name.is_empty() => format!("{name} ({id})"),
        _ => id.to_string(),
    }
}

pub fn find_listing<'a>(items: &'a [Value], contest_id: &str) -> Option<&'a Value> {
    items.iter().find(|item| listing_contest_id(item) == Some(contest_id))
}

/// Public contest document and participant record for one contest.
///
/// `/me` is preferred; the matching `/contests` entry fills whatever it lacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContestView {
    pub contest: Value,
    pub participant: Value,
}

impl ContestView {
    pub fn resolve(me: Option<&MeResponse>, listing: Option<&Value>) -> Self {
        Self {
            contest: first_present(me.map(|m| &m.contest), listing, "contest"),
            participant: first_present(me.map(|m| &m.participant), listing, "participant"),
        }
    }

    /// True when `/me` already answered both halves.
    pub fn is_complete(&self) -> bool {
        !self.contest.is_null() && !self.participant.is_null()
    }
}

fn first_present(from_me: Option<&Value>, listing: Option<&Value>, key: &str) -> Value {
    from_me
        .filter(|v| !v.is_null())
        .or_else(|| listing.map(|item| &item[key]).filter(|v| !v.is_null()))
        .cloned()
        .unwrap_or(Value::Null)
}

pub fn contest_path(contest_id: &str, rest: &str) -> String {
    format!("/contests/{}{}", encode(contest_id), rest)
}

pub struct ContestApi {
    client: Client,
    config: ClientConfig,
}

impl ContestApi {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn request(&self, method: Method, path: &str, authed: bool) -> Result<RequestBuilder, ApiError> {
        let builder = self.client.request(method, self.url(path));
        if !authed {
            return Ok(builder);
        }
        let token = self.config.token.as_deref().ok_or(ApiError::MissingToken)?;
        Ok(builder.header(AUTHORIZATION, format!("Bearer {token}")))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, path: &str) -> Result<T, ApiError> {
        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        info!(path, status = status.as_u16(), "api response");

        if !status.is_success() {
            let detail = error_detail(status.as_u16(), &text);
            warn!(path, status = status.as_u16(), %detail, "api request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, authed: bool) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path, authed)?;
        self.send(builder, path).await
    }

    pub async fn health(&self) -> Result<Value, ApiError> {
        self.get("/health", false).await
    }

    /// Reachability of the backend; any failure of `/health` counts as down.
    pub async fn status(&self) -> ApiStatus {
        match self.health().await {
            Ok(_) => ApiStatus::Ok,
            Err(error) => {
                warn!(%error, "health check failed");
                ApiStatus::Down
            }
        }
    }

    pub async fn list_contests(&self) -> Result<Vec<Value>, ApiError> {
        let data: Value = self.get("/contests", true).await?;
        Ok(match data {
            Value::Array(items) => items,
            mut other => match other.get_mut("items").map(Value::take) {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
        })
    }

    pub async fn me(&self, contest_id: &str) -> Result<MeResponse, ApiError> {
        self.get(&contest_path(contest_id, "/me"), true).await
    }

    pub async fn leaderboard(&self, contest_id: &str, limit: u32) -> Result<LeaderboardResponse, ApiError> {
        self.get(&contest_path(contest_id, &format!("/leaderboard?limit={limit}")), true)
            .await
    }

    pub async fn submissions(&self, contest_id: &str, limit: u32) -> Result<Vec<SubmissionListItem>, ApiError> {
        let data: Value = self
            .get(&contest_path(contest_id, &format!("/submissions?limit={limit}")), true)
            .await?;
        let items = match &data {
            Value::Array(items) => items.as_slice(),
            other => other["items"].as_array().map(Vec::as_slice).unwrap_or_default(),
        };
        Ok(items.iter().filter_map(SubmissionListItem::from_value).collect())
    }

    pub async fn submission_series(
        &self,
        contest_id: &str,
        submission_id: &str,
        tail: usize,
    ) -> Result<SubmissionSeries, ApiError> {
        let rest = format!("/submissions/{}/series?tail={tail}", encode(submission_id));
        self.get(&contest_path(contest_id, &rest), true).await
    }

    /// Send an already-validated payload.
    pub async fn submit(&self, contest_id: &str, payload: &SubmissionPayload) -> Result<SubmitResponse, ApiError> {
        let path = contest_path(contest_id, "/submit");
        info!(contest_id, n_weights = payload.weights.len(), "submitting weights");
        let builder = self.request(Method::POST, &path, true)?.json(payload);
        self.send(builder, &path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_detail_then_message() {
        assert_eq!(error_detail(400, r#"{"detail":"Too many submissions today"}"#), "Too many submissions today");
        assert_eq!(error_detail(403, r#"{"message":"forbidden"}"#), "forbidden");
        assert_eq!(error_detail(500, "<html>oops</html>"), "HTTP 500");
        assert_eq!(error_detail(422, r#"{"detail":[{"msg":"bad"}]}"#), r#"[{"msg":"bad"}]"#);
    }

    #[test]
    fn encodes_path_segments() {
        assert_eq!(contest_path("spring 2026/a", "/submit"), "/contests/spring%202026%2Fa/submit");
    }

    #[test]
    fn builds_urls_from_config() {
        let cfg = ClientConfig::new("https://api.example.com/").expect("valid url");
        let api = ContestApi::new(cfg).expect("client builds");
        assert_eq!(api.url("/health"), "https://api.example.com/health");
    }

    #[test]
    fn authed_request_needs_token() {
        let cfg = ClientConfig::new("https://api.example.com").expect("valid url");
        let api = ContestApi::new(cfg).expect("client builds");
        assert!(matches!(api.request(Method::GET, "/contests/x/me", true), Err(ApiError::MissingToken)));
        assert!(matches!(api.request(Method::GET, "/contests", true), Err(ApiError::MissingToken)));
        assert!(api.request(Method::GET, "/health", false).is_ok());
    }

    #[test]
    fn listing_id_falls_back_to_id_then_slug() {
        assert_eq!(listing_contest_id(&json!({ "contest_id": "c1", "id": "x" })), Some("c1"));
        assert_eq!(listing_contest_id(&json!({ "id": "c2", "slug": "s" })), Some("c2"));
        assert_eq!(listing_contest_id(&json!({ "slug": "spring-cup" })), Some("spring-cup"));
        assert_eq!(listing_contest_id(&json!({ "name": "no id" })), None);
    }

    #[test]
    fn listing_label_reads_nested_contest_name() {
        let item = json!({ "contest_id": "c1", "contest": { "name": "Spring Cup" } });
        assert_eq!(listing_label(&item), "Spring Cup (c1)");
        // a top-level name is not the contest name
        assert_eq!(listing_label(&json!({ "slug": "s1", "name": "ignored" })), "s1");
    }

    #[test]
    fn finds_listing_by_any_id_field() {
        let items = vec![json!({ "id": "a" }), json!({ "slug": "b" })];
        assert_eq!(find_listing(&items, "b"), Some(&items[1]));
        assert!(find_listing(&items, "c").is_none());
    }

    #[test]
    fn contest_view_prefers_me_then_listing() {
        let me: MeResponse = serde_json::from_value(json!({
            "contest_id": "c1",
            "contest": { "n_assets": 3 }
        }))
        .expect("me parses");
        let item = json!({
            "contest_id": "c1",
            "contest": { "n_assets": 9 },
            "participant": { "status": "active" }
        });

        let view = ContestView::resolve(Some(&me), Some(&item));
        assert_eq!(view.contest["n_assets"], 3);
        assert_eq!(view.participant["status"], "active");
        assert!(view.is_complete());

        let view = ContestView::resolve(None, Some(&item));
        assert_eq!(view.contest["n_assets"], 9);

        let view = ContestView::resolve(Some(&me), None);
        assert!(view.participant.is_null());
        assert!(!view.is_complete());
    }

    #[tokio::test]
    async fn status_without_base_url_is_reported() {
        let status = ApiStatus::check(ClientConfig::new("")).await;
        assert_eq!(status, ApiStatus::MissingBaseUrl);
    }

    #[tokio::test]
    async fn unreachable_backend_is_down() {
        let cfg = ClientConfig::new("http://127.0.0.1:9")
            .expect("valid url")
            .with_timeout(std::time::Duration::from_secs(2));
        assert_eq!(ApiStatus::check(Ok(cfg)).await, ApiStatus::Down);
    }

    #[test]
    fn normalizes_listing_entries() {
        let item = SubmissionListItem::from_value(&json!({
            "id": "s-1", "status": "duplicate", "score": 0.8, "submitted_at": "2026-01-01T00:00:00Z"
        }))
        .expect("has id");
        assert_eq!(item.submission_id, "s-1");
        assert_eq!(item.status, Some(SubmitStatus::Duplicate));
        assert_eq!(item.created_at.as_deref(), Some("2026-01-01T00:00:00Z"));
        assert!(SubmissionListItem::from_value(&json!({ "score": 1 })).is_none());
    }

    #[test]
    fn submit_response_parses() {
        let resp: SubmitResponse = serde_json::from_value(json!({
            "status": "ok", "contest_id": "c1", "submission_id": "s9",
            "score": 1.25, "primary_metric": "sharpe", "metrics": { "sharpe": 1.25 }
        }))
        .expect("response parses");
        assert_eq!(resp.status, SubmitStatus::Ok);
        assert!(resp.portfolio_returns.is_none());
    }
}
