//! Netlify API client.
//!
//! Drives one deployment attempt against the provider's REST surface: create
//! a site, upload a zip as a new deploy of it, and poll the deploy until it
//! reaches a terminal state. Create and upload are never retried; polling is
//! the only repeated operation, and it only reads state.

use crate::error::DeployError;
use crate::progress::ProgressObserver;
use crate::{HostingApi, Sleeper};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

pub const NETLIFY_API: &str = "https://api.netlify.com/api/v1";

/// Remote site names may be at most 63 DNS-label characters.
pub const MAX_SITE_NAME_LEN: usize = 63;

const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

/// Provider-side site resource. Only opaque identifiers are held here.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteSite {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ssl_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Provider-side deploy resource: one specific upload/build of a site.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteDeploy {
    pub id: String,
    pub state: String,
    #[serde(default)]
    pub ssl_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub deploy_ssl_url: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl RemoteDeploy {
    /// `ready` and `error` are the provider's terminal states; everything
    /// else counts as in progress.
    pub fn is_terminal(&self) -> bool {
        matches!(self.state.as_str(), "ready" | "error")
    }
}

/// Polling cadence and budget for one deploy.
#[derive(Debug, Clone)]
pub struct PollOptions {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollOptions {
    /// 2 s between checks, budgeted to roughly three minutes of waiting.
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            max_attempts: 90,
        }
    }
}

impl PollOptions {
    /// Slower cadence for deploys that trigger a remote framework build.
    pub fn relaxed() -> Self {
        Self {
            interval: Duration::from_millis(5000),
            max_attempts: 36,
        }
    }
}

/// Netlify REST client. The bearer token rides on every request and is never
/// logged or persisted here.
pub struct NetlifyClient {
    http: reqwest::Client,
    base_url: String,
}

impl NetlifyClient {
    pub fn new(token: &str) -> Result<Self, DeployError> {
        Self::with_base_url(token, NETLIFY_API)
    }

    /// Client against a non-default API root (test servers).
    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self, DeployError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                DeployError::Validation(
                    "deploy token contains characters not allowed in a header".into(),
                )
            })?,
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("sitekit"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Lightweight reachability/auth check against the listing endpoint.
    /// Both auth rejection and transport failure report `false`.
    pub async fn validate_credential(&self) -> bool {
        let url = format!("{}/sites", self.base_url);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                debug!(error = %err, "credential check failed to reach provider");
                false
            }
        }
    }

    /// All sites visible to the credential.
    pub async fn list_sites(&self) -> Result<Vec<RemoteSite>, DeployError> {
        let url = format!("{}/sites", self.base_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(remote_error(status, &body));
        }
        serde_json::from_str(&body)
            .map_err(|e| DeployError::Remote(format!("unexpected site listing payload: {}", e)))
    }

    /// Create a new site resource. The name is validated locally before any
    /// network traffic.
    pub async fn create_site(&self, name: &str) -> Result<RemoteSite, DeployError> {
        validate_site_name(name)?;

        let url = format!("{}/sites", self.base_url);
        let body = json!({
            "name": name,
            "custom_domain": null,
            "build_settings": { "cmd": "", "dir": "", "env": {} },
        });

        debug!(site = name, "creating remote site");
        let response = self.http.post(&url).json(&body).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(remote_error(status, &body));
        }
        serde_json::from_str(&body)
            .map_err(|e| DeployError::Remote(format!("unexpected site payload: {}", e)))
    }

    /// Submit the archive as the content of a new deploy. Upload progress is
    /// reported to the observer as bytes are handed to the transport.
    pub async fn upload_deploy(
        &self,
        site_id: &str,
        blob: Vec<u8>,
        observer: Arc<dyn ProgressObserver>,
    ) -> Result<RemoteDeploy, DeployError> {
        let url = format!("{}/sites/{}/deploys", self.base_url, site_id);
        let total = blob.len();
        debug!(site_id, bytes = total, "uploading deploy archive");

        let sent = Arc::new(AtomicUsize::new(0));
        let chunks: Vec<Vec<u8>> = blob
            .chunks(UPLOAD_CHUNK_BYTES)
            .map(|chunk| chunk.to_vec())
            .collect();
        let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
            let done = sent.fetch_add(chunk.len(), Ordering::SeqCst) + chunk.len();
            let percent = if total == 0 { 100 } else { done * 100 / total };
            observer.on_progress(
                percent as u8,
                &format!("uploaded {} of {} bytes", done, total),
            );
            Ok::<Vec<u8>, std::io::Error>(chunk)
        }));

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/zip")
            .header("Content-Length", total)
            .body(reqwest::Body::wrap_stream(stream))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(remote_error(status, &body));
        }
        serde_json::from_str(&body)
            .map_err(|e| DeployError::Remote(format!("unexpected deploy payload: {}", e)))
    }

    /// Current state of one deploy.
    pub async fn get_deploy(
        &self,
        site_id: &str,
        deploy_id: &str,
    ) -> Result<RemoteDeploy, DeployError> {
        let url = format!("{}/sites/{}/deploys/{}", self.base_url, site_id, deploy_id);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(remote_error(status, &body));
        }
        serde_json::from_str(&body)
            .map_err(|e| DeployError::Remote(format!("unexpected deploy payload: {}", e)))
    }

    /// Poll the deploy at a fixed interval until it is terminal or the
    /// attempt budget runs out.
    pub async fn poll_until_terminal(
        &self,
        site_id: &str,
        deploy_id: &str,
        options: &PollOptions,
        sleeper: &dyn Sleeper,
    ) -> Result<RemoteDeploy, DeployError> {
        poll_deploy(move || self.get_deploy(site_id, deploy_id), sleeper, options).await
    }
}

#[async_trait]
impl HostingApi for NetlifyClient {
    async fn validate_credential(&self) -> bool {
        NetlifyClient::validate_credential(self).await
    }

    async fn create_site(&self, name: &str) -> Result<RemoteSite, DeployError> {
        NetlifyClient::create_site(self, name).await
    }

    async fn upload_deploy(
        &self,
        site_id: &str,
        blob: Vec<u8>,
        observer: Arc<dyn ProgressObserver>,
    ) -> Result<RemoteDeploy, DeployError> {
        NetlifyClient::upload_deploy(self, site_id, blob, observer).await
    }

    async fn get_deploy(&self, site_id: &str, deploy_id: &str) -> Result<RemoteDeploy, DeployError> {
        NetlifyClient::get_deploy(self, site_id, deploy_id).await
    }
}

/// Drive a deploy-status fetcher until it reports a terminal state.
///
/// Generic over the fetch so the loop can be exercised without a server.
/// Dropping the returned future cancels polling; no further fetches are
/// issued.
pub async fn poll_deploy<F, Fut>(
    mut fetch: F,
    sleeper: &dyn Sleeper,
    options: &PollOptions,
) -> Result<RemoteDeploy, DeployError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<RemoteDeploy, DeployError>>,
{
    for attempt in 1..=options.max_attempts {
        let deploy = fetch().await?;
        match deploy.state.as_str() {
            "ready" => return Ok(deploy),
            "error" => {
                return Err(DeployError::Remote(
                    deploy
                        .error_message
                        .unwrap_or_else(|| "deploy failed with no error message".into()),
                ));
            }
            state => {
                debug!(attempt, state, "deploy still in progress");
            }
        }
        if attempt < options.max_attempts {
            sleeper.sleep(options.interval).await;
        }
    }
    Err(DeployError::Timeout {
        attempts: options.max_attempts,
    })
}

/// Check a desired site name against the provider's DNS-label rules:
/// lowercase alphanumerics and interior hyphens, at most 63 characters.
pub fn validate_site_name(name: &str) -> Result<(), DeployError> {
    let invalid = |reason: &str| {
        Err(DeployError::Validation(format!(
            "invalid site name '{}': {}",
            name, reason
        )))
    };

    if name.len() < 2 {
        return invalid("must be at least 2 characters");
    }
    if name.len() > MAX_SITE_NAME_LEN {
        return invalid("must be at most 63 characters");
    }

    let bytes = name.as_bytes();
    let is_label_char = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    if !is_label_char(bytes[0]) || !is_label_char(bytes[bytes.len() - 1]) {
        return invalid("must start and end with a lowercase letter or digit");
    }
    if !bytes.iter().all(|&b| is_label_char(b) || b == b'-') {
        return invalid("may contain only lowercase letters, numbers, and hyphens");
    }

    Ok(())
}

/// Build a `Remote` error from a non-2xx response, preferring the provider's
/// own `message` field over a generic status line.
fn remote_error(status: StatusCode, body: &str) -> DeployError {
    let provider_message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from));
    match provider_message {
        Some(message) if !message.is_empty() => DeployError::Remote(message),
        _ => DeployError::Remote(format!("HTTP {}", status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn deploy(id: &str, state: &str) -> RemoteDeploy {
        RemoteDeploy {
            id: id.into(),
            state: state.into(),
            ssl_url: None,
            url: None,
            deploy_ssl_url: None,
            error_message: None,
        }
    }

    /// Sleeper that records requested intervals instead of waiting.
    struct RecordingSleeper {
        slept: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        fn new() -> Self {
            Self {
                slept: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.slept.lock().unwrap().push(duration);
        }
    }

    #[test]
    fn accepts_valid_site_name() {
        assert!(validate_site_name("my-site-1").is_ok());
    }

    #[test]
    fn rejects_uppercase_and_underscores() {
        assert!(validate_site_name("My_Site").is_err());
    }

    #[test]
    fn rejects_leading_hyphen() {
        assert!(validate_site_name("-leadinghyphen").is_err());
    }

    #[test]
    fn rejects_trailing_hyphen() {
        assert!(validate_site_name("trailing-").is_err());
    }

    #[test]
    fn rejects_64_char_name() {
        let name = "a".repeat(64);
        assert!(validate_site_name(&name).is_err());
        let name = "a".repeat(63);
        assert!(validate_site_name(&name).is_ok());
    }

    #[test]
    fn name_validation_is_a_validation_error() {
        match validate_site_name("-bad") {
            Err(DeployError::Validation(_)) => {}
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn poll_returns_ready_after_intermediate_states() {
        let calls = AtomicUsize::new(0);
        let sleeper = RecordingSleeper::new();
        let result = poll_deploy(
            || {
                let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if call <= 4 {
                        Ok(deploy("d1", "processing"))
                    } else {
                        Ok(deploy("d1", "ready"))
                    }
                }
            },
            &sleeper,
            &PollOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(result.state, "ready");
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        // one wait between each of the five checks
        assert_eq!(sleeper.slept.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn poll_times_out_after_exact_budget() {
        let calls = AtomicUsize::new(0);
        let sleeper = RecordingSleeper::new();
        let options = PollOptions {
            interval: Duration::from_millis(2000),
            max_attempts: 7,
        };
        let result = poll_deploy(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(deploy("d1", "processing")) }
            },
            &sleeper,
            &options,
        )
        .await;

        match result {
            Err(DeployError::Timeout { attempts: 7 }) => {}
            other => panic!("expected timeout, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 7);
        assert!(
            sleeper
                .slept
                .lock()
                .unwrap()
                .iter()
                .all(|d| *d == Duration::from_millis(2000))
        );
    }

    #[tokio::test]
    async fn poll_surfaces_remote_error_state() {
        let sleeper = RecordingSleeper::new();
        let result = poll_deploy(
            || async {
                Ok(RemoteDeploy {
                    error_message: Some("Build script returned non-zero exit code".into()),
                    ..deploy("d1", "error")
                })
            },
            &sleeper,
            &PollOptions::default(),
        )
        .await;

        match result {
            Err(DeployError::Remote(message)) => {
                assert_eq!(message, "Build script returned non-zero exit code");
            }
            other => panic!("expected remote error, got {:?}", other),
        }
    }

    #[test]
    fn remote_error_prefers_provider_message() {
        let err = remote_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message":"name already taken"}"#,
        );
        assert_eq!(err.to_string(), "provider error: name already taken");
    }

    #[test]
    fn remote_error_falls_back_to_status() {
        let err = remote_error(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn terminal_states() {
        assert!(deploy("d", "ready").is_terminal());
        assert!(deploy("d", "error").is_terminal());
        assert!(!deploy("d", "processing").is_terminal());
        assert!(!deploy("d", "uploading").is_terminal());
    }

    #[test]
    fn default_poll_budget_bounds_wait_to_about_three_minutes() {
        let options = PollOptions::default();
        let total = options.interval * options.max_attempts;
        assert!(total <= Duration::from_secs(200));
        assert!(total >= Duration::from_secs(100));
    }
}
