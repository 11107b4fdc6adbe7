//! Deployment pipeline: archive generated files, drive the hosting
//! provider's REST API, and translate every failure into a single result
//! shape for callers.
//!
//! Each deployment attempt is an independent logical flow; nothing here is
//! shared between concurrent attempts. The polling loop suspends
//! cooperatively and stops as soon as its future is dropped.

pub mod archive;
pub mod error;
pub mod netlify;
pub mod progress;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use archive::ArchiveError;
pub use error::DeployError;
use netlify::{PollOptions, RemoteDeploy, RemoteSite, poll_deploy, validate_site_name};
pub use netlify::{NetlifyClient, NETLIFY_API};
use progress::{MonotonicProgress, NullObserver, ProgressObserver, ScaledObserver};
use sitekit_core::{ComponentRecord, DeploymentRecord, ExportFormat, Site, VirtualFile};

/// Injected wait abstraction so tests can simulate time.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// The provider operations one deployment attempt needs. `NetlifyClient`
/// is the production implementation.
#[async_trait]
pub trait HostingApi: Send + Sync {
    async fn validate_credential(&self) -> bool;
    async fn create_site(&self, name: &str) -> Result<RemoteSite, DeployError>;
    async fn upload_deploy(
        &self,
        site_id: &str,
        blob: Vec<u8>,
        observer: Arc<dyn ProgressObserver>,
    ) -> Result<RemoteDeploy, DeployError>;
    async fn get_deploy(&self, site_id: &str, deploy_id: &str)
    -> Result<RemoteDeploy, DeployError>;
}

/// One deployment attempt's inputs.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub site: Site,
    pub components: Vec<ComponentRecord>,
    /// Desired remote site name, DNS-label shaped.
    pub site_name: String,
    /// Opaque provider token. Held only for presence validation here; the
    /// HTTP client carries it in request headers.
    pub token: String,
    pub format: ExportFormat,
    /// Skip all network calls and synthesize a placeholder result.
    pub demo: bool,
}

/// Outcome of one deployment attempt. Identifiers obtained before a failure
/// are kept so callers are never left looking for a deploy in the dark.
#[derive(Debug, Clone, Default)]
pub struct DeploymentResult {
    pub success: bool,
    pub live_url: Option<String>,
    pub preview_url: Option<String>,
    pub site_id: Option<String>,
    pub deploy_id: Option<String>,
    pub error: Option<String>,
    pub demo: bool,
}

impl DeploymentResult {
    fn failure(
        err: &DeployError,
        site_id: Option<String>,
        deploy_id: Option<String>,
        demo: bool,
    ) -> Self {
        Self {
            success: false,
            error: Some(err.user_message()),
            site_id,
            deploy_id,
            demo,
            ..Self::default()
        }
    }

    /// Record for the history sink; only successful deployments produce one.
    pub fn history_record(&self, project: &str, site_name: &str) -> Option<DeploymentRecord> {
        if !self.success || self.demo {
            return None;
        }
        Some(DeploymentRecord {
            project: project.to_string(),
            site_name: site_name.to_string(),
            url: self.live_url.clone()?,
            deployed_at: chrono::Utc::now(),
            status: "success".to_string(),
        })
    }
}

/// Generation hook, injectable so tests can stub the file set.
pub type GeneratorFn = fn(&Site, &[ComponentRecord], ExportFormat) -> Vec<VirtualFile>;

/// Single entry point tying generation, archiving, and the provider API
/// together. Every failure is caught and mapped into the returned
/// [`DeploymentResult`]; nothing escapes to the caller.
pub struct SiteDeployer<'a> {
    api: &'a dyn HostingApi,
    sleeper: &'a dyn Sleeper,
    generate: GeneratorFn,
    observer: Arc<dyn ProgressObserver>,
}

impl<'a> SiteDeployer<'a> {
    pub fn new(api: &'a dyn HostingApi, sleeper: &'a dyn Sleeper) -> Self {
        Self {
            api,
            sleeper,
            generate: sitekit_generator::generate,
            observer: Arc::new(NullObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_generator(mut self, generate: GeneratorFn) -> Self {
        self.generate = generate;
        self
    }

    pub async fn deploy(&self, request: &DeployRequest) -> DeploymentResult {
        let observer: Arc<dyn ProgressObserver> =
            Arc::new(MonotonicProgress::new(self.observer.clone()));

        // Fail fast on bad input, before any network traffic
        if let Err(err) = validate_site_name(&request.site_name) {
            return DeploymentResult::failure(&err, None, None, request.demo);
        }
        if request.token.trim().is_empty() {
            let err = DeployError::Validation("a deploy token is required".into());
            return DeploymentResult::failure(&err, None, None, request.demo);
        }

        if request.demo {
            debug!("demo mode: skipping all network calls");
            observer.on_progress(100, "demo deployment complete");
            return DeploymentResult {
                success: true,
                live_url: Some(format!("https://{}.netlify.app", request.site_name)),
                demo: true,
                ..DeploymentResult::default()
            };
        }

        observer.on_progress(5, "generating site files");
        let files = (self.generate)(&request.site, &request.components, request.format);

        observer.on_progress(10, "packaging site archive");
        let blob = match archive::archive(&files) {
            Ok(blob) => blob,
            Err(ArchiveError::Empty) => {
                let err = DeployError::Validation(
                    "site generation produced no files; nothing to deploy".into(),
                );
                return DeploymentResult::failure(&err, None, None, false);
            }
            Err(err) => {
                return DeploymentResult::failure(&DeployError::Archive(err), None, None, false);
            }
        };

        observer.on_progress(15, "creating remote site");
        let site = match self.api.create_site(&request.site_name).await {
            Ok(site) => site,
            Err(err) => return DeploymentResult::failure(&err, None, None, false),
        };
        info!(site_id = %site.id, name = %site.name, "remote site created");

        let upload_observer = Arc::new(ScaledObserver::new(observer.clone(), 20, 60));
        let deploy = match self.api.upload_deploy(&site.id, blob, upload_observer).await {
            Ok(deploy) => deploy,
            Err(err) => return DeploymentResult::failure(&err, Some(site.id), None, false),
        };

        observer.on_progress(70, "waiting for the remote build");
        let final_deploy = match self.wait_for_deploy(&site, deploy, request.format).await {
            Ok(deploy) => deploy,
            Err((err, deploy_id)) => {
                return DeploymentResult::failure(&err, Some(site.id), Some(deploy_id), false);
            }
        };

        // Prefer the provider's canonical HTTPS URL, fall back to the
        // conventional subdomain pattern
        let live_url = final_deploy
            .ssl_url
            .clone()
            .or_else(|| site.ssl_url.clone())
            .or_else(|| final_deploy.url.clone())
            .unwrap_or_else(|| format!("https://{}.netlify.app", request.site_name));

        observer.on_progress(100, "deployment complete");
        info!(url = %live_url, "deployment ready");
        DeploymentResult {
            success: true,
            live_url: Some(live_url),
            preview_url: final_deploy.deploy_ssl_url.clone(),
            site_id: Some(site.id),
            deploy_id: Some(final_deploy.id),
            error: None,
            demo: false,
        }
    }

    /// Poll the freshly-uploaded deploy to a terminal state, unless the
    /// upload response already was one.
    async fn wait_for_deploy(
        &self,
        site: &RemoteSite,
        deploy: RemoteDeploy,
        format: ExportFormat,
    ) -> Result<RemoteDeploy, (DeployError, String)> {
        match deploy.state.as_str() {
            "ready" => return Ok(deploy),
            "error" => {
                let message = deploy
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "deploy failed with no error message".into());
                return Err((DeployError::Remote(message), deploy.id));
            }
            _ => {}
        }

        // Framework formats trigger a remote build, which runs much longer
        // than publishing a plain static bundle
        let options = match format {
            ExportFormat::StaticHtml => PollOptions::default(),
            ExportFormat::React | ExportFormat::Astro => PollOptions::relaxed(),
        };

        let api = self.api;
        let site_id = site.id.as_str();
        let deploy_id = deploy.id.as_str();
        poll_deploy(
            move || api.get_deploy(site_id, deploy_id),
            self.sleeper,
            &options,
        )
        .await
        .map_err(|err| (err, deploy.id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NoopSleeper;

    #[async_trait]
    impl Sleeper for NoopSleeper {
        async fn sleep(&self, _duration: Duration) {}
    }

    /// Scriptable provider double that counts every HTTP-level call.
    #[derive(Default)]
    struct FakeApi {
        validate_calls: AtomicUsize,
        create_calls: AtomicUsize,
        upload_calls: AtomicUsize,
        status_calls: AtomicUsize,
        /// Deploy state returned by the upload response.
        upload_state: Mutex<String>,
        /// States handed out by successive status calls; the last one
        /// repeats once the script runs out.
        status_states: Mutex<VecDeque<String>>,
        deploy_error_message: Mutex<Option<String>>,
        fail_upload: bool,
    }

    impl FakeApi {
        fn new() -> Self {
            let api = Self::default();
            *api.upload_state.lock().unwrap() = "uploading".into();
            api
        }

        fn with_status_script(self, states: &[&str]) -> Self {
            *self.status_states.lock().unwrap() =
                states.iter().map(|s| s.to_string()).collect();
            self
        }

        fn total_calls(&self) -> usize {
            self.validate_calls.load(Ordering::SeqCst)
                + self.create_calls.load(Ordering::SeqCst)
                + self.upload_calls.load(Ordering::SeqCst)
                + self.status_calls.load(Ordering::SeqCst)
        }

        fn deploy(&self, state: &str) -> RemoteDeploy {
            RemoteDeploy {
                id: "deploy-456".into(),
                state: state.into(),
                ssl_url: (state == "ready").then(|| "https://my-site-1.netlify.app".to_string()),
                url: None,
                deploy_ssl_url: (state == "ready")
                    .then(|| "https://deploy-456--my-site-1.netlify.app".to_string()),
                error_message: self.deploy_error_message.lock().unwrap().clone(),
            }
        }
    }

    #[async_trait]
    impl HostingApi for FakeApi {
        async fn validate_credential(&self) -> bool {
            self.validate_calls.fetch_add(1, Ordering::SeqCst);
            true
        }

        async fn create_site(&self, name: &str) -> Result<RemoteSite, DeployError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            Ok(RemoteSite {
                id: "site-123".into(),
                name: name.into(),
                ssl_url: None,
                url: None,
            })
        }

        async fn upload_deploy(
            &self,
            _site_id: &str,
            blob: Vec<u8>,
            observer: Arc<dyn ProgressObserver>,
        ) -> Result<RemoteDeploy, DeployError> {
            self.upload_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_upload {
                return Err(DeployError::Remote("upload rejected".into()));
            }
            assert!(!blob.is_empty(), "orchestrator must never upload an empty blob");
            observer.on_progress(100, "uploaded");
            let state = self.upload_state.lock().unwrap().clone();
            Ok(self.deploy(&state))
        }

        async fn get_deploy(
            &self,
            _site_id: &str,
            _deploy_id: &str,
        ) -> Result<RemoteDeploy, DeployError> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            let mut states = self.status_states.lock().unwrap();
            let state = if states.len() > 1 {
                states.pop_front().unwrap()
            } else {
                states.front().cloned().unwrap_or_else(|| "ready".into())
            };
            Ok(self.deploy(&state))
        }
    }

    fn request(demo: bool) -> DeployRequest {
        DeployRequest {
            site: Site {
                name: "My Site".into(),
                description: String::new(),
                pages: vec![],
            },
            components: vec![ComponentRecord::new("hero-1", "centered-hero")],
            site_name: "my-site-1".into(),
            token: "token-abc".into(),
            format: ExportFormat::StaticHtml,
            demo,
        }
    }

    fn empty_generator(
        _site: &Site,
        _components: &[ComponentRecord],
        _format: ExportFormat,
    ) -> Vec<VirtualFile> {
        Vec::new()
    }

    #[tokio::test]
    async fn demo_mode_issues_no_http_calls() {
        let api = FakeApi::new();
        let deployer = SiteDeployer::new(&api, &NoopSleeper);
        let result = deployer.deploy(&request(true)).await;

        assert!(result.success);
        assert!(result.demo);
        assert_eq!(result.live_url.as_deref(), Some("https://my-site-1.netlify.app"));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn empty_archive_fails_before_any_network_call() {
        let api = FakeApi::new();
        let deployer = SiteDeployer::new(&api, &NoopSleeper).with_generator(empty_generator);
        let result = deployer.deploy(&request(false)).await;

        assert!(!result.success);
        assert!(result.error.as_ref().unwrap().contains("no files"));
        assert_eq!(api.create_calls.load(Ordering::SeqCst), 0);
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn invalid_site_name_fails_fast() {
        let api = FakeApi::new();
        let deployer = SiteDeployer::new(&api, &NoopSleeper);
        let mut bad = request(false);
        bad.site_name = "My_Site".into();
        let result = deployer.deploy(&bad).await;

        assert!(!result.success);
        assert!(result.error.as_ref().unwrap().contains("invalid site name"));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn missing_token_fails_fast() {
        let api = FakeApi::new();
        let deployer = SiteDeployer::new(&api, &NoopSleeper);
        let mut bad = request(false);
        bad.token = "   ".into();
        let result = deployer.deploy(&bad).await;

        assert!(!result.success);
        assert!(result.error.as_ref().unwrap().contains("token"));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn happy_path_polls_to_ready() {
        let api = FakeApi::new().with_status_script(&["processing", "processing", "ready"]);
        let deployer = SiteDeployer::new(&api, &NoopSleeper);
        let result = deployer.deploy(&request(false)).await;

        assert!(result.success, "unexpected failure: {:?}", result.error);
        assert_eq!(result.site_id.as_deref(), Some("site-123"));
        assert_eq!(result.deploy_id.as_deref(), Some("deploy-456"));
        assert_eq!(result.live_url.as_deref(), Some("https://my-site-1.netlify.app"));
        assert_eq!(
            result.preview_url.as_deref(),
            Some("https://deploy-456--my-site-1.netlify.app")
        );
        assert_eq!(api.status_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn already_ready_upload_skips_polling() {
        let api = FakeApi::new();
        *api.upload_state.lock().unwrap() = "ready".into();
        let deployer = SiteDeployer::new(&api, &NoopSleeper);
        let result = deployer.deploy(&request(false)).await;

        assert!(result.success);
        assert_eq!(api.status_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn upload_failure_still_reports_site_id() {
        let mut api = FakeApi::new();
        api.fail_upload = true;
        let deployer = SiteDeployer::new(&api, &NoopSleeper);
        let result = deployer.deploy(&request(false)).await;

        assert!(!result.success);
        assert_eq!(result.site_id.as_deref(), Some("site-123"));
        assert!(result.deploy_id.is_none());
        assert!(result.error.as_ref().unwrap().contains("upload rejected"));
    }

    #[tokio::test]
    async fn poll_timeout_reports_both_ids_and_dashboard_hint() {
        let api = FakeApi::new().with_status_script(&["processing"]);
        let deployer = SiteDeployer::new(&api, &NoopSleeper);
        let result = deployer.deploy(&request(false)).await;

        assert!(!result.success);
        assert_eq!(result.site_id.as_deref(), Some("site-123"));
        assert_eq!(result.deploy_id.as_deref(), Some("deploy-456"));
        assert!(result.error.as_ref().unwrap().contains("dashboard"));
        // static-html polling budget is exactly the default attempt count
        assert_eq!(
            api.status_calls.load(Ordering::SeqCst) as u32,
            PollOptions::default().max_attempts
        );
    }

    #[tokio::test]
    async fn remote_error_state_surfaces_provider_message() {
        let api = FakeApi::new().with_status_script(&["building", "error"]);
        *api.deploy_error_message.lock().unwrap() = Some("Build failed: missing index".into());
        let deployer = SiteDeployer::new(&api, &NoopSleeper);
        let result = deployer.deploy(&request(false)).await;

        assert!(!result.success);
        assert!(
            result
                .error
                .as_ref()
                .unwrap()
                .contains("Build failed: missing index")
        );
        assert!(!result.error.as_ref().unwrap().contains("dashboard"));
    }

    #[tokio::test]
    async fn history_record_only_for_real_successes() {
        let api = FakeApi::new();
        let deployer = SiteDeployer::new(&api, &NoopSleeper);

        let demo = deployer.deploy(&request(true)).await;
        assert!(demo.history_record("proj", "my-site-1").is_none());

        let real = deployer.deploy(&request(false)).await;
        let record = real.history_record("proj", "my-site-1").unwrap();
        assert_eq!(record.site_name, "my-site-1");
        assert_eq!(record.status, "success");
        assert_eq!(record.url, real.live_url.unwrap());
    }

    #[tokio::test]
    async fn progress_reaches_one_hundred_and_never_decreases() {
        struct Track {
            seen: Mutex<Vec<u8>>,
        }
        impl ProgressObserver for Track {
            fn on_progress(&self, percent: u8, _message: &str) {
                self.seen.lock().unwrap().push(percent);
            }
        }

        let track = Arc::new(Track {
            seen: Mutex::new(Vec::new()),
        });
        let api = FakeApi::new();
        let deployer = SiteDeployer::new(&api, &NoopSleeper).with_observer(track.clone());
        let result = deployer.deploy(&request(false)).await;
        assert!(result.success);

        let seen = track.seen.lock().unwrap();
        assert_eq!(*seen.last().unwrap(), 100);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "progress decreased: {:?}", seen);
    }
}
