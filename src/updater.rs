use crate::api_client::{ApiClient, Release};
use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Release tag version (`v1.2.3`, `1.2.3-rc.1`). Missing components count as
/// zero, so `1.2` equals `1.2.0`. Pre-release identifiers follow semver:
/// numeric ones compare as numbers and sort below alphanumeric ones, and a
/// shorter identifier list sorts first.
#[derive(Debug, Clone)]
pub struct Version {
    parts: Vec<u64>,
    pre: Option<Vec<PreRelease>>,
}

// Variant order matters: numeric identifiers sort below alphanumeric ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum PreRelease {
    Numeric(u64),
    Alpha(String),
}

impl PreRelease {
    fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        if raw.bytes().all(|b| b.is_ascii_digit()) {
            return raw.parse().ok().map(PreRelease::Numeric);
        }
        Some(PreRelease::Alpha(raw.to_string()))
    }
}

impl std::fmt::Display for PreRelease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreRelease::Numeric(n) => write!(f, "{}", n),
            PreRelease::Alpha(s) => write!(f, "{}", s),
        }
    }
}

impl Version {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let raw = raw
            .strip_prefix('v')
            .or_else(|| raw.strip_prefix('V'))
            .unwrap_or(raw);
        // Build metadata does not take part in ordering.
        let raw = raw.split('+').next().unwrap_or(raw);

        let (core, pre) = match raw.split_once('-') {
            Some((core, pre)) => {
                let ids = pre
                    .split('.')
                    .map(PreRelease::parse)
                    .collect::<Option<Vec<_>>>()?;
                (core, Some(ids))
            }
            None => (raw, None),
        };

        let parts = core
            .split('.')
            .map(|p| p.parse::<u64>().ok())
            .collect::<Option<Vec<_>>>()?;

        if parts.is_empty() {
            return None;
        }

        Some(Self { parts, pre })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        for i in 0..len {
            let a = self.parts.get(i).copied().unwrap_or(0);
            let b = other.parts.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }

        match (&self.pre, &other.pre) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core: Vec<String> = self.parts.iter().map(u64::to_string).collect();
        write!(f, "{}", core.join("."))?;
        if let Some(pre) = &self.pre {
            let ids: Vec<String> = pre.iter().map(PreRelease::to_string).collect();
            write!(f, "-{}", ids.join("."))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct VersionRecord {
    path: PathBuf,
}

impl VersionRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when the file does not exist yet.
    pub async fn read(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content.trim().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read version file {}", self.path.display())),
        }
    }

    pub async fn write(&self, version: &str) -> Result<()> {
        tokio::fs::write(&self.path, format!("{}\n", version.trim()))
            .await
            .with_context(|| format!("Failed to write version file {}", self.path.display()))
    }
}

pub trait ReleaseSource {
    fn latest_release(&self) -> impl Future<Output = Result<Release>> + Send;
}

impl ReleaseSource for ApiClient {
    async fn latest_release(&self) -> Result<Release> {
        ApiClient::latest_release(self).await
    }
}

pub trait UpdateFlow {
    fn apply(&self, release: &Release) -> impl Future<Output = Result<()>> + Send;
}

/// Runs an operator-supplied shell command, then records the new version.
/// Without a command the release is only announced in the log.
pub struct CommandUpdater {
    command: Option<String>,
    record: VersionRecord,
}

impl CommandUpdater {
    pub fn new(command: Option<String>, record: VersionRecord) -> Self {
        Self { command, record }
    }
}

impl UpdateFlow for CommandUpdater {
    async fn apply(&self, release: &Release) -> Result<()> {
        let Some(command) = &self.command else {
            warn!(
                "Release {} is available{}; set UPDATE_COMMAND to install it automatically",
                release.tag_name,
                release
                    .html_url
                    .as_deref()
                    .map(|u| format!(" at {}", u))
                    .unwrap_or_default()
            );
            return Ok(());
        };

        info!("Running update command for release {}", release.tag_name);
        let status = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .env("RELEASE_TAG", &release.tag_name)
            .status()
            .await
            .context("Failed to spawn update command")?;

        if !status.success() {
            anyhow::bail!("Update command exited with {}", status);
        }

        self.record.write(&release.tag_name).await?;
        info!(
            "Updated to {}, version recorded in {}",
            release.tag_name,
            self.record.path().display()
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    UpdateTriggered,
    NoUpdateNeeded,
    CheckFailed,
}

pub struct UpdateChecker<S, U> {
    source: S,
    flow: U,
    record: VersionRecord,
    current_version: String,
    timeout: Duration,
}

impl<S: ReleaseSource, U: UpdateFlow> UpdateChecker<S, U> {
    pub fn new(
        source: S,
        flow: U,
        record: VersionRecord,
        current_version: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            flow,
            record,
            current_version: current_version.into(),
            timeout,
        }
    }

    pub async fn local_version(&self) -> Option<Version> {
        let compiled = Version::parse(&self.current_version);
        let recorded = match self.record.read().await {
            Ok(Some(raw)) => {
                let parsed = Version::parse(&raw);
                if parsed.is_none() {
                    warn!(
                        "Ignoring unparseable version {:?} in {}",
                        raw,
                        self.record.path().display()
                    );
                }
                parsed
            }
            Ok(None) => None,
            Err(e) => {
                warn!("{:#}", e);
                None
            }
        };

        match (compiled, recorded) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    pub async fn check(&self) -> CheckOutcome {
        let release = match tokio::time::timeout(self.timeout, self.source.latest_release()).await
        {
            Ok(Ok(release)) => release,
            Ok(Err(e)) => {
                warn!("Update check failed: {:#}", e);
                return CheckOutcome::CheckFailed;
            }
            Err(_) => {
                warn!("Update check timed out after {:?}", self.timeout);
                return CheckOutcome::CheckFailed;
            }
        };

        let Some(remote) = Version::parse(&release.tag_name) else {
            warn!("Release tag {:?} is not a version", release.tag_name);
            return CheckOutcome::CheckFailed;
        };

        let Some(local) = self.local_version().await else {
            warn!(
                "Installed version {:?} is not a version",
                self.current_version
            );
            return CheckOutcome::CheckFailed;
        };

        if remote <= local {
            debug!("Installed version {} is up to date (latest {})", local, remote);
            return CheckOutcome::NoUpdateNeeded;
        }

        info!(
            "New release {} available (installed {}){}",
            remote,
            local,
            release
                .published_at
                .map(|at| format!(", published {}", at.format("%Y-%m-%d %H:%M UTC")))
                .unwrap_or_default()
        );

        if let Err(e) = self.flow.apply(&release).await {
            warn!("Update to {} failed: {:#}", release.tag_name, e);
        }

        CheckOutcome::UpdateTriggered
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Checking,
    UpdateTriggered,
    NoUpdateNeeded,
    CheckFailed,
    ReadyToServe,
}

impl From<CheckOutcome> for GateState {
    fn from(outcome: CheckOutcome) -> Self {
        match outcome {
            CheckOutcome::UpdateTriggered => GateState::UpdateTriggered,
            CheckOutcome::NoUpdateNeeded => GateState::NoUpdateNeeded,
            CheckOutcome::CheckFailed => GateState::CheckFailed,
        }
    }
}

pub struct StartupGate<'a, S, U> {
    checker: &'a UpdateChecker<S, U>,
    state: GateState,
}

impl<'a, S: ReleaseSource, U: UpdateFlow> StartupGate<'a, S, U> {
    pub fn new(checker: &'a UpdateChecker<S, U>) -> Self {
        Self {
            checker,
            state: GateState::Idle,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Always ends in `ReadyToServe`, whatever the check produced.
    pub async fn run(&mut self) -> CheckOutcome {
        self.transition(GateState::Checking);
        let outcome = self.checker.check().await;
        self.transition(outcome.into());
        self.transition(GateState::ReadyToServe);
        outcome
    }

    fn transition(&mut self, next: GateState) {
        debug!("Startup gate: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

/// Runs the startup gate once. `None` (no repository configured) skips it.
pub async fn check_for_updates<S, U>(checker: Option<&UpdateChecker<S, U>>) -> Option<CheckOutcome>
where
    S: ReleaseSource,
    U: UpdateFlow,
{
    let Some(checker) = checker else {
        info!("GITHUB_REPO is not set, skipping update check");
        return None;
    };

    let outcome = StartupGate::new(checker).run().await;
    info!("Startup update check finished: {:?}", outcome);
    Some(outcome)
}
