//! Operational smoke test: is the stack up?
//!
//! Checks that enough containers are running and that the backend health
//! endpoint and the frontend root both answer `200 OK`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{info, instrument, warn};

use crate::error::SmokeError;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SmokeConfig {
    /// Default: "http://localhost:5000/health".
    #[serde(default = "default_backend_health_url")]
    pub backend_health_url: String,
    /// Default: "http://localhost:3000".
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
    /// Per-probe timeout. Default: 5.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Substring a container name must contain to count. Default: "judging".
    #[serde(default = "default_container_filter")]
    pub container_filter: String,
    /// Default: 3.
    #[serde(default = "default_min_containers")]
    pub min_containers: usize,
    /// Container CLI used for listing. Default: "docker".
    #[serde(default = "default_docker_bin")]
    pub docker_bin: String,
}

fn default_backend_health_url() -> String {
    "http://localhost:5000/health".into()
}
fn default_frontend_url() -> String {
    "http://localhost:3000".into()
}
fn default_timeout_secs() -> u64 {
    5
}
fn default_container_filter() -> String {
    "judging".into()
}
fn default_min_containers() -> usize {
    3
}
fn default_docker_bin() -> String {
    "docker".into()
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            backend_health_url: default_backend_health_url(),
            frontend_url: default_frontend_url(),
            timeout_secs: default_timeout_secs(),
            container_filter: default_container_filter(),
            min_containers: default_min_containers(),
            docker_bin: default_docker_bin(),
        }
    }
}

/// Source of running container names.
#[async_trait]
pub trait ContainerLister: Send + Sync {
    async fn running_names(&self) -> Result<Vec<String>, SmokeError>;
}

/// Lists containers with `docker ps --format {{.Names}}`.
pub struct DockerCli {
    bin: String,
}

impl DockerCli {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

#[async_trait]
impl ContainerLister for DockerCli {
    async fn running_names(&self) -> Result<Vec<String>, SmokeError> {
        let output = Command::new(&self.bin)
            .args(["ps", "--format", "{{.Names}}"])
            .output()
            .await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SmokeError::Lister(format!(
                "`{} ps` exited with {}: {}",
                self.bin,
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerCheck {
    Passed { matched: Vec<String> },
    TooFew { matched: Vec<String>, required: usize },
    /// The lister itself failed.
    Failed(String),
}

impl ContainerCheck {
    pub fn passed(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }

    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Passed { .. } => None,
            Self::TooFew { .. } => Some(
                "Start the stack with `docker compose up -d` and inspect `docker compose ps`"
                    .into(),
            ),
            Self::Failed(_) => {
                Some("Make sure Docker is installed and the daemon is running".into())
            }
        }
    }
}

impl fmt::Display for ContainerCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed { matched } => {
                write!(f, "{} containers running ({})", matched.len(), matched.join(", "))
            }
            Self::TooFew { matched, required } => write!(
                f,
                "only {} of {} expected containers running",
                matched.len(),
                required
            ),
            Self::Failed(reason) => write!(f, "could not list containers: {reason}"),
        }
    }
}

/// Outcome of one HTTP probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    Up,
    UnexpectedStatus(u16),
    TimedOut,
    Unreachable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub name: &'static str,
    pub url: String,
    pub status: ProbeStatus,
    pub timeout: Duration,
}

impl Probe {
    pub fn passed(&self) -> bool {
        self.status == ProbeStatus::Up
    }

    pub fn hint(&self) -> Option<String> {
        match &self.status {
            ProbeStatus::Up => None,
            ProbeStatus::UnexpectedStatus(code) => Some(format!(
                "{} answered {code}; check its logs with `docker compose logs`",
                self.name
            )),
            ProbeStatus::TimedOut => Some(format!(
                "{} did not answer within {}s; it may still be starting, retry shortly",
                self.name,
                self.timeout.as_secs()
            )),
            ProbeStatus::Unreachable(_) => Some(format!(
                "Could not connect to {}; is the {} container running and its port published?",
                self.url, self.name
            )),
        }
    }
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            ProbeStatus::Up => write!(f, "{} is up ({})", self.name, self.url),
            ProbeStatus::UnexpectedStatus(code) => {
                write!(f, "{} returned HTTP {code} ({})", self.name, self.url)
            }
            ProbeStatus::TimedOut => write!(f, "{} timed out ({})", self.name, self.url),
            ProbeStatus::Unreachable(reason) => {
                write!(f, "{} unreachable ({}): {reason}", self.name, self.url)
            }
        }
    }
}

/// GET `url` once and classify the answer.
#[instrument(skip(client))]
pub async fn probe(client: &Client, url: &str, timeout: Duration) -> ProbeStatus {
    match client.get(url).timeout(timeout).send().await {
        Ok(response) if response.status().as_u16() == 200 => ProbeStatus::Up,
        Ok(response) => ProbeStatus::UnexpectedStatus(response.status().as_u16()),
        Err(e) if e.is_timeout() => ProbeStatus::TimedOut,
        Err(e) => ProbeStatus::Unreachable(e.to_string()),
    }
}

/// Count names containing `filter` and compare against `required`.
pub fn check_containers(names: &[String], filter: &str, required: usize) -> ContainerCheck {
    let matched: Vec<String> = names
        .iter()
        .filter(|n| n.contains(filter))
        .cloned()
        .collect();
    if matched.len() >= required {
        ContainerCheck::Passed { matched }
    } else {
        ContainerCheck::TooFew { matched, required }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeReport {
    pub containers: ContainerCheck,
    pub backend: Probe,
    pub frontend: Probe,
}

impl SmokeReport {
    pub fn passed(&self) -> bool {
        self.containers.passed() && self.backend.passed() && self.frontend.passed()
    }

    /// Non-zero only when the container check fails. Probe failures are
    /// reported as warnings.
    pub fn exit_code(&self) -> i32 {
        if self.containers.passed() { 0 } else { 1 }
    }

    /// Remediation hints for everything that did not pass.
    pub fn hints(&self) -> Vec<String> {
        [
            self.containers.hint(),
            self.backend.hint(),
            self.frontend.hint(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl fmt::Display for SmokeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = |ok: bool| if ok { "PASS" } else { "FAIL" };
        writeln!(f, "[{}] {}", mark(self.containers.passed()), self.containers)?;
        writeln!(f, "[{}] {}", mark(self.backend.passed()), self.backend)?;
        writeln!(f, "[{}] {}", mark(self.frontend.passed()), self.frontend)?;
        for hint in self.hints() {
            writeln!(f, "  hint: {hint}")?;
        }
        write!(
            f,
            "{}",
            if self.passed() {
                "All checks passed"
            } else {
                "Some checks failed"
            }
        )
    }
}

/// Run every check. Individual failures end up in the report, not in `Err`.
pub async fn run(
    config: &SmokeConfig,
    lister: &dyn ContainerLister,
) -> Result<SmokeReport, SmokeError> {
    let client = Client::builder()
        .build()
        .map_err(|e| SmokeError::Client(e.to_string()))?;
    let timeout = Duration::from_secs(config.timeout_secs);

    let containers = match lister.running_names().await {
        Ok(names) => check_containers(&names, &config.container_filter, config.min_containers),
        Err(e) => ContainerCheck::Failed(e.to_string()),
    };

    let (backend, frontend) = tokio::join!(
        probe(&client, &config.backend_health_url, timeout),
        probe(&client, &config.frontend_url, timeout),
    );

    let report = SmokeReport {
        containers,
        backend: Probe {
            name: "backend",
            url: config.backend_health_url.clone(),
            status: backend,
            timeout,
        },
        frontend: Probe {
            name: "frontend",
            url: config.frontend_url.clone(),
            status: frontend,
            timeout,
        },
    };

    if report.passed() {
        info!("Smoke test passed");
    } else {
        warn!(exit_code = report.exit_code(), "Smoke test found problems");
    }
    Ok(report)
}
