//! Scorer backed by an external model process.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use super::{EstimationError, Scorer, parse_scorer_output};
use crate::domain::TimeBucket;

/// How to launch the model process.
///
/// Relative paths are relative to the server's working directory, not to
/// `working_dir`; [`ProcessScorer::new`] makes them absolute before any
/// child is spawned.
#[derive(Debug, Clone)]
pub struct ProcessScorerConfig {
    /// Bare names (`python`) are looked up on `PATH`.
    pub interpreter: PathBuf,
    pub script: PathBuf,
    /// Directory the child runs in.
    pub working_dir: Option<PathBuf>,
    /// Upper bound on one invocation. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ProcessScorerConfig {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from("python"),
            script: PathBuf::from("ml/predict.py"),
            working_dir: Some(PathBuf::from("ml")),
            timeout: None,
        }
    }
}

impl ProcessScorerConfig {
    pub fn new(interpreter: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
            working_dir: None,
            timeout: None,
        }
    }

    pub fn with_interpreter(mut self, interpreter: impl Into<PathBuf>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Anchor relative script, working-dir, and interpreter paths at `base`.
    ///
    /// The child runs inside `working_dir`, so a relative script path would
    /// otherwise be looked up from there. Bare interpreter names are left
    /// for `PATH` lookup.
    pub fn resolved_from(mut self, base: &Path) -> Self {
        if self.script.is_relative() {
            self.script = base.join(&self.script);
        }
        if let Some(dir) = self.working_dir.take() {
            self.working_dir = Some(if dir.is_relative() { base.join(dir) } else { dir });
        }
        if self.interpreter.is_relative() && self.interpreter.components().count() > 1 {
            self.interpreter = base.join(&self.interpreter);
        }
        self
    }
}

/// Runs `<interpreter> <script> <distance_km> <duration_min> <region> <time_bucket>`
/// once per estimate and reads a JSON object from its stdout.
///
/// Each call owns its child process, so concurrent estimates never share
/// state. The child is killed if the call is cancelled or times out.
#[derive(Debug, Clone)]
pub struct ProcessScorer {
    config: ProcessScorerConfig,
}

impl ProcessScorer {
    /// Create a scorer, anchoring relative paths at the current directory.
    pub fn new(config: ProcessScorerConfig) -> Self {
        let config = match std::env::current_dir() {
            Ok(cwd) => config.resolved_from(&cwd),
            Err(e) => {
                warn!(error = %e, "cannot read current directory, scorer paths left relative");
                config
            }
        };
        Self { config }
    }

    fn command(
        &self,
        distance_km: f64,
        duration_min: f64,
        region: &str,
        time_bucket: TimeBucket,
    ) -> Command {
        let mut cmd = Command::new(&self.config.interpreter);
        cmd.arg(&self.config.script)
            .arg(distance_km.to_string())
            .arg(duration_min.to_string())
            .arg(region)
            .arg(time_bucket.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &self.config.working_dir {
            cmd.current_dir(dir);
        }

        cmd
    }
}

#[async_trait]
impl Scorer for ProcessScorer {
    #[instrument(skip(self), fields(interpreter = %self.config.interpreter.display()))]
    async fn estimate(
        &self,
        distance_km: f64,
        duration_min: f64,
        region: &str,
        time_bucket: TimeBucket,
    ) -> Result<f64, EstimationError> {
        let child = self
            .command(distance_km, duration_min, region, time_bucket)
            .spawn()
            .map_err(|e| {
                EstimationError::Unavailable(format!(
                    "failed to launch {} {}: {e}",
                    self.config.interpreter.display(),
                    self.config.script.display()
                ))
            })?;

        // Dropping the wait future drops the child, which kills it.
        let waited = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| {
                    warn!(?limit, "fare scorer timed out");
                    EstimationError::Failure {
                        reason: format!("timed out after {limit:?}"),
                        stderr: String::new(),
                    }
                })?,
            None => child.wait_with_output().await,
        };

        let output = waited.map_err(|e| EstimationError::Failure {
            reason: format!("failed to collect output: {e}"),
            stderr: String::new(),
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            warn!(status = %output.status, %stderr, "fare scorer exited unsuccessfully");
            return Err(EstimationError::Failure {
                reason: describe_status(output.status),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(stdout = %stdout.trim(), "fare scorer output");

        parse_scorer_output(&stdout)
    }
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}
