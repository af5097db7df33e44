use std::path::PathBuf;
use std::time::Duration;

// ─── ServiceSpec ──────────────────────────────────────────────────────────

/// Immutable description of one service: what to run and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    pub name: String,
    /// Shell command line, run via `sh -c`.
    pub command: String,
    /// Working directory relative to the supervisor's root; the root itself
    /// when unset.
    pub cwd: Option<PathBuf>,
}

impl ServiceSpec {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            cwd: None,
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

// ─── SupervisorConfig ─────────────────────────────────────────────────────

/// Timing knobs. Production uses the defaults; tests shrink them to
/// milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct SupervisorConfig {
    /// Cadence of the liveness poll in [`Supervisor::monitor`].
    pub poll_interval: Duration,
    /// How long a service gets to exit after a graceful terminate before
    /// being force-killed.
    pub shutdown_grace: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

// ─── ReadinessReport ──────────────────────────────────────────────────────

/// Exit observed on a supervised service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceExit {
    pub name: String,
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

/// One-time snapshot of which services survived the startup delay.
///
/// This is a heuristic probe - a fixed delay followed by a liveness check,
/// not a log-marker or port scan.
#[derive(Debug, Clone, Default)]
pub struct ReadinessReport {
    pub alive: Vec<String>,
    pub exited: Vec<ServiceExit>,
}

impl ReadinessReport {
    pub fn all_alive(&self) -> bool {
        self.exited.is_empty()
    }
}

// ─── MonitorOutcome ───────────────────────────────────────────────────────

/// Why [`Supervisor::monitor`] returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// A service exited while the stack was supposed to be running.
    /// The supervisor does not restart it; the caller is expected to shut
    /// the remaining services down.
    ServiceExited { name: String, code: Option<i32> },
    /// Cancellation was requested (signal or programmatic).
    Interrupted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_builder_sets_cwd() {
        let spec = ServiceSpec::new("web", "flutter run").in_dir("frontend");
        assert_eq!(spec.cwd.as_deref(), Some(std::path::Path::new("frontend")));
    }

    #[test]
    fn default_config_uses_coarse_intervals() {
        let cfg = SupervisorConfig::default();
        assert_eq!(cfg.poll_interval, Duration::from_secs(5));
        assert_eq!(cfg.shutdown_grace, Duration::from_secs(5));
    }

    #[test]
    fn readiness_all_alive_iff_no_exits() {
        let mut report = ReadinessReport::default();
        report.alive.push("web".into());
        assert!(report.all_alive());
        report.exited.push(ServiceExit {
            name: "api".into(),
            code: Some(1),
        });
        assert!(!report.all_alive());
    }
}
