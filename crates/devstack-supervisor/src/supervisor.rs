use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::service::ServiceHandle;
use crate::sink::OutputSink;
use crate::types::{MonitorOutcome, ReadinessReport, ServiceExit, ServiceSpec, SupervisorConfig};

// ─── Supervisor ───────────────────────────────────────────────────────────

/// Owns the full set of supervised services for one `devstack dev` run.
///
/// There is no global registry: whoever runs the dev loop constructs a
/// `Supervisor`, launches services into it, and drives it to shutdown.
/// `&mut self` on [`launch`](Self::launch) and [`shutdown`](Self::shutdown)
/// keeps the handle list free of concurrent mutation by construction.
pub struct Supervisor {
    root: PathBuf,
    config: SupervisorConfig,
    sink: OutputSink,
    handles: Vec<ServiceHandle>,
    running: bool,
}

impl Supervisor {
    pub fn new(root: impl Into<PathBuf>, config: SupervisorConfig, sink: OutputSink) -> Self {
        Self {
            root: root.into(),
            config,
            sink,
            handles: Vec::new(),
            running: true,
        }
    }

    /// Start one service and register its handle.
    ///
    /// On failure nothing is registered and the error carries the service
    /// name, command, and underlying OS error. Callers are expected to shut
    /// down any already-launched services - a half-started stack is not
    /// useful.
    pub fn launch(&mut self, spec: ServiceSpec) -> Result<()> {
        let handle = ServiceHandle::launch(spec, &self.root, &self.sink)?;
        tracing::debug!(service = %handle.spec.name, pid = ?handle.child.id(), "launched");
        self.handles.push(handle);
        Ok(())
    }

    /// Names of all registered services, in launch order.
    pub fn service_names(&self) -> Vec<String> {
        self.handles.iter().map(|h| h.spec.name.clone()).collect()
    }

    /// PIDs of the registered services that still have one.
    pub fn pids(&self) -> Vec<u32> {
        self.handles.iter().filter_map(|h| h.child.id()).collect()
    }

    /// How many registered services have not exited.
    pub fn live_count(&mut self) -> usize {
        self.handles
            .iter_mut()
            .map(|h| h.is_alive())
            .filter(|&alive| alive)
            .count()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Give the services `delay` to come up, then snapshot who survived.
    ///
    /// A fixed delay, not a health check: services that crash during the
    /// window are reported as exited, everything else as alive.
    pub async fn wait_for_ready(&mut self, delay: Duration) -> ReadinessReport {
        tokio::time::sleep(delay).await;

        let mut report = ReadinessReport::default();
        for handle in &mut self.handles {
            match handle.child.try_wait() {
                Ok(Some(status)) => report.exited.push(ServiceExit {
                    name: handle.spec.name.clone(),
                    code: status.code(),
                }),
                _ => report.alive.push(handle.spec.name.clone()),
            }
        }
        report
    }

    /// Poll liveness until a service dies or cancellation arrives.
    ///
    /// The first unexpected exit wins: monitoring stops and the exited
    /// service is reported by name. No restarts. Cancellation (a signal
    /// listener or any other task sending on `cancel`) is observed within
    /// one poll interval - in practice immediately, via `select!`.
    pub async fn monitor(&mut self, cancel: &mut mpsc::Receiver<()>) -> MonitorOutcome {
        let mut ticker = tokio::time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Some(exit) = self.find_exited() {
                        tracing::warn!(service = %exit.name, code = ?exit.code, "service exited unexpectedly");
                        return MonitorOutcome::ServiceExited {
                            name: exit.name,
                            code: exit.code,
                        };
                    }
                }
                _ = cancel.recv() => {
                    tracing::debug!("cancellation received");
                    return MonitorOutcome::Interrupted;
                }
            }
        }
    }

    fn find_exited(&mut self) -> Option<ServiceExit> {
        for handle in &mut self.handles {
            if let Ok(Some(status)) = handle.child.try_wait() {
                return Some(ServiceExit {
                    name: handle.spec.name.clone(),
                    code: status.code(),
                });
            }
        }
        None
    }

    /// Terminate every service: graceful terminate, bounded wait, then
    /// force-kill. Idempotent - the second call finds nothing to do.
    ///
    /// After this returns, no process the supervisor started is alive and
    /// every forwarding task has seen end-of-stream (or been abandoned
    /// after a bounded join).
    pub async fn shutdown(&mut self) {
        self.running = false;
        if self.handles.is_empty() {
            return;
        }

        let grace = self.config.shutdown_grace;
        for mut handle in std::mem::take(&mut self.handles) {
            let name = handle.spec.name.clone();

            match handle.child.try_wait() {
                Ok(Some(status)) => {
                    tracing::debug!(service = %name, ?status, "already exited");
                }
                _ => {
                    if let Some(pid) = handle.child.id() {
                        terminate(pid).await;
                    }
                    match tokio::time::timeout(grace, handle.child.wait()).await {
                        Ok(Ok(status)) => {
                            tracing::debug!(service = %name, ?status, "terminated");
                        }
                        Ok(Err(e)) => {
                            tracing::warn!(service = %name, error = %e, "wait failed during shutdown");
                        }
                        Err(_) => {
                            tracing::warn!(
                                service = %name,
                                grace_secs = grace.as_secs(),
                                "did not exit within grace period, force-killing"
                            );
                            let _ = handle.child.kill().await;
                        }
                    }
                }
            }

            // The pipes are closed now; the forwarder ends on EOF. Bounded
            // join so a wedged read can't hang shutdown.
            if tokio::time::timeout(Duration::from_secs(1), &mut handle.forwarder)
                .await
                .is_err()
            {
                handle.forwarder.abort();
            }
        }
    }
}

/// Ask a process to exit via SIGTERM (kill(1)), so it can catch the signal
/// and clean up. Best-effort; escalation happens in `shutdown`.
async fn terminate(pid: u32) {
    let _ = Command::new("kill")
        .arg(pid.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
}

/// Spawn the listener that maps OS signals to a cancellation message.
///
/// The handler itself does nothing but send on the channel - all shutdown
/// logic runs on the supervisor's own task when `monitor` observes the
/// message.
pub fn spawn_signal_listener(tx: mpsc::Sender<()>) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => return,
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
            let _ = tx.send(()).await;
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
            let _ = tx.send(()).await;
        }
    });
}

/// Check whether a PID is still alive, via `kill -0`.
///
/// Used by callers (and tests) to confirm the post-shutdown guarantee.
pub async fn process_alive(pid: u32) -> bool {
    Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}
