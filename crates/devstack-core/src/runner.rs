//! Sequential step runner for the setup, test, and deploy workflows.
//!
//! Every workflow step is an external command (`flutter`, `npm`,
//! `firebase`, …) run to completion. Output is captured and surfaced on
//! failure; a step that hangs is killed after its timeout.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

/// One workflow step.
#[derive(Debug, Clone)]
pub struct Step {
    /// Human-readable label, e.g. "Flutter analyze".
    pub description: String,
    /// Shell command line, run via `sh -c`.
    pub command: String,
    /// Working directory relative to the project root; root when unset.
    pub cwd: Option<PathBuf>,
    /// `None` means wait indefinitely.
    pub timeout: Option<Duration>,
}

impl Step {
    pub fn new(description: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            command: command.into(),
            cwd: None,
            timeout: Some(Duration::from_secs(300)),
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = if secs == 0 {
            None
        } else {
            Some(Duration::from_secs(secs))
        };
        self
    }
}

/// Outcome of a single step.
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub description: String,
    pub success: bool,
    pub output: String,
    pub duration_ms: u64,
}

/// Outcomes of a whole workflow run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub results: Vec<StepResult>,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }

    pub fn failed_descriptions(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.description.as_str())
            .collect()
    }
}

/// Run `steps` in order. With `fail_fast`, stop after the first failure
/// (remaining steps are never started and do not appear in the summary);
/// otherwise run everything and let the caller inspect the summary.
pub fn run_steps(root: &Path, steps: &[Step], fail_fast: bool) -> RunSummary {
    let mut results = Vec::new();

    for step in steps {
        let result = run_step(root, step);
        let failed = !result.success;
        results.push(result);
        if failed && fail_fast {
            break;
        }
    }

    RunSummary { results }
}

/// Execute one step to completion.
pub fn run_step(root: &Path, step: &Step) -> StepResult {
    let start = std::time::Instant::now();
    let (success, output) = execute_shell(&step.command, &step_cwd(root, step), step.timeout);
    StepResult {
        description: step.description.clone(),
        success,
        output,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

fn step_cwd(root: &Path, step: &Step) -> PathBuf {
    match &step.cwd {
        Some(dir) => root.join(dir),
        None => root.to_path_buf(),
    }
}

/// Execute a shell command with an optional timeout. Returns (success, combined output).
///
/// Uses dedicated threads for stdout/stderr reading (avoiding pipe-buffer deadlocks)
/// and a waiter thread with `mpsc::recv_timeout` for timeout support (no busy-wait).
fn execute_shell(command: &str, cwd: &Path, timeout: Option<Duration>) -> (bool, String) {
    if command.trim().is_empty() {
        return (false, "step command is empty".to_string());
    }

    let mut child = match Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(c) => c,
        Err(e) => return (false, format!("failed to spawn: {e}")),
    };

    let child_pid = child.id();

    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || -> String {
        let mut buf = String::new();
        if let Some(mut r) = stdout_handle {
            use std::io::Read;
            let _ = r.read_to_string(&mut buf);
        }
        buf
    });
    let stderr_thread = std::thread::spawn(move || -> String {
        let mut buf = String::new();
        if let Some(mut r) = stderr_handle {
            use std::io::Read;
            let _ = r.read_to_string(&mut buf);
        }
        buf
    });

    let wait_result = match timeout {
        None => child.wait(),
        Some(timeout_dur) => {
            // The child is moved to a waiter thread; on timeout we kill by PID.
            let (tx, rx) = std::sync::mpsc::channel();
            std::thread::spawn(move || {
                let _ = tx.send(child.wait());
            });

            match rx.recv_timeout(timeout_dur) {
                Ok(result) => result,
                Err(_) => {
                    // Timeout - kill the process. The waiter thread will unblock
                    // once the killed process exits; reader threads will get EOF
                    // on the closed pipes and terminate naturally.
                    kill_process(child_pid);
                    let secs = timeout_dur.as_secs();
                    return (false, format!("timed out after {secs}s"));
                }
            }
        }
    };

    let stdout_buf = stdout_thread.join().unwrap_or_default();
    let stderr_buf = stderr_thread.join().unwrap_or_default();

    let status = match wait_result {
        Ok(s) => s,
        Err(e) => return (false, format!("wait failed: {e}")),
    };

    format_output(status.success(), &stdout_buf, &stderr_buf)
}

/// Combine stdout/stderr and cap to 10KB (keeping the tail).
fn format_output(success: bool, stdout: &str, stderr: &str) -> (bool, String) {
    let output = if stderr.is_empty() {
        stdout.to_string()
    } else if stdout.is_empty() {
        stderr.to_string()
    } else {
        format!("{stdout}\n{stderr}")
    };
    const MAX_OUTPUT: usize = 10 * 1024;
    let trimmed = output.trim();
    let capped = if trimmed.len() > MAX_OUTPUT {
        &trimmed[trimmed.len() - MAX_OUTPUT..]
    } else {
        trimmed
    };
    (success, capped.to_string())
}

/// Terminate a process by PID using SIGKILL. Best-effort; errors are silently ignored.
fn kill_process(pid: u32) {
    let _ = Command::new("kill")
        .arg("-9")
        .arg(pid.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
}
