use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::task::JoinHandle;

use crate::error::{Result, SupervisorError};
use crate::sink::OutputSink;
use crate::types::ServiceSpec;

// ─── ServiceHandle ────────────────────────────────────────────────────────

/// The supervisor's live reference to one running service: the child
/// process plus the task forwarding its output.
///
/// Handles are created by [`launch`](ServiceHandle::launch) and consumed by
/// the supervisor's shutdown path once the process is confirmed dead.
#[derive(Debug)]
pub(crate) struct ServiceHandle {
    pub(crate) spec: ServiceSpec,
    pub(crate) child: Child,
    pub(crate) forwarder: JoinHandle<()>,
}

impl ServiceHandle {
    /// Spawn the service and start its output-forwarding task.
    ///
    /// The command's program is resolved up front so a missing executable
    /// surfaces as a launch error instead of a shell exiting 127 five
    /// seconds into the run.
    pub(crate) fn launch(spec: ServiceSpec, root: &Path, sink: &OutputSink) -> Result<Self> {
        let program = spec
            .command
            .split_whitespace()
            .next()
            .ok_or_else(|| SupervisorError::EmptyCommand(spec.name.clone()))?;

        if let Err(e) = which::which(program) {
            return Err(SupervisorError::Launch {
                service: spec.name.clone(),
                command: spec.command.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("'{program}' not found on PATH ({e})"),
                ),
            });
        }

        let cwd = match &spec.cwd {
            Some(dir) => root.join(dir),
            None => root.to_path_buf(),
        };

        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(&spec.command)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| SupervisorError::Launch {
            service: spec.name.clone(),
            command: spec.command.clone(),
            source: e,
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "stdout not captured")
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "stderr not captured")
        })?;

        let forwarder = tokio::spawn(forward_output(
            spec.name.clone(),
            stdout,
            stderr,
            sink.clone(),
        ));

        Ok(Self {
            spec,
            child,
            forwarder,
        })
    }

    /// Has the process not exited yet? Non-blocking.
    pub(crate) fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

// ─── Output forwarding ────────────────────────────────────────────────────

/// Merge the child's stdout and stderr line streams into the shared sink.
///
/// Lines are forwarded as they arrive, so cross-stream ordering is arrival
/// order; within each stream, order is preserved. The task ends when both
/// streams hit EOF - naturally on exit, or when shutdown closes the pipes.
async fn forward_output(
    name: String,
    stdout: ChildStdout,
    stderr: ChildStderr,
    sink: OutputSink,
) {
    let mut out_lines = BufReader::new(stdout).lines();
    let mut err_lines = BufReader::new(stderr).lines();
    let mut out_done = false;
    let mut err_done = false;

    while !(out_done && err_done) {
        tokio::select! {
            line = out_lines.next_line(), if !out_done => match line {
                Ok(Some(line)) => emit(&sink, &name, &line),
                Ok(None) | Err(_) => out_done = true,
            },
            line = err_lines.next_line(), if !err_done => match line {
                Ok(Some(line)) => emit(&sink, &name, &line),
                Ok(None) | Err(_) => err_done = true,
            },
        }
    }
}

fn emit(sink: &OutputSink, name: &str, line: &str) {
    let trimmed = line.trim_end();
    if !trimmed.is_empty() {
        sink.line(name, trimmed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn wait_for_line(sink: &OutputSink, needle: &str) -> bool {
        for _ in 0..100 {
            if sink.captured().iter().any(|l| l == needle) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }

    #[tokio::test]
    async fn forwards_stdout_with_prefix() {
        let sink = OutputSink::memory();
        let spec = ServiceSpec::new("hello", "printf 'hi there\\n'");
        let mut handle = ServiceHandle::launch(spec, Path::new("."), &sink).unwrap();

        assert!(wait_for_line(&sink, "[hello] hi there").await);
        let _ = handle.child.wait().await;
    }

    #[tokio::test]
    async fn forwards_stderr_too() {
        let sink = OutputSink::memory();
        let spec = ServiceSpec::new("warn", "printf 'oops\\n' >&2");
        let mut handle = ServiceHandle::launch(spec, Path::new("."), &sink).unwrap();

        assert!(wait_for_line(&sink, "[warn] oops").await);
        let _ = handle.child.wait().await;
    }

    #[tokio::test]
    async fn trims_trailing_whitespace_and_skips_blank_lines() {
        let sink = OutputSink::memory();
        let spec = ServiceSpec::new("sv", "printf 'one   \\n\\n   \\ntwo\\n'");
        let mut handle = ServiceHandle::launch(spec, Path::new("."), &sink).unwrap();
        let _ = handle.child.wait().await;
        let _ = (&mut handle.forwarder).await;

        assert_eq!(sink.captured(), vec!["[sv] one", "[sv] two"]);
    }

    #[tokio::test]
    async fn missing_executable_is_a_launch_error() {
        let sink = OutputSink::memory();
        let spec = ServiceSpec::new("ghost", "definitely-not-a-real-binary-xyz --flag");
        let err = ServiceHandle::launch(spec, Path::new("."), &sink).unwrap_err();

        match err {
            SupervisorError::Launch {
                service, command, ..
            } => {
                assert_eq!(service, "ghost");
                assert!(command.starts_with("definitely-not"));
            }
            other => panic!("expected Launch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_command_is_rejected() {
        let sink = OutputSink::memory();
        let spec = ServiceSpec::new("blank", "   ");
        let err = ServiceHandle::launch(spec, Path::new("."), &sink).unwrap_err();
        assert!(matches!(err, SupervisorError::EmptyCommand(name) if name == "blank"));
    }
}
