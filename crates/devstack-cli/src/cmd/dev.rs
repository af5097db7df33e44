use crate::output;
use anyhow::Context;
use devstack_core::config::StackConfig;
use devstack_supervisor::{
    spawn_signal_listener, MonitorOutcome, OutputSink, ServiceSpec, Supervisor, SupervisorConfig,
};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;

/// `devstack dev` - run the whole stack until Ctrl-C or a service dies.
///
/// One crashed service brings the session down: a dev environment with
/// half its stack missing is worse than a clean failure.
pub fn run(root: &Path) -> anyhow::Result<()> {
    let config = StackConfig::load(root).context("failed to load devstack.yaml")?;

    let warnings = config.validate();
    for warning in &warnings {
        output::warn(&warning.message);
    }
    if StackConfig::has_errors(&warnings) {
        anyhow::bail!("devstack.yaml has errors; fix them and retry");
    }

    let rt = tokio::runtime::Runtime::new().context("tokio runtime")?;
    rt.block_on(run_stack(root, config))
}

async fn run_stack(root: &Path, config: StackConfig) -> anyhow::Result<()> {
    let supervisor_config = SupervisorConfig {
        poll_interval: Duration::from_secs(config.poll_interval_seconds.max(1)),
        shutdown_grace: Duration::from_secs(config.shutdown_grace_seconds),
    };
    let mut supervisor = Supervisor::new(root, supervisor_config, OutputSink::stdout());

    // Signals only send a message; shutdown runs here, on the normal path.
    let (cancel_tx, mut cancel_rx) = mpsc::channel(1);
    spawn_signal_listener(cancel_tx);

    for service in &config.services {
        output::info(&format!("starting {}: {}", service.name, service.command));
        let mut spec = ServiceSpec::new(&service.name, &service.command);
        if let Some(cwd) = &service.cwd {
            spec = spec.in_dir(cwd);
        }
        if let Err(e) = supervisor.launch(spec) {
            output::error(&format!("failed to start {}: {e}", service.name));
            // Roll back whatever already started; no orphans.
            supervisor.shutdown().await;
            return Err(e).context("startup aborted");
        }
    }

    output::info("waiting for services to come up...");
    let report = supervisor
        .wait_for_ready(Duration::from_secs(config.startup_grace_seconds))
        .await;

    if !report.all_alive() {
        for exit in &report.exited {
            output::error(&format!(
                "{} exited during startup (status {})",
                exit.name,
                status_text(exit.code)
            ));
        }
        supervisor.shutdown().await;
        anyhow::bail!("{} service(s) exited during startup", report.exited.len());
    }

    output::success("all services are up:");
    for endpoint in &config.endpoints {
        println!("  {:<12} {}", endpoint.name, endpoint.url);
    }
    output::warn("press Ctrl-C to stop the stack");

    match supervisor.monitor(&mut cancel_rx).await {
        MonitorOutcome::Interrupted => {
            output::warn("stopping services...");
            supervisor.shutdown().await;
            output::success("services stopped");
            Ok(())
        }
        MonitorOutcome::ServiceExited { name, code } => {
            output::error(&format!(
                "service '{name}' exited unexpectedly (status {})",
                status_text(code)
            ));
            supervisor.shutdown().await;
            anyhow::bail!("service '{name}' exited unexpectedly")
        }
    }
}

fn status_text(code: Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "killed by signal".to_string(),
    }
}
