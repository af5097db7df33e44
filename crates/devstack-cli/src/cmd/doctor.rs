use crate::output::{self, print_json, print_table};
use devstack_core::config::StackConfig;
use devstack_core::doctor::{self, CheckStatus};
use std::path::Path;

/// `devstack doctor` - validate the environment and report.
pub fn run(root: &Path, health: bool, json: bool) -> anyhow::Result<()> {
    let config = StackConfig::load_or_default(root);
    let report = doctor::run_checks(root, &config, health);

    if json {
        print_json(&report)?;
    } else {
        let rows: Vec<Vec<String>> = report
            .checks
            .iter()
            .map(|check| {
                vec![
                    check.name.clone(),
                    status_label(check.status).to_string(),
                    check.detail.clone(),
                ]
            })
            .collect();
        print_table(&["CHECK", "STATUS", "DETAIL"], rows);

        println!();
        let summary = format!(
            "{} passed, {} warnings, {} failures",
            report.passed(),
            report.warnings(),
            report.failures()
        );
        if report.is_healthy() {
            output::success(&summary);
        } else {
            output::error(&summary);
        }
    }

    if !report.is_healthy() {
        anyhow::bail!("{} check(s) failed", report.failures());
    }
    Ok(())
}

fn status_label(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "pass",
        CheckStatus::Warn => "warn",
        CheckStatus::Fail => "FAIL",
    }
}
