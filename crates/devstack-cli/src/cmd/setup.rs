use crate::output;
use devstack_core::config::StackConfig;
use devstack_core::runner::{run_steps, Step};
use devstack_core::{doctor, paths, scaffold, toolchain};
use std::path::Path;

/// `devstack setup` - prepare a fresh checkout for development.
///
/// Installs project dependencies and scaffolds env files. System tools are
/// never installed automatically; a missing one stops setup with its
/// install hint.
pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = StackConfig::load_or_default(root);

    // Toolchain gate. flutter and npm are required for the steps below;
    // everything else is reported but not blocking here.
    let mut missing_required = Vec::new();
    for tool in toolchain::detect() {
        if tool.found {
            output::success(&format!(
                "{}: {}",
                tool.name,
                tool.version.as_deref().unwrap_or("found")
            ));
        } else {
            output::warn(&format!("{} not found - {}", tool.name, tool.install_hint));
            if tool.binary == "flutter" || tool.binary == "npm" {
                missing_required.push(tool.name);
            }
        }
    }
    if !missing_required.is_empty() {
        anyhow::bail!(
            "required tools missing: {} (install them and re-run setup)",
            missing_required.join(", ")
        );
    }

    let functions_dir = format!("{}/{}", config.backend_dir, paths::FUNCTIONS_DIR);
    let steps = vec![
        Step::new("Enable Flutter web", "flutter config --enable-web").timeout_secs(60),
        Step::new("Flutter dependencies", "flutter pub get")
            .in_dir(&config.frontend_dir)
            .timeout_secs(180),
        Step::new("Functions dependencies", "npm install")
            .in_dir(&functions_dir)
            .timeout_secs(300),
    ];

    for step in &steps {
        output::info(&format!("{}...", step.description));
    }
    let summary = run_steps(root, &steps, false);
    for result in &summary.results {
        if result.success {
            output::success(&format!(
                "{} - ok ({} ms)",
                result.description, result.duration_ms
            ));
        } else {
            output::error(&format!("{} - failed", result.description));
            if !result.output.is_empty() {
                eprintln!("{}", result.output);
            }
        }
    }

    if scaffold::ensure_backend_env(root, &config)? {
        output::success(&format!(
            "created {}",
            paths::backend_env_path(root, &config.backend_dir).display()
        ));
    }
    if scaffold::ensure_gitignore(root)? {
        output::success("created .gitignore");
    }

    // Final pass: the same structure checks doctor runs, minus the network.
    let report = doctor::run_checks(root, &config, false);

    if json {
        output::print_json(&summary)?;
    } else {
        println!();
        println!(
            "setup: {}/{} steps ok, doctor: {} passed / {} warnings / {} failures",
            summary.passed(),
            summary.total(),
            report.passed(),
            report.warnings(),
            report.failures()
        );
    }

    if !summary.all_passed() {
        anyhow::bail!(
            "setup finished with failures: {}",
            summary.failed_descriptions().join(", ")
        );
    }
    Ok(())
}
