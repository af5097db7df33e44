use crate::output;
use devstack_core::config::StackConfig;
use devstack_core::runner::{run_steps, Step};
use devstack_core::paths;
use std::path::Path;

/// The check suite shared by `devstack test` and the pre-deploy gate.
///
/// Returns the runnable steps plus the names of steps skipped because
/// their workspace is missing.
pub(crate) fn suite_steps(root: &Path, config: &StackConfig) -> (Vec<Step>, Vec<String>) {
    let frontend = &config.frontend_dir;
    let mut steps = vec![
        Step::new("Flutter analyze", "flutter analyze")
            .in_dir(frontend)
            .timeout_secs(300),
        Step::new(
            "Dart format check",
            "dart format --output=none --set-exit-if-changed lib",
        )
        .in_dir(frontend)
        .timeout_secs(120),
        Step::new("Flutter unit tests", "flutter test")
            .in_dir(frontend)
            .timeout_secs(600),
    ];

    let mut skipped = Vec::new();
    if paths::functions_package_json(root, &config.backend_dir).is_file() {
        steps.push(
            Step::new("Functions build", "npm run build")
                .in_dir(format!("{}/{}", config.backend_dir, paths::FUNCTIONS_DIR))
                .timeout_secs(300),
        );
    } else {
        skipped.push("Functions build".to_string());
    }

    (steps, skipped)
}

/// `devstack test` - run the whole suite and summarize.
pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = StackConfig::load_or_default(root);

    if !paths::frontend_dir(root, &config.frontend_dir).is_dir() {
        anyhow::bail!(
            "frontend directory '{}' not found - run from the project root",
            config.frontend_dir
        );
    }

    let (steps, skipped) = suite_steps(root, &config);
    for name in &skipped {
        output::warn(&format!("{name}: skipped (workspace not present)"));
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

    if json {
        output::print_json(&summary)?;
    } else {
        println!();
        println!("{}/{} checks passed", summary.passed(), summary.total());
    }

    if !summary.all_passed() {
        anyhow::bail!(
            "{} check(s) failed: {}",
            summary.total() - summary.passed(),
            summary.failed_descriptions().join(", ")
        );
    }
    Ok(())
}
