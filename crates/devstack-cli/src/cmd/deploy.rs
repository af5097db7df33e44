use crate::cmd::test::suite_steps;
use crate::output;
use devstack_core::config::StackConfig;
use devstack_core::runner::{run_step, run_steps, Step};
use devstack_core::paths;
use std::path::Path;

/// `devstack deploy` - build everything and push it to Firebase, stage by
/// stage, aborting on the first failure.
pub fn run(root: &Path, skip_tests: bool) -> anyhow::Result<()> {
    let config = StackConfig::load_or_default(root);

    let firebase_config = paths::firebase_config_path(root, &config.backend_dir);
    if !firebase_config.is_file() {
        anyhow::bail!(
            "firebase is not configured ({} missing) - run 'firebase init' in {}/",
            firebase_config.display(),
            config.backend_dir
        );
    }

    if skip_tests {
        output::warn("skipping pre-deploy tests (--skip-tests)");
    } else {
        output::info("running pre-deploy tests...");
        let (steps, _skipped) = suite_steps(root, &config);
        let summary = run_steps(root, &steps, true);
        if !summary.all_passed() {
            for failed in summary.failed_descriptions() {
                output::error(&format!("{failed} - failed"));
            }
            anyhow::bail!(
                "pre-deploy tests failed; fix them or re-run with --skip-tests"
            );
        }
        output::success("pre-deploy tests passed");
    }

    let backend = &config.backend_dir;
    let functions_dir = format!("{}/{}", backend, paths::FUNCTIONS_DIR);
    let stages = vec![
        Step::new("Flutter web build", "flutter build web --release")
            .in_dir(&config.frontend_dir)
            .timeout_secs(600),
        Step::new("Functions build", "npm run build")
            .in_dir(&functions_dir)
            .timeout_secs(300),
        Step::new("Firestore rules", "firebase deploy --only firestore:rules")
            .in_dir(backend)
            .timeout_secs(300),
        Step::new("Cloud Functions", "firebase deploy --only functions")
            .in_dir(backend)
            .timeout_secs(600),
        Step::new("Hosting", "firebase deploy --only hosting")
            .in_dir(backend)
            .timeout_secs(600),
    ];

    let mut deployed = Vec::new();
    for stage in &stages {
        output::info(&format!("{}...", stage.description));
        let result = run_step(root, stage);
        if result.success {
            output::success(&format!(
                "{} - ok ({} ms)",
                result.description, result.duration_ms
            ));
            deployed.push(result.description);
        } else {
            output::error(&format!("{} - failed", result.description));
            if !result.output.is_empty() {
                eprintln!("{}", result.output);
            }
            anyhow::bail!("deploy aborted at stage '{}'", stage.description);
        }
    }

    println!();
    output::success("deploy complete:");
    for stage in &deployed {
        println!("  - {stage}");
    }
    println!();
    output::info("run 'firebase hosting:channel:list' in the backend directory to see the live URL");
    Ok(())
}
