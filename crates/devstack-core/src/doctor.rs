//! Environment validation behind `devstack doctor`.
//!
//! Checks are grouped (project structure, toolchain, Flutter web, config,
//! optional emulator health) and collected into a single report the CLI
//! renders as a table or JSON.

use crate::config::{StackConfig, WarnLevel};
use crate::paths;
use crate::toolchain;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize)]
pub struct Check {
    pub name: String,
    pub status: CheckStatus,
    pub detail: String,
}

impl Check {
    fn pass(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Pass,
            detail: detail.into(),
        }
    }

    fn warn(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Warn,
            detail: detail.into(),
        }
    }

    fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Fail,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    pub generated_at: DateTime<Utc>,
    pub checks: Vec<Check>,
}

impl DoctorReport {
    pub fn failures(&self) -> usize {
        self.count(CheckStatus::Fail)
    }

    pub fn warnings(&self) -> usize {
        self.count(CheckStatus::Warn)
    }

    pub fn passed(&self) -> usize {
        self.count(CheckStatus::Pass)
    }

    pub fn is_healthy(&self) -> bool {
        self.failures() == 0
    }

    fn count(&self, status: CheckStatus) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }
}

/// Run every check group against the project at `root`.
///
/// `probe_health` additionally issues HTTP requests to the configured
/// endpoints - only meaningful while `devstack dev` is running.
pub fn run_checks(root: &Path, config: &StackConfig, probe_health: bool) -> DoctorReport {
    let mut checks = Vec::new();

    checks.extend(structure_checks(root, config));
    checks.extend(toolchain_checks());
    checks.push(flutter_web_check());
    checks.extend(config_checks(root, config));
    if probe_health {
        checks.extend(health_checks(config));
    }

    DoctorReport {
        generated_at: Utc::now(),
        checks,
    }
}

// ---------------------------------------------------------------------------
// Project structure
// ---------------------------------------------------------------------------

fn structure_checks(root: &Path, config: &StackConfig) -> Vec<Check> {
    let frontend = &config.frontend_dir;
    let backend = &config.backend_dir;
    let mut checks = Vec::new();

    checks.push(dir_check(
        "frontend directory",
        &paths::frontend_dir(root, frontend),
    ));
    checks.push(file_check(
        "frontend pubspec.yaml",
        &paths::pubspec_path(root, frontend),
        CheckStatus::Fail,
        "missing - is this a Flutter project?",
    ));
    checks.push(dir_check(
        "backend directory",
        &paths::backend_dir(root, backend),
    ));
    checks.push(file_check(
        "firebase.json",
        &paths::firebase_config_path(root, backend),
        CheckStatus::Fail,
        "missing - run 'firebase init' in the backend directory",
    ));
    checks.push(file_check(
        "firestore.rules",
        &paths::firestore_rules_path(root, backend),
        CheckStatus::Warn,
        "missing - Firestore will use default rules",
    ));
    checks.push(file_check(
        "functions package.json",
        &paths::functions_package_json(root, backend),
        CheckStatus::Fail,
        "missing - is the functions workspace set up?",
    ));

    let node_modules = paths::functions_dir(root, backend).join(paths::NODE_MODULES);
    checks.push(if node_modules.is_dir() {
        Check::pass("functions dependencies", "node_modules present")
    } else {
        Check::warn(
            "functions dependencies",
            "node_modules missing - run 'devstack setup' or 'npm install'",
        )
    });

    checks
}

fn dir_check(name: &str, path: &Path) -> Check {
    if path.is_dir() {
        Check::pass(name, path.display().to_string())
    } else {
        Check::fail(name, format!("{} not found", path.display()))
    }
}

fn file_check(name: &str, path: &Path, missing_status: CheckStatus, missing_detail: &str) -> Check {
    if path.is_file() {
        Check::pass(name, path.display().to_string())
    } else {
        Check {
            name: name.to_string(),
            status: missing_status,
            detail: missing_detail.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Toolchain
// ---------------------------------------------------------------------------

fn toolchain_checks() -> Vec<Check> {
    toolchain::detect()
        .into_iter()
        .map(|tool| {
            if tool.found {
                let detail = tool.version.unwrap_or_else(|| "version unknown".to_string());
                Check::pass(tool.name, detail)
            } else {
                Check::fail(tool.name, format!("not on PATH - {}", tool.install_hint))
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Flutter web support
// ---------------------------------------------------------------------------

fn flutter_web_check() -> Check {
    if !toolchain::find("flutter") {
        return Check::warn("flutter web support", "skipped - flutter not on PATH");
    }

    let output = match Command::new("flutter").arg("config").output() {
        Ok(o) => o,
        Err(e) => return Check::warn("flutter web support", format!("flutter config failed: {e}")),
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    if stdout.contains("enable-web: true") {
        Check::pass("flutter web support", "enable-web: true")
    } else {
        Check::fail(
            "flutter web support",
            "web support disabled - run 'flutter config --enable-web'",
        )
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_checks(root: &Path, config: &StackConfig) -> Vec<Check> {
    let mut checks = Vec::new();

    let config_file = paths::config_path(root);
    checks.push(if config_file.is_file() {
        Check::pass("devstack.yaml", config_file.display().to_string())
    } else {
        Check::warn(
            "devstack.yaml",
            "not found - using defaults (run 'devstack init')",
        )
    });

    for warning in config.validate() {
        let status = match warning.level {
            WarnLevel::Error => CheckStatus::Fail,
            WarnLevel::Warning => CheckStatus::Warn,
        };
        checks.push(Check {
            name: "config".to_string(),
            status,
            detail: warning.message,
        });
    }

    checks
}

// ---------------------------------------------------------------------------
// Emulator health
// ---------------------------------------------------------------------------

fn health_checks(config: &StackConfig) -> Vec<Check> {
    config
        .endpoints
        .iter()
        .map(|endpoint| {
            let name = format!("{} ({})", endpoint.name, endpoint.url);
            match ureq::get(&endpoint.url)
                .timeout(Duration::from_secs(5))
                .call()
            {
                // Any HTTP response proves something is listening.
                Ok(_) | Err(ureq::Error::Status(_, _)) => Check::pass(name, "responding"),
                Err(e) => Check::fail(name, format!("unreachable: {e}")),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scaffold_project(dir: &TempDir) {
        let root = dir.path();
        std::fs::create_dir_all(root.join("frontend")).unwrap();
        std::fs::write(root.join("frontend/pubspec.yaml"), "name: app\n").unwrap();
        std::fs::create_dir_all(root.join("backend/functions")).unwrap();
        std::fs::write(root.join("backend/firebase.json"), "{}\n").unwrap();
        std::fs::write(root.join("backend/firestore.rules"), "\n").unwrap();
        std::fs::write(root.join("backend/functions/package.json"), "{}\n").unwrap();
    }

    #[test]
    fn empty_tree_fails_structure_checks() {
        let dir = TempDir::new().unwrap();
        let config = StackConfig::default();
        let report = run_checks(dir.path(), &config, false);

        assert!(!report.is_healthy());
        let frontend = report
            .checks
            .iter()
            .find(|c| c.name == "frontend directory")
            .unwrap();
        assert_eq!(frontend.status, CheckStatus::Fail);
    }

    #[test]
    fn scaffolded_tree_passes_structure_checks() {
        let dir = TempDir::new().unwrap();
        scaffold_project(&dir);
        let config = StackConfig::default();
        let report = run_checks(dir.path(), &config, false);

        for name in [
            "frontend directory",
            "frontend pubspec.yaml",
            "backend directory",
            "firebase.json",
            "firestore.rules",
            "functions package.json",
        ] {
            let check = report.checks.iter().find(|c| c.name == name).unwrap();
            assert_eq!(check.status, CheckStatus::Pass, "{name}");
        }
    }

    #[test]
    fn missing_node_modules_is_a_warning_not_a_failure() {
        let dir = TempDir::new().unwrap();
        scaffold_project(&dir);
        let config = StackConfig::default();
        let report = run_checks(dir.path(), &config, false);

        let deps = report
            .checks
            .iter()
            .find(|c| c.name == "functions dependencies")
            .unwrap();
        assert_eq!(deps.status, CheckStatus::Warn);
    }

    #[test]
    fn config_errors_become_failed_checks() {
        let dir = TempDir::new().unwrap();
        scaffold_project(&dir);
        let mut config = StackConfig::default();
        config.services.clear();

        let report = run_checks(dir.path(), &config, false);
        let config_fail = report
            .checks
            .iter()
            .find(|c| c.name == "config" && c.status == CheckStatus::Fail);
        assert!(config_fail.is_some());
    }

    #[test]
    fn report_counts_add_up() {
        let dir = TempDir::new().unwrap();
        let config = StackConfig::default();
        let report = run_checks(dir.path(), &config, false);
        assert_eq!(
            report.passed() + report.warnings() + report.failures(),
            report.checks.len()
        );
    }

    #[test]
    fn health_probe_flags_unreachable_endpoint() {
        let mut config = StackConfig::default();
        // Reserved TEST-NET address: nothing listens there.
        config.endpoints = vec![crate::config::Endpoint {
            name: "nowhere".into(),
            url: "http://127.0.0.1:1".into(),
        }];
        let checks = health_checks(&config);
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].status, CheckStatus::Fail);
    }
}
