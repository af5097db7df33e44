use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn devstack(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("devstack").unwrap();
    cmd.current_dir(dir.path())
        .env("DEVSTACK_ROOT", dir.path())
        .env("NO_COLOR", "1");
    cmd
}

fn init_project(dir: &TempDir) {
    devstack(dir).arg("init").assert().success();
}

// ---------------------------------------------------------------------------
// devstack init
// ---------------------------------------------------------------------------

#[test]
fn init_writes_config() {
    let dir = TempDir::new().unwrap();
    devstack(&dir).arg("init").assert().success();

    let config = std::fs::read_to_string(dir.path().join("devstack.yaml")).unwrap();
    assert!(config.contains("flutter run -d web-server"));
    assert!(config.contains("firebase emulators:start"));
}

#[test]
fn init_refuses_overwrite_without_force() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    devstack(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    devstack(&dir).args(["init", "--force"]).assert().success();
}

// ---------------------------------------------------------------------------
// devstack doctor
// ---------------------------------------------------------------------------

#[test]
fn doctor_fails_on_empty_tree() {
    let dir = TempDir::new().unwrap();

    devstack(&dir)
        .arg("doctor")
        .assert()
        .failure()
        .stdout(predicate::str::contains("frontend directory"));
}

#[test]
fn doctor_json_emits_structured_report() {
    let dir = TempDir::new().unwrap();

    let output = devstack(&dir).args(["doctor", "--json"]).output().unwrap();
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    let checks = report["checks"].as_array().unwrap();
    assert!(!checks.is_empty());

    let frontend = checks
        .iter()
        .find(|c| c["name"] == "frontend directory")
        .unwrap();
    assert_eq!(frontend["status"], "fail");
}

#[test]
fn doctor_passes_structure_checks_on_scaffolded_tree() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let root = dir.path();
    std::fs::create_dir_all(root.join("frontend")).unwrap();
    std::fs::write(root.join("frontend/pubspec.yaml"), "name: app\n").unwrap();
    std::fs::create_dir_all(root.join("backend/functions")).unwrap();
    std::fs::write(root.join("backend/firebase.json"), "{}\n").unwrap();
    std::fs::write(root.join("backend/firestore.rules"), "\n").unwrap();
    std::fs::write(root.join("backend/functions/package.json"), "{}\n").unwrap();

    let output = devstack(&dir).args(["doctor", "--json"]).output().unwrap();
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let checks = report["checks"].as_array().unwrap();

    for name in ["frontend directory", "firebase.json", "functions package.json"] {
        let check = checks.iter().find(|c| c["name"] == name).unwrap();
        assert_eq!(check["status"], "pass", "{name}");
    }
}

// ---------------------------------------------------------------------------
// devstack dev
// ---------------------------------------------------------------------------

#[test]
fn dev_without_config_fails_with_hint() {
    let dir = TempDir::new().unwrap();

    devstack(&dir)
        .arg("dev")
        .assert()
        .failure()
        .stderr(predicate::str::contains("devstack init"));
}

#[test]
fn dev_with_empty_service_list_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("devstack.yaml"),
        "project: t\nservices: []\n",
    )
    .unwrap();

    devstack(&dir)
        .arg("dev")
        .assert()
        .failure()
        .stderr(predicate::str::contains("errors"));
}

#[test]
fn dev_streams_prefixed_output_and_fails_fast_on_exit() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("devstack.yaml"),
        "project: t\nservices:\n  - name: web\n    command: 'printf \"hello from web\\n\"'\nstartup_grace_seconds: 1\npoll_interval_seconds: 1\nshutdown_grace_seconds: 1\n",
    )
    .unwrap();

    devstack(&dir)
        .arg("dev")
        .assert()
        .failure()
        .stdout(predicate::str::contains("[web] hello from web"))
        .stderr(predicate::str::contains("exited during startup"));
}

#[test]
fn dev_rolls_back_when_a_service_cannot_launch() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("devstack.yaml"),
        "project: t\nservices:\n  - name: ok\n    command: sleep 30\n  - name: ghost\n    command: definitely-not-a-real-binary-xyz\nstartup_grace_seconds: 1\npoll_interval_seconds: 1\nshutdown_grace_seconds: 1\n",
    )
    .unwrap();

    // The run must fail fast (not sit for 30s behind `sleep`) and name the
    // service that could not start.
    devstack(&dir)
        .arg("dev")
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

// ---------------------------------------------------------------------------
// devstack test / deploy
// ---------------------------------------------------------------------------

#[test]
fn test_requires_frontend_directory() {
    let dir = TempDir::new().unwrap();

    devstack(&dir)
        .arg("test")
        .assert()
        .failure()
        .stderr(predicate::str::contains("frontend"));
}

#[test]
fn deploy_requires_firebase_config() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    devstack(&dir)
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("firebase init"));
}
