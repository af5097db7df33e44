use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// File and directory constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "devstack.yaml";

pub const PUBSPEC_FILE: &str = "pubspec.yaml";
pub const FIREBASE_CONFIG: &str = "firebase.json";
pub const FIRESTORE_RULES: &str = "firestore.rules";
pub const FUNCTIONS_DIR: &str = "functions";
pub const PACKAGE_JSON: &str = "package.json";
pub const NODE_MODULES: &str = "node_modules";
pub const ENV_FILE: &str = ".env";
pub const GITIGNORE_FILE: &str = ".gitignore";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn frontend_dir(root: &Path, frontend: &str) -> PathBuf {
    root.join(frontend)
}

pub fn backend_dir(root: &Path, backend: &str) -> PathBuf {
    root.join(backend)
}

pub fn pubspec_path(root: &Path, frontend: &str) -> PathBuf {
    root.join(frontend).join(PUBSPEC_FILE)
}

pub fn firebase_config_path(root: &Path, backend: &str) -> PathBuf {
    root.join(backend).join(FIREBASE_CONFIG)
}

pub fn firestore_rules_path(root: &Path, backend: &str) -> PathBuf {
    root.join(backend).join(FIRESTORE_RULES)
}

pub fn functions_dir(root: &Path, backend: &str) -> PathBuf {
    root.join(backend).join(FUNCTIONS_DIR)
}

pub fn functions_package_json(root: &Path, backend: &str) -> PathBuf {
    functions_dir(root, backend).join(PACKAGE_JSON)
}

pub fn backend_env_path(root: &Path, backend: &str) -> PathBuf {
    root.join(backend).join(ENV_FILE)
}
