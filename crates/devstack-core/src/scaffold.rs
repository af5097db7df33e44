//! Project-tree scaffolding used by `devstack setup`.
//!
//! Files are only ever created when absent - setup must be safe to re-run
//! on a working tree.

use crate::config::StackConfig;
use crate::error::Result;
use crate::paths;
use std::path::Path;

const BACKEND_ENV: &str = "\
# Firebase Project Configuration
FIREBASE_PROJECT_ID=your-project-name
FIREBASE_REGION=us-central1
FIREBASE_STORAGE_BUCKET=your-project.appspot.com

# Development Settings
NODE_ENV=development
FUNCTIONS_EMULATOR_HOST=localhost
FUNCTIONS_EMULATOR_PORT=5001
FIRESTORE_EMULATOR_HOST=localhost:8080
";

const GITIGNORE: &str = "\
# Dependencies
node_modules/
.pub-cache/

# Build outputs
frontend/build/
backend/functions/lib/

# Environment files
.env
.env.local

# Firebase
.firebase/
firebase-debug.log
firestore-debug.log
ui-debug.log

# IDEs
.vscode/
.idea/
*.swp

# OS
.DS_Store
Thumbs.db

# Logs
logs/
*.log
npm-debug.log*
";

/// Create `backend/.env` if absent. Returns true when the file was written.
pub fn ensure_backend_env(root: &Path, config: &StackConfig) -> Result<bool> {
    let path = paths::backend_env_path(root, &config.backend_dir);
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, BACKEND_ENV)?;
    Ok(true)
}

/// Create the root `.gitignore` if absent. Returns true when written.
pub fn ensure_gitignore(root: &Path) -> Result<bool> {
    let path = root.join(paths::GITIGNORE_FILE);
    if path.exists() {
        return Ok(false);
    }
    std::fs::write(&path, GITIGNORE)?;
    Ok(true)
}
