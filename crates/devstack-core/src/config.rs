use crate::error::{DevstackError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ServiceEntry
// ---------------------------------------------------------------------------

/// One long-lived process managed by `devstack dev`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub name: String,
    pub command: String,
    /// Working directory relative to the project root; root itself when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
}

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// A local URL printed after startup and probed by `doctor --health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    pub url: String,
}

// ---------------------------------------------------------------------------
// StackConfig (top-level, devstack.yaml)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackConfig {
    pub project: String,
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
    #[serde(default = "default_backend_dir")]
    pub backend_dir: String,
    #[serde(default = "default_services")]
    pub services: Vec<ServiceEntry>,
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<Endpoint>,
    /// Fixed delay before the readiness probe inspects the services.
    #[serde(default = "default_startup_grace")]
    pub startup_grace_seconds: u64,
    /// Liveness poll cadence while the stack is running.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// How long a service gets to exit after a graceful terminate.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

fn default_frontend_dir() -> String {
    "frontend".to_string()
}

fn default_backend_dir() -> String {
    "backend".to_string()
}

fn default_services() -> Vec<ServiceEntry> {
    vec![
        ServiceEntry {
            name: "flutter".to_string(),
            command: "flutter run -d web-server --web-port 3000".to_string(),
            cwd: Some(default_frontend_dir()),
        },
        ServiceEntry {
            name: "firebase".to_string(),
            command: "firebase emulators:start --only auth,firestore,functions".to_string(),
            cwd: Some(default_backend_dir()),
        },
    ]
}

fn default_endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint {
            name: "Flutter Web".to_string(),
            url: "http://localhost:3000".to_string(),
        },
        Endpoint {
            name: "Emulator UI".to_string(),
            url: "http://localhost:4000".to_string(),
        },
        Endpoint {
            name: "Firestore".to_string(),
            url: "http://localhost:8080".to_string(),
        },
        Endpoint {
            name: "Functions".to_string(),
            url: "http://localhost:5001".to_string(),
        },
    ]
}

fn default_startup_grace() -> u64 {
    10
}

fn default_poll_interval() -> u64 {
    5
}

fn default_shutdown_grace() -> u64 {
    5
}

impl Default for StackConfig {
    fn default() -> Self {
        Self::new("app")
    }
}

impl StackConfig {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            frontend_dir: default_frontend_dir(),
            backend_dir: default_backend_dir(),
            services: default_services(),
            endpoints: default_endpoints(),
            startup_grace_seconds: default_startup_grace(),
            poll_interval_seconds: default_poll_interval(),
            shutdown_grace_seconds: default_shutdown_grace(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(DevstackError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: StackConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Like [`load`](Self::load), but commands that predate `devstack init`
    /// (setup, doctor) fall back to the defaults instead of failing.
    pub fn load_or_default(root: &Path) -> Self {
        Self::load(root).unwrap_or_default()
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        std::fs::write(&path, data)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.services.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "no services defined - 'devstack dev' has nothing to run".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for service in &self.services {
            if service.name.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: "service with an empty name".to_string(),
                });
            }
            if !seen.insert(service.name.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("duplicate service name '{}'", service.name),
                });
            }
            if service.command.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("service '{}' has an empty command", service.name),
                });
            }
            if let Some(cwd) = &service.cwd {
                if Path::new(cwd).is_absolute() {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Warning,
                        message: format!(
                            "service '{}' uses an absolute cwd '{}' - paths are normally \
                             relative to the project root",
                            service.name, cwd
                        ),
                    });
                }
            }
        }

        if self.poll_interval_seconds == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "poll_interval_seconds is 0 - the monitor will busy-poll".to_string(),
            });
        }

        warnings
    }

    pub fn has_errors(warnings: &[ConfigWarning]) -> bool {
        warnings.iter().any(|w| w.level == WarnLevel::Error)
    }
}
