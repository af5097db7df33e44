//! Detection of the external CLIs the workflows shell out to.
//!
//! devstack never installs tools itself - a missing tool is reported with
//! the command or URL to install it, and the user re-runs once it is on
//! the PATH.

use serde::Serialize;
use std::process::Command;

/// One external tool a workflow depends on.
#[derive(Debug, Clone, Copy)]
pub struct Tool {
    pub name: &'static str,
    pub binary: &'static str,
    pub install_hint: &'static str,
}

/// Everything `setup` and `doctor` look for, in report order.
pub const TOOLS: &[Tool] = &[
    Tool {
        name: "Flutter",
        binary: "flutter",
        install_hint: "install from https://flutter.dev/docs/get-started/install",
    },
    Tool {
        name: "Dart",
        binary: "dart",
        install_hint: "ships with the Flutter SDK",
    },
    Tool {
        name: "Node.js",
        binary: "node",
        install_hint: "install from https://nodejs.org or your package manager",
    },
    Tool {
        name: "npm",
        binary: "npm",
        install_hint: "ships with Node.js",
    },
    Tool {
        name: "Firebase CLI",
        binary: "firebase",
        install_hint: "npm install -g firebase-tools",
    },
    Tool {
        name: "Git",
        binary: "git",
        install_hint: "install from https://git-scm.com or your package manager",
    },
];

/// Detection result for a single tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolStatus {
    pub name: String,
    pub binary: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub install_hint: String,
}

/// Is `binary` on the PATH?
pub fn find(binary: &str) -> bool {
    which::which(binary).is_ok()
}

/// First line of `<binary> --version`, if the tool is present and the
/// invocation succeeds.
pub fn version(binary: &str) -> Option<String> {
    let output = Command::new(binary).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .next()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
}

/// Probe every known tool.
pub fn detect() -> Vec<ToolStatus> {
    TOOLS.iter().map(|tool| status_of(tool)).collect()
}

fn status_of(tool: &Tool) -> ToolStatus {
    let found = find(tool.binary);
    ToolStatus {
        name: tool.name.to_string(),
        binary: tool.binary.to_string(),
        found,
        version: if found { version(tool.binary) } else { None },
        install_hint: tool.install_hint.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_covers_every_tool() {
        let statuses = detect();
        assert_eq!(statuses.len(), TOOLS.len());
        assert_eq!(statuses[0].binary, "flutter");
    }

    #[test]
    fn missing_binary_reports_not_found() {
        assert!(!find("definitely-not-a-real-binary-xyz"));
        assert!(version("definitely-not-a-real-binary-xyz").is_none());
    }

    #[test]
    fn version_of_present_tool_is_nonempty() {
        // `sh` exists on any platform these workflows target; git is a
        // reasonable stand-in for a tool with --version.
        if find("git") {
            let v = version("git").expect("git --version");
            assert!(v.contains("git"));
        }
    }
}
