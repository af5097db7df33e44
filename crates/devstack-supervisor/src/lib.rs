//! `devstack-supervisor` - parallel service supervisor for the dev loop.
//!
//! Starts the project's long-lived dev processes (Flutter dev server,
//! Firebase emulators, anything else in `devstack.yaml`), multiplexes
//! their output onto one console, watches for failures, and guarantees
//! everything is dead on the way out.
//!
//! # Architecture
//!
//! ```text
//! ServiceSpec (name, command, cwd)
//!     │ launch()
//!     ▼
//! ServiceHandle   ← spawns `sh -c …`, stdout+stderr piped
//!     │              one forwarding task per service merges both streams
//!     ▼
//! OutputSink      ← line-atomic `[{name}] {line}` console writer
//!
//! Supervisor      ← owns every handle; wait_for_ready / monitor / shutdown
//! ```
//!
//! # Lifecycle
//!
//! ```rust,ignore
//! let mut sup = Supervisor::new(root, SupervisorConfig::default(), OutputSink::stdout());
//! let (tx, mut cancel) = tokio::sync::mpsc::channel(1);
//! spawn_signal_listener(tx);
//!
//! sup.launch(ServiceSpec::new("flutter", "flutter run -d web-server").in_dir("frontend"))?;
//! sup.launch(ServiceSpec::new("firebase", "firebase emulators:start").in_dir("backend"))?;
//!
//! let ready = sup.wait_for_ready(Duration::from_secs(10)).await;
//! match sup.monitor(&mut cancel).await {
//!     MonitorOutcome::Interrupted => { /* Ctrl-C: clean exit */ }
//!     MonitorOutcome::ServiceExited { name, .. } => { /* fail fast */ }
//! }
//! sup.shutdown().await;
//! ```

pub mod error;
pub mod sink;
pub mod supervisor;
pub mod types;

pub(crate) mod service;


pub use error::SupervisorError;
pub use sink::OutputSink;
pub use supervisor::{process_alive, spawn_signal_listener, Supervisor};
pub use types::{MonitorOutcome, ReadinessReport, ServiceExit, ServiceSpec, SupervisorConfig};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, SupervisorError>;
