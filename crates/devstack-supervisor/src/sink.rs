use std::io::Write;
use std::sync::{Arc, Mutex};

// ─── OutputSink ───────────────────────────────────────────────────────────

/// Shared, line-atomic destination for multiplexed service output.
///
/// Every forwarding task holds a clone; the mutex guarantees whole lines
/// are written without interleaving. The memory variant backs assertions
/// in tests.
#[derive(Clone)]
pub struct OutputSink {
    inner: Arc<Mutex<Sink>>,
}

enum Sink {
    Stdout,
    Memory(Vec<String>),
}

impl OutputSink {
    pub fn stdout() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Sink::Stdout)),
        }
    }

    pub fn memory() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Sink::Memory(Vec::new()))),
        }
    }

    /// Emit one already-trimmed line from `service`.
    pub fn line(&self, service: &str, line: &str) {
        let formatted = format!("[{service}] {line}");
        if let Ok(mut sink) = self.inner.lock() {
            match &mut *sink {
                Sink::Stdout => {
                    let mut out = std::io::stdout().lock();
                    let _ = writeln!(out, "{formatted}");
                }
                Sink::Memory(lines) => lines.push(formatted),
            }
        }
    }

    /// Lines captured so far (memory sinks only; empty for stdout).
    pub fn captured(&self) -> Vec<String> {
        match self.inner.lock() {
            Ok(sink) => match &*sink {
                Sink::Memory(lines) => lines.clone(),
                Sink::Stdout => Vec::new(),
            },
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_records_prefixed_lines() {
        let sink = OutputSink::memory();
        sink.line("web", "compiling");
        sink.line("api", "listening on 8080");
        assert_eq!(
            sink.captured(),
            vec!["[web] compiling", "[api] listening on 8080"]
        );
    }

    #[test]
    fn clones_share_the_buffer() {
        let sink = OutputSink::memory();
        let clone = sink.clone();
        clone.line("web", "hello");
        assert_eq!(sink.captured(), vec!["[web] hello"]);
    }

    #[test]
    fn stdout_sink_captures_nothing() {
        let sink = OutputSink::stdout();
        assert!(sink.captured().is_empty());
    }
}
