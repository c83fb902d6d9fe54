//! Sampler process source.
//!
//! Spawns the external system sampler and consumes the newline-delimited
//! JSON readings it writes to stdout. Owns the child process handle for the
//! life of the monitor and kills it on stop.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};
use tracing::info;

use super::{RawSample, SampleSource, StreamSource};
use crate::error::MonitorError;

/// Default sampler command. Expected to accept `--interval <secs>` and emit
/// one JSON sample per line on stdout.
pub const DEFAULT_SAMPLER_COMMAND: &str = "powerwatch-sampler";

/// A sample source backed by a spawned sampler process.
#[derive(Debug)]
pub struct SamplerSource {
    inner: StreamSource,
    child: Option<Child>,
    description: String,
}

impl SamplerSource {
    /// Spawn the sampler at the given interval and start reading its output.
    ///
    /// Must be called from within a tokio runtime; the reader task and the
    /// child's I/O are driven by it.
    pub fn start(command: &str, interval: Duration) -> Result<Self> {
        let mut child = Command::new(command)
            .arg("--interval")
            .arg(interval.as_secs().to_string())
            .stdout(Stdio::piped())
            // The TUI owns the terminal; sampler noise goes nowhere.
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn sampler `{}`", command))?;

        let stdout = child
            .stdout
            .take()
            .context("sampler stdout was not captured")?;

        info!(command, interval_secs = interval.as_secs(), "sampler started");

        let description = format!("sampler: {}", command);
        Ok(Self {
            inner: StreamSource::from_reader(stdout, &description),
            child: Some(child),
            description,
        })
    }
}

impl SampleSource for SamplerSource {
    fn poll(&mut self) -> Result<Option<RawSample>, MonitorError> {
        self.inner.poll()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.inner.error()
    }

    /// Kill the sampler process. A second call is a no-op.
    fn stop(&mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            // The sampler may have already exited on its own.
            if let Ok(None) = child.try_wait() {
                child
                    .start_kill()
                    .context("failed to terminate the sampler process")?;
            }
            info!("sampler stopped");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_failure_is_reported() {
        let result = SamplerSource::start("/nonexistent/powerwatch-sampler", Duration::from_secs(1));
        assert!(result.is_err());
        let msg = format!("{:#}", result.unwrap_err());
        assert!(msg.contains("failed to spawn sampler"));
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        // `cat` with no input just waits on stdin-less stdout; good enough to
        // exercise the lifecycle without a real sampler binary.
        let mut source = SamplerSource::start("cat", Duration::from_secs(1)).unwrap();
        assert!(source.stop().is_ok());
        assert!(source.stop().is_ok());
    }
}
