//! File-based sample source.
//!
//! Polls a JSON file holding one raw sample. Intended for development and
//! replay: point it at a file an external process rewrites, and each
//! modification shows up as a fresh sample.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{RawSample, SampleSource};
use crate::error::MonitorError;

/// A sample source that re-reads a JSON file whenever it changes.
///
/// The source tracks the file's modification time and only returns a sample
/// when the file has been updated since the last read. De-duplication by
/// timestamp still applies downstream, so rewriting the same reading is
/// harmless.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<RawSample> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(sample) => {
                    self.last_error = None;
                    Some(sample)
                }
                Err(e) => {
                    self.last_error = Some(format!("Decode error: {}", e));
                    None
                }
            },
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                None
            }
        }
    }
}

impl SampleSource for FileSource {
    fn poll(&mut self) -> Result<Option<RawSample>, MonitorError> {
        let current_modified = self.modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, don't update
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            if let Some(sample) = self.read_file() {
                self.last_modified = current_modified;
                return Ok(Some(sample));
            }
        }

        Ok(None)
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "timestamp": 42,
            "thermal_pressure": "Nominal",
            "processor": {
                "clusters": [
                    { "name": "E-Cluster", "freq_hz": 2e9, "idle_ratio": 0.4, "cpus": [] },
                    { "name": "P-Cluster", "freq_hz": 3e9, "idle_ratio": 0.2, "cpus": [] }
                ],
                "ane_energy": 0.0,
                "cpu_energy": 1000.0,
                "gpu_energy": 500.0
            },
            "gpu": { "freq_hz": 1296.0, "idle_ratio": 0.9 }
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/sample.json");
        assert_eq!(source.path(), Path::new("/tmp/sample.json"));
        assert_eq!(source.description(), "file: /tmp/sample.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_reads_once_per_change() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        // First poll returns the sample
        let sample = source.poll().unwrap();
        assert_eq!(sample.unwrap().timestamp, 42);

        // No change since: nothing new
        assert!(source.poll().unwrap().is_none());
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/sample.json");

        assert!(source.poll().unwrap().is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().unwrap().is_none());
        assert!(source.error().unwrap().contains("Decode error"));
    }
}
