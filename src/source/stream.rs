//! Stream-based sample source.
//!
//! Receives raw samples from an async byte stream carrying one JSON record
//! per line. This backs both the spawned sampler process (its stdout) and
//! network connections.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{RawSample, SampleSource};
use crate::error::MonitorError;

/// A sample source that reads newline-delimited JSON from an async reader.
///
/// A background task decodes each line into a [`RawSample`] and pushes it
/// onto a bounded channel; `poll()` drains that channel without blocking.
/// Undecodable lines are skipped and surfaced via [`SampleSource::error`],
/// never fatal. EOF or a read error closes the channel, after which `poll()`
/// reports the source as unavailable.
///
/// # Example with a byte stream
///
/// ```
/// use std::io::Cursor;
/// use powerwatch::source::StreamSource;
///
/// # tokio_test::block_on(async {
/// // In practice, use a TcpStream or a sampler process's stdout
/// let stream = Cursor::new(b"{}\n".to_vec());
/// let source = StreamSource::from_reader(stream, "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<RawSample>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
}

impl StreamSource {
    /// Spawn a background task that reads from the given async reader.
    pub fn from_reader<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(16);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        debug!("sample stream reached EOF");
                        break;
                    }
                    Ok(_) => match serde_json::from_str::<RawSample>(line.trim()) {
                        Ok(sample) => {
                            *error_handle.lock().unwrap() = None;
                            if tx.send(sample).await.is_err() {
                                // Receiver dropped
                                break;
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "skipping undecodable sample line");
                            *error_handle.lock().unwrap() = Some(format!("Decode error: {}", e));
                        }
                    },
                    Err(e) => {
                        *error_handle.lock().unwrap() = Some(format!("Read error: {}", e));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("stream: {}", description),
            last_error,
        }
    }

    /// Create a StreamSource from a raw bytes channel.
    ///
    /// Useful when another component wants to push encoded samples without
    /// going through an `AsyncRead`.
    pub fn from_bytes_channel(mut rx: mpsc::Receiver<Vec<u8>>, description: &str) -> Self {
        let (tx, sample_rx) = mpsc::channel(16);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        tokio::spawn(async move {
            while let Some(bytes) = rx.recv().await {
                match serde_json::from_slice::<RawSample>(&bytes) {
                    Ok(sample) => {
                        *error_handle.lock().unwrap() = None;
                        if tx.send(sample).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "skipping undecodable sample payload");
                        *error_handle.lock().unwrap() = Some(format!("Decode error: {}", e));
                    }
                }
            }
        });

        Self {
            receiver: sample_rx,
            description: format!("stream: {}", description),
            last_error,
        }
    }
}

impl SampleSource for StreamSource {
    fn poll(&mut self) -> Result<Option<RawSample>, MonitorError> {
        match self.receiver.try_recv() {
            Ok(sample) => Ok(Some(sample)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(
                MonitorError::SourceUnavailable(self.description.clone()),
            ),
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_json() -> &'static str {
        r#"{"timestamp":1,"thermal_pressure":"Nominal","processor":{"clusters":[{"name":"E-Cluster","freq_hz":2e9,"idle_ratio":0.5,"cpus":[]},{"name":"P-Cluster","freq_hz":3e9,"idle_ratio":0.5,"cpus":[]}],"ane_energy":0.0,"cpu_energy":1000.0,"gpu_energy":0.0},"gpu":{"freq_hz":1296.0,"idle_ratio":0.5}}"#
    }

    #[tokio::test]
    async fn test_stream_source_decodes_lines() {
        let data = format!("{}\n", sample_json());
        let mut source = StreamSource::from_reader(Cursor::new(data), "test");

        // Give the background task time to process
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        let sample = source.poll().unwrap();
        assert!(sample.is_some());
        assert_eq!(sample.unwrap().timestamp, 1);
    }

    #[tokio::test]
    async fn test_stream_source_multiple_samples() {
        let data = format!("{}\n{}\n", sample_json(), sample_json());
        let mut source = StreamSource::from_reader(Cursor::new(data), "test");

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert!(source.poll().unwrap().is_some());
        assert!(source.poll().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_stream_source_eof_becomes_unavailable() {
        let mut source = StreamSource::from_reader(Cursor::new(""), "test");

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        // The reader task exited at EOF and dropped the sender.
        let err = source.poll().unwrap_err();
        assert!(matches!(err, MonitorError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_stream_source_invalid_line_is_skipped() {
        let data = format!("not valid json\n{}\n", sample_json());
        let mut source = StreamSource::from_reader(Cursor::new(data), "test");

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        // The bad line is skipped; the good one still comes through.
        let sample = source.poll().unwrap();
        assert!(sample.is_some());
    }

    #[tokio::test]
    async fn test_stream_source_from_bytes_channel() {
        let (tx, rx) = mpsc::channel::<Vec<u8>>(16);
        let mut source = StreamSource::from_bytes_channel(rx, "pushed");

        tx.send(sample_json().as_bytes().to_vec()).await.unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert!(source.poll().unwrap().is_some());
        assert_eq!(source.description(), "stream: pushed");
    }
}
