use monitor_core::{MessageSink, MonitorError};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Prints the message to standard output.
pub struct StdoutSink;

impl MessageSink for StdoutSink {
    fn send(&self, destination: &str, text: &str) -> Result<(), MonitorError> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        if !destination.is_empty() {
            writeln!(out, "to: {}", destination)?;
        }
        writeln!(out, "{}", text)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "stdout"
    }
}

/// Appends each message to a file, separated by a blank line.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MessageSink for FileSink {
    fn send(&self, _destination: &str, text: &str) -> Result<(), MonitorError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}\n", text)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Hand `text` to every sink in turn, pausing `delay` between calls. Failures are logged and
/// the remaining sinks still run. Returns how many sinks accepted the message.
pub fn dispatch(sinks: &[Box<dyn MessageSink>], destination: &str, text: &str, delay: Duration) -> usize {
    let mut delivered = 0;
    for (i, sink) in sinks.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            std::thread::sleep(delay);
        }
        match sink.send(destination, text) {
            Ok(()) => {
                tracing::info!("Sent alert via {}", sink.name());
                delivered += 1;
            }
            Err(e) => tracing::warn!("Failed to send alert via {}: {}", sink.name(), e),
        }
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl MessageSink for Failing {
        fn send(&self, _destination: &str, _text: &str) -> Result<(), MonitorError> {
            Err(MonitorError::InvalidConfig("no chat id".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_dispatch_continues_after_failure() {
        let path = std::env::temp_dir().join(format!("alert-sink-{}.txt", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let sinks: Vec<Box<dyn MessageSink>> = vec![Box::new(Failing), Box::new(FileSink::new(&path))];
        let delivered = dispatch(&sinks, "", "hello", Duration::ZERO);
        assert_eq!(delivered, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n\n");

        std::fs::remove_file(&path).unwrap();
    }
}
