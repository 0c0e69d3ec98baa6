//! Specification sinks for the command line: stdout or a file.
//!
//! `submit_specification` has no return value, so each sink keeps its write
//! outcome until `finish`.

use std::io::{self, Write};
use std::path::PathBuf;

use eaforge_core::SpecificationSink;

/// Writes the specification, newline-terminated, to any writer.
pub struct WriterSink<W: Write> {
    out: W,
    result: io::Result<()>,
}

/// Prints the specification to stdout.
pub type StdoutSink = WriterSink<io::Stdout>;

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> WriterSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, result: Ok(()) }
    }

    pub fn finish(self) -> io::Result<W> {
        self.result.map(|()| self.out)
    }
}

impl<W: Write> SpecificationSink for WriterSink<W> {
    fn submit_specification(&mut self, text: &str) {
        self.result = writeln!(self.out, "{text}").and_then(|()| self.out.flush());
    }
}

/// Writes the specification to a file.
pub struct FileSink {
    path: PathBuf,
    result: io::Result<()>,
}

impl FileSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path, result: Ok(()) }
    }

    pub fn finish(self) -> io::Result<PathBuf> {
        self.result.map(|()| self.path)
    }
}

impl SpecificationSink for FileSink {
    fn submit_specification(&mut self, text: &str) {
        self.result = std::fs::write(&self.path, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writer whose every write fails, like a closed pipe.
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_sink_appends_newline() {
        let mut sink = WriterSink::new(Vec::new());
        sink.submit_specification("Indicators:\n- None");
        let out = sink.finish().unwrap();
        assert_eq!(out, b"Indicators:\n- None\n");
    }

    #[test]
    fn writer_sink_reports_failed_write() {
        let mut sink = WriterSink::new(BrokenPipe);
        sink.submit_specification("spec");
        let err = sink.finish().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn file_sink_writes_and_returns_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ea.txt");
        let mut sink = FileSink::new(path.clone());
        sink.submit_specification("spec text");
        assert_eq!(sink.finish().unwrap(), path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "spec text");
    }

    #[test]
    fn file_sink_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::new(dir.path().join("missing").join("ea.txt"));
        sink.submit_specification("spec text");
        assert!(sink.finish().is_err());
    }
}
