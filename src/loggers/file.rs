use std::io;
use std::io::Write;

use log::debug;

use super::super::Logger;
use super::super::Result;
use super::super::SpanRecord;


/// A `Logger` writing each trace as one line of Zipkin v1 JSON.
///
/// Every line is a complete JSON array of spans, ready to be posted to a
/// Zipkin `/api/v1/spans` collector by an external shipper.
///
/// # Examples
///
/// ```
/// extern crate zipkin_b3;
///
/// use zipkin_b3::Endpoint;
/// use zipkin_b3::Tracer;
/// use zipkin_b3::TracerOptions;
/// use zipkin_b3::loggers::FileLogger;
///
///
/// fn main() {
///     let logger = FileLogger::stderr();
///     let mut tracer = Tracer::new(
///         "checkout", Endpoint::new("checkout"), logger, TracerOptions::default()
///     ).unwrap();
///     tracer.trace().unwrap();
/// }
/// ```
#[derive(Debug)]
pub struct FileLogger<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> FileLogger<W> {
    pub fn new(writer: W) -> FileLogger<W> {
        FileLogger { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl FileLogger<io::Stderr> {
    /// Creates a logger writing to standard error.
    pub fn stderr() -> FileLogger<io::Stderr> {
        FileLogger::new(io::stderr())
    }
}

impl<W: Write + Send> FileLogger<W> {
    /// Writes a batch of spans followed by a new line.
    pub fn write_trace(&mut self, spans: &[SpanRecord]) -> Result<()> {
        let mut buffer = serde_json::to_vec(spans)?;
        buffer.push(b'\n');
        self.writer.write_all(&buffer)?;
        self.writer.flush()?;
        debug!("Wrote {} spans ({} bytes)", spans.len(), buffer.len());
        Ok(())
    }
}

impl<W: Write + Send> Logger for FileLogger<W> {
    fn trace(&mut self, spans: &[SpanRecord]) -> Result<()> {
        self.write_trace(spans)
    }
}
