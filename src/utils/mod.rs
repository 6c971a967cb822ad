mod fail;
mod reporter;

pub use self::fail::FailSpan;
pub use self::reporter::ReporterThread;
