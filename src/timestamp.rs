use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;


/// Current time in microseconds since the UNIX epoch.
pub fn now() -> u64 {
    to_micros(SystemTime::now())
}

/// Converts a `SystemTime` into Zipkin microseconds.
///
/// Times before the UNIX epoch are clamped to zero.
pub fn to_micros(time: SystemTime) -> u64 {
    let since_epoch = time.duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0));
    since_epoch.as_micros() as u64
}
