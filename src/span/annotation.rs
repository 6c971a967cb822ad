use serde::Serialize;

use super::super::Endpoint;
use super::super::Error;
use super::super::Result;
use super::super::timestamp;


/// The role of the local service in a span.
///
/// Each kind maps onto the Zipkin v1 core annotation values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnnotationKind {
    /// Client side of an RPC: `cs` then `cr`.
    Client,

    /// Message consumer: a single `mr` annotation.
    Consumer,

    /// Message producer: a single `ms` annotation.
    Producer,

    /// Server side of an RPC: `sr` then `ss`.
    Server,
}

impl AnnotationKind {
    /// Annotation value recorded at the start timestamp.
    pub fn start_value(&self) -> &'static str {
        match *self {
            AnnotationKind::Client => "cs",
            AnnotationKind::Consumer => "mr",
            AnnotationKind::Producer => "ms",
            AnnotationKind::Server => "sr",
        }
    }

    /// Annotation value recorded at the end timestamp, if the kind has one.
    pub fn end_value(&self) -> Option<&'static str> {
        match *self {
            AnnotationKind::Client => Some("cr"),
            AnnotationKind::Server => Some("ss"),
            AnnotationKind::Consumer |
            AnnotationKind::Producer => None,
        }
    }
}


/// A single timed event as it appears in a span's `annotations` array.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnnotationRecord {
    pub timestamp: u64,
    pub value: String,
    pub endpoint: Endpoint,
}


/// Timing and core annotations for one unit of work.
///
/// The block is immutable: the end timestamp is fixed when the block is built
/// and is never before the start timestamp.
///
/// # Examples
///
/// ```
/// extern crate zipkin_b3;
///
/// use zipkin_b3::AnnotationBlock;
/// use zipkin_b3::AnnotationKind;
/// use zipkin_b3::Endpoint;
///
///
/// fn main() {
///     let endpoint = Endpoint::new("checkout");
///     let open = AnnotationBlock::begin(endpoint, AnnotationKind::Client);
///     // ... call the downstream service ...
///     let block = open.finish();
///     assert!(block.end_timestamp() >= block.start_timestamp());
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationBlock {
    endpoint: Endpoint,
    end: u64,
    kind: AnnotationKind,
    start: u64,
}

impl AnnotationBlock {
    /// Creates a block from explicit start and end timestamps in microseconds.
    pub fn new(
        endpoint: Endpoint, start: u64, end: u64, kind: AnnotationKind
    ) -> Result<AnnotationBlock> {
        if end < start {
            return Err(Error::InvalidArgument(format!(
                "annotation block ends ({}) before it starts ({})", end, start
            )));
        }
        Ok(AnnotationBlock {
            endpoint,
            end,
            kind,
            start,
        })
    }

    /// Creates a block from a start timestamp and a duration in microseconds.
    pub fn with_duration(
        endpoint: Endpoint, start: u64, duration: u64, kind: AnnotationKind
    ) -> Result<AnnotationBlock> {
        let end = start.checked_add(duration).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "duration {} overflows start timestamp {}", duration, start
            ))
        })?;
        AnnotationBlock::new(endpoint, start, end, kind)
    }

    /// Starts timing a unit of work now.
    pub fn begin(endpoint: Endpoint, kind: AnnotationKind) -> OpenAnnotationBlock {
        OpenAnnotationBlock::new(endpoint, timestamp::now(), kind)
    }
}

impl AnnotationBlock {
    /// Microseconds elapsed between start and end.
    pub fn duration(&self) -> u64 {
        self.end - self.start
    }

    pub fn end_timestamp(&self) -> u64 {
        self.end
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    pub fn start_timestamp(&self) -> u64 {
        self.start
    }

    /// Renders the Zipkin v1 `annotations` array.
    pub fn to_records(&self) -> Vec<AnnotationRecord> {
        let mut records = vec![AnnotationRecord {
            timestamp: self.start,
            value: self.kind.start_value().to_owned(),
            endpoint: self.endpoint.clone(),
        }];
        if let Some(value) = self.kind.end_value() {
            records.push(AnnotationRecord {
                timestamp: self.end,
                value: value.to_owned(),
                endpoint: self.endpoint.clone(),
            });
        }
        records
    }
}


/// An `AnnotationBlock` whose unit of work is still running.
///
/// Finishing the block fixes its end timestamp and returns the immutable
/// `AnnotationBlock`.
#[derive(Clone, Debug)]
pub struct OpenAnnotationBlock {
    endpoint: Endpoint,
    kind: AnnotationKind,
    start: u64,
}

impl OpenAnnotationBlock {
    /// Starts a block at an explicit timestamp.
    pub fn new(endpoint: Endpoint, start: u64, kind: AnnotationKind) -> OpenAnnotationBlock {
        OpenAnnotationBlock {
            endpoint,
            kind,
            start,
        }
    }
}

impl OpenAnnotationBlock {
    /// Finishes the block now.
    ///
    /// A clock that moved backwards yields a zero duration.
    pub fn finish(self) -> AnnotationBlock {
        let end = timestamp::now().max(self.start);
        AnnotationBlock {
            endpoint: self.endpoint,
            end,
            kind: self.kind,
            start: self.start,
        }
    }

    /// Finishes the block at an explicit timestamp.
    pub fn finish_at(self, end: u64) -> Result<AnnotationBlock> {
        AnnotationBlock::new(self.endpoint, self.start, end, self.kind)
    }

    pub fn start_timestamp(&self) -> u64 {
        self.start
    }
}


#[cfg(test)]
mod tests {
    use super::super::super::Endpoint;
    use super::super::super::Error;

    use super::AnnotationBlock;
    use super::AnnotationKind;
    use super::OpenAnnotationBlock;

    fn endpoint() -> Endpoint {
        Endpoint::new("checkout")
    }

    mod create {
        use super::AnnotationBlock;
        use super::AnnotationKind;
        use super::Error;
        use super::endpoint;

        #[test]
        fn computes_duration() {
            let block = AnnotationBlock::new(
                endpoint(), 100, 350, AnnotationKind::Server
            ).unwrap();
            assert_eq!(block.duration(), 250);
        }

        #[test]
        fn allows_zero_duration() {
            let block = AnnotationBlock::new(
                endpoint(), 100, 100, AnnotationKind::Server
            ).unwrap();
            assert_eq!(block.duration(), 0);
        }

        #[test]
        fn rejects_end_before_start() {
            let block = AnnotationBlock::new(
                endpoint(), 100, 99, AnnotationKind::Server
            );
            match block {
                Err(Error::InvalidArgument(_)) => {},
                other => panic!("Unexpected result: {:?}", other)
            }
        }

        #[test]
        fn from_duration() {
            let block = AnnotationBlock::with_duration(
                endpoint(), 100, 50, AnnotationKind::Client
            ).unwrap();
            assert_eq!(block.end_timestamp(), 150);
            assert_eq!(block.duration(), 50);
        }

        #[test]
        fn rejects_overflowing_duration() {
            let block = AnnotationBlock::with_duration(
                endpoint(), u64::max_value(), 1, AnnotationKind::Client
            );
            match block {
                Err(Error::InvalidArgument(_)) => {},
                other => panic!("Unexpected result: {:?}", other)
            }
        }
    }

    mod open {
        use super::AnnotationBlock;
        use super::AnnotationKind;
        use super::Error;
        use super::OpenAnnotationBlock;
        use super::endpoint;

        #[test]
        fn finish_now() {
            let open = AnnotationBlock::begin(endpoint(), AnnotationKind::Client);
            let start = open.start_timestamp();
            let block = open.finish();
            assert_eq!(block.start_timestamp(), start);
            assert!(block.end_timestamp() >= start);
        }

        #[test]
        fn finish_in_the_past_is_clamped() {
            let open = OpenAnnotationBlock::new(
                endpoint(), u64::max_value(), AnnotationKind::Server
            );
            let block = open.finish();
            assert_eq!(block.duration(), 0);
        }

        #[test]
        fn finish_at() {
            let open = OpenAnnotationBlock::new(endpoint(), 10, AnnotationKind::Server);
            let block = open.finish_at(40).unwrap();
            assert_eq!(block.duration(), 30);
        }

        #[test]
        fn finish_at_before_start() {
            let open = OpenAnnotationBlock::new(endpoint(), 10, AnnotationKind::Server);
            match open.finish_at(5) {
                Err(Error::InvalidArgument(_)) => {},
                other => panic!("Unexpected result: {:?}", other)
            }
        }
    }

    mod records {
        use super::AnnotationBlock;
        use super::AnnotationKind;
        use super::endpoint;

        fn values(kind: AnnotationKind) -> Vec<(u64, String)> {
            let block = AnnotationBlock::new(endpoint(), 1, 2, kind).unwrap();
            block.to_records().into_iter()
                .map(|record| (record.timestamp, record.value))
                .collect()
        }

        #[test]
        fn server() {
            assert_eq!(values(AnnotationKind::Server), [
                (1, String::from("sr")),
                (2, String::from("ss")),
            ]);
        }

        #[test]
        fn client() {
            assert_eq!(values(AnnotationKind::Client), [
                (1, String::from("cs")),
                (2, String::from("cr")),
            ]);
        }

        #[test]
        fn producer() {
            assert_eq!(values(AnnotationKind::Producer), [(1, String::from("ms"))]);
        }

        #[test]
        fn consumer() {
            assert_eq!(values(AnnotationKind::Consumer), [(1, String::from("mr"))]);
        }

        #[test]
        fn json_shape() {
            let block = AnnotationBlock::new(
                endpoint(), 1_000, 2_000, AnnotationKind::Server
            ).unwrap();
            let json = serde_json::to_string(&block.to_records()).unwrap();
            assert_eq!(json, concat!(
                r#"[{"timestamp":1000,"value":"sr","endpoint":{"serviceName":"checkout"}},"#,
                r#"{"timestamp":2000,"value":"ss","endpoint":{"serviceName":"checkout"}}]"#
            ));
        }
    }
}
