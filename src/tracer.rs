use log::debug;
use log::trace;
use log::warn;

use super::AnnotationBlock;
use super::AnnotationKind;
use super::B3Context;
use super::Endpoint;
use super::Error;
use super::Identifier;
use super::Metadata;
use super::Result;
use super::Span;
use super::SpanOptions;
use super::SpanRecord;
use super::TracerInfo;
use super::samplers::AlwaysSample;
use super::samplers::NeverSample;
use super::samplers::Sampler;
use super::timestamp;


/// Destination for the span records of a finished trace.
///
/// `Tracer::trace` calls `Logger::trace` at most once, and only for sampled
/// traces. Errors are returned to the caller of `Tracer::trace` unchanged.
pub trait Logger : Send {
    fn trace(&mut self, spans: &[SpanRecord]) -> Result<()>;
}


/// Position of the traced service in the call chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    /// Internal hop: the parent span id keeps propagating.
    Backend,

    /// Edge of the system: the parent span id is cleared when tracing.
    Frontend,
}

impl Default for Profile {
    fn default() -> Profile {
        Profile::Frontend
    }
}


/// Additional options passed to `Tracer::new`.
///
/// Every value is optional:
///
///   * Without a sampler the trace is sampled.
///   * Missing trace and span ids are generated.
///   * The parent span id defaults to none and the flags to `FLAG_EMPTY`.
///   * The profile defaults to `Profile::Frontend`.
///
/// # Examples
///
/// ```
/// extern crate zipkin_b3;
///
/// use zipkin_b3::FLAG_DEBUG;
/// use zipkin_b3::Profile;
/// use zipkin_b3::TracerOptions;
/// use zipkin_b3::samplers::PercentageSampler;
///
///
/// fn main() {
///     let options = TracerOptions::default()
///         .sampler(PercentageSampler::new(0.25).unwrap())
///         .trace_flags(FLAG_DEBUG)
///         .profile(Profile::Backend);
/// }
/// ```
#[derive(Default)]
pub struct TracerOptions {
    metadata: Option<Metadata>,
    profile: Profile,
    sampler: Option<Box<dyn Sampler>>,
    trace_flags: u8,
    trace_id: Option<Identifier>,
    trace_parent_span_id: Option<Identifier>,
    trace_span_id: Option<Identifier>,
}

impl TracerOptions {
    /// Options continuing a trace extracted from inbound B3 headers.
    ///
    /// A sampling decision carried by the headers replaces the sampler.
    /// Headers without identifiers start a new trace that still honours
    /// the inbound decision and debug flag.
    pub fn from_b3(context: B3Context) -> TracerOptions {
        let mut options = TracerOptions::default().trace_flags(context.flags);
        options.trace_id = context.trace_id;
        options.trace_span_id = context.span_id;
        options.trace_parent_span_id = context.parent_span_id;
        match context.sampled {
            Some(true) => options.sampler(AlwaysSample),
            Some(false) => options.sampler(NeverSample),
            None => options,
        }
    }
}

impl TracerOptions {
    /// Metadata attached to the root span.
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    /// Sampler asked once, when the tracer is created.
    pub fn sampler<S: Sampler + 'static>(mut self, sampler: S) -> Self {
        self.sampler = Some(Box::new(sampler));
        self
    }

    pub fn trace_flags(mut self, flags: u8) -> Self {
        self.trace_flags = flags;
        self
    }

    pub fn trace_id(mut self, trace_id: Identifier) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn trace_parent_span_id(mut self, parent_id: Identifier) -> Self {
        self.trace_parent_span_id = Some(parent_id);
        self
    }

    pub fn trace_span_id(mut self, span_id: Identifier) -> Self {
        self.trace_span_id = Some(span_id);
        self
    }
}


/// Collects the spans of one logical request and ships them to a `Logger`.
///
/// Creating a `Tracer` initialises its `TracerInfo` and starts the clock of
/// the root span. Spans built with `Tracer::info` are added with
/// `Tracer::add_span` and `Tracer::trace` completes the request.
///
/// # Examples
///
/// ```
/// extern crate zipkin_b3;
///
/// use zipkin_b3::AnnotationBlock;
/// use zipkin_b3::AnnotationKind;
/// use zipkin_b3::Endpoint;
/// use zipkin_b3::Identifier;
/// use zipkin_b3::Span;
/// use zipkin_b3::Tracer;
/// use zipkin_b3::TracerOptions;
/// use zipkin_b3::loggers::ChannelLogger;
///
///
/// fn main() {
///     let endpoint = Endpoint::new("checkout");
///     let (logger, receiver) = ChannelLogger::new();
///     let mut tracer = Tracer::new(
///         "checkout", endpoint.clone(), logger, TracerOptions::default()
///     ).unwrap();
///
///     let block = AnnotationBlock::begin(endpoint, AnnotationKind::Client).finish();
///     let span = Span::new(tracer.info(), Identifier::generate(), "db-query", block).unwrap();
///     tracer.add_span(&span).unwrap();
///     tracer.trace().unwrap();
///
///     let spans = receiver.recv().unwrap();
///     assert_eq!(spans.len(), 2);
/// }
/// ```
pub struct Tracer {
    endpoint: Endpoint,
    info: TracerInfo,
    logger: Box<dyn Logger>,
    metadata: Option<Metadata>,
    name: String,
    profile: Profile,
    spans: Vec<SpanRecord>,
    start_timestamp: u64,
    traced: bool,
}

impl Tracer {
    /// Creates a tracer for the request `name`, served by `endpoint`.
    ///
    /// Fails if `name` is empty or if `options` hold invalid identifiers.
    pub fn new<L: Logger + 'static>(
        name: &str, endpoint: Endpoint, logger: L, options: TracerOptions
    ) -> Result<Tracer> {
        if name.is_empty() {
            return Err(Error::InvalidArgument(String::from(
                "tracer name must not be empty"
            )));
        }
        let mut info = TracerInfo::new();
        info.init(
            options.sampler.as_deref(),
            options.trace_id, options.trace_span_id,
            options.trace_parent_span_id, options.trace_flags
        )?;
        Ok(Tracer {
            endpoint,
            info,
            logger: Box::new(logger),
            metadata: options.metadata,
            name: String::from(name),
            profile: options.profile,
            spans: Vec::new(),
            start_timestamp: timestamp::now(),
            traced: false,
        })
    }
}

impl Tracer {
    /// Renders and stores a span, unless the trace is not sampled.
    ///
    /// Spans are not deduplicated: adding the same span twice records it twice.
    pub fn add_span(&mut self, span: &Span) -> Result<()> {
        if !self.info.is_sampled()? {
            return Ok(());
        }
        if self.traced {
            warn!("Span {} added to tracer '{}' after it was traced", span.name(), self.name);
        }
        trace!("Adding span {} ({}) to tracer '{}'", span.name(), span.id(), self.name);
        self.spans.push(span.to_record());
        Ok(())
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The propagation context spans of this request are built against.
    pub fn info(&self) -> &TracerInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = profile;
    }

    /// Records accumulated so far, in the order they were added.
    pub fn spans(&self) -> &[SpanRecord] {
        &self.spans
    }

    /// Microsecond timestamp of the tracer creation.
    pub fn start_timestamp(&self) -> u64 {
        self.start_timestamp
    }

    /// Completes the request and sends every span to the logger.
    ///
    /// Unsampled traces are dropped without calling the logger.
    /// The root span, named after the tracer, is appended last.
    ///
    /// A tracer can only be traced once: later calls fail with
    /// `Error::AlreadyTraced` and do not call the logger.
    pub fn trace(&mut self) -> Result<()> {
        if self.traced {
            return Err(Error::AlreadyTraced);
        }
        if !self.info.is_sampled()? {
            debug!("Dropping unsampled trace '{}'", self.name);
            self.traced = true;
            return Ok(());
        }
        if self.profile == Profile::Frontend {
            self.info.set_trace_parent_span_id(None);
        }

        let root = self.root_span()?;
        self.add_span(&root)?;
        self.traced = true;
        debug!(
            "Sending {} spans for trace {} ('{}')",
            self.spans.len(), self.info.trace_id()?, self.name
        );
        self.logger.trace(&self.spans)
    }

    fn root_span(&self) -> Result<Span> {
        let end = timestamp::now().max(self.start_timestamp);
        let block = AnnotationBlock::new(
            self.endpoint.clone(), self.start_timestamp, end, AnnotationKind::Server
        )?;
        let mut options = SpanOptions::default();
        if let Some(ref metadata) = self.metadata {
            options = options.metadata(metadata.clone());
        }
        Span::with_options(
            &self.info, self.info.trace_span_id()?, &self.name, block, options
        )
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::AnnotationBlock;
    use super::super::AnnotationKind;
    use super::super::B3Context;
    use super::super::Endpoint;
    use super::super::Error;
    use super::super::FLAG_DEBUG;
    use super::super::Identifier;
    use super::super::Metadata;
    use super::super::Result;
    use super::super::Span;
    use super::super::SpanRecord;
    use super::super::loggers::ChannelLogger;
    use super::super::loggers::SpanBatchReceiver;
    use super::super::samplers::NeverSample;

    use super::Logger;
    use super::Profile;
    use super::Tracer;
    use super::TracerOptions;

    fn make_tracer(options: TracerOptions) -> (Tracer, SpanBatchReceiver) {
        let (logger, receiver) = ChannelLogger::new();
        let tracer = Tracer::new(
            "checkout", Endpoint::new("checkout"), logger, options
        ).unwrap();
        (tracer, receiver)
    }

    fn make_span(tracer: &Tracer, name: &str) -> Span {
        let block = AnnotationBlock::new(
            Endpoint::new("db"), 1_000, 1_400, AnnotationKind::Client
        ).unwrap();
        Span::new(tracer.info(), Identifier::generate(), name, block).unwrap()
    }

    fn assert_no_batch(receiver: &SpanBatchReceiver) {
        match receiver.recv_timeout(Duration::from_millis(10)) {
            Err(_) => {},
            Ok(spans) => panic!("Unexpected spans: {:?}", spans)
        }
    }

    mod create {
        use super::super::super::loggers::NullLogger;

        use super::Endpoint;
        use super::Error;
        use super::Profile;
        use super::Tracer;
        use super::TracerOptions;
        use super::make_tracer;

        #[test]
        fn rejects_empty_name() {
            let tracer = Tracer::new(
                "", Endpoint::new("checkout"), NullLogger, TracerOptions::default()
            );
            match tracer {
                Err(Error::InvalidArgument(_)) => {},
                Err(err) => panic!("Unexpected error: {:?}", err),
                Ok(_) => panic!("Unexpected tracer")
            }
        }

        #[test]
        fn initialises_context() {
            let (tracer, _) = make_tracer(TracerOptions::default());
            assert!(tracer.info().is_sampled().unwrap());
            tracer.info().trace_id().unwrap();
            tracer.info().trace_span_id().unwrap();
            assert_eq!(tracer.profile(), Profile::Frontend);
            assert_eq!(tracer.name(), "checkout");
            assert_eq!(tracer.endpoint().service_name(), "checkout");
            assert!(tracer.spans().is_empty());
        }

        #[test]
        fn set_profile() {
            let (mut tracer, _) = make_tracer(TracerOptions::default());
            tracer.set_profile(Profile::Backend);
            assert_eq!(tracer.profile(), Profile::Backend);
        }
    }

    mod add_span {
        use super::NeverSample;
        use super::TracerOptions;
        use super::make_span;
        use super::make_tracer;

        #[test]
        fn accumulates_when_sampled() {
            let (mut tracer, _) = make_tracer(TracerOptions::default());
            let span = make_span(&tracer, "db-query");
            tracer.add_span(&span).unwrap();
            tracer.add_span(&span).unwrap();
            assert_eq!(tracer.spans().len(), 2);
            assert_eq!(tracer.spans()[0], span.to_record());
        }

        #[test]
        fn noop_when_not_sampled() {
            let (mut tracer, _) = make_tracer(TracerOptions::default().sampler(NeverSample));
            let span = make_span(&tracer, "db-query");
            tracer.add_span(&span).unwrap();
            assert!(tracer.spans().is_empty());
        }
    }

    mod trace {
        use super::Error;
        use super::Identifier;
        use super::Metadata;
        use super::NeverSample;
        use super::Profile;
        use super::TracerOptions;
        use super::assert_no_batch;
        use super::make_span;
        use super::make_tracer;

        #[test]
        fn emits_children_then_root() {
            let (mut tracer, receiver) = make_tracer(TracerOptions::default());
            let child = make_span(&tracer, "db-query");
            tracer.add_span(&child).unwrap();
            tracer.trace().unwrap();

            let spans = receiver.recv().unwrap();
            assert_eq!(spans.len(), 2);
            assert_eq!(spans[0].name, "db-query");
            assert_eq!(spans[0].timestamp, 1_000);
            assert_eq!(spans[0].duration, 400);

            let root = &spans[1];
            assert_eq!(root.name, "checkout");
            assert_eq!(root.timestamp, tracer.start_timestamp());
            assert_eq!(root.id, tracer.info().trace_span_id().unwrap());
            assert_eq!(root.trace_id, tracer.info().trace_id().unwrap());
            assert_eq!(root.annotations[0].value, "sr");
            assert_eq!(root.annotations[1].value, "ss");
            assert_no_batch(&receiver);
        }

        #[test]
        fn length_is_adds_plus_root() {
            let (mut tracer, receiver) = make_tracer(TracerOptions::default());
            for i in 0..5 {
                let span = make_span(&tracer, &format!("span-{}", i));
                tracer.add_span(&span).unwrap();
            }
            tracer.trace().unwrap();
            assert_eq!(receiver.recv().unwrap().len(), 6);
        }

        #[test]
        fn unsampled_never_calls_logger() {
            let options = TracerOptions::default().sampler(NeverSample);
            let (mut tracer, receiver) = make_tracer(options);
            let child = make_span(&tracer, "db-query");
            tracer.add_span(&child).unwrap();
            tracer.trace().unwrap();
            assert_no_batch(&receiver);
        }

        #[test]
        fn frontend_clears_parent() {
            let parent = Identifier::generate();
            let options = TracerOptions::default().trace_parent_span_id(parent);
            let (mut tracer, receiver) = make_tracer(options);
            tracer.set_profile(Profile::Frontend);
            tracer.trace().unwrap();

            let spans = receiver.recv().unwrap();
            assert_eq!(spans[0].parent_id, None);
            assert_eq!(tracer.info().trace_parent_span_id(), None);
            let json = serde_json::to_value(&spans[0]).unwrap();
            assert!(!json.as_object().unwrap().contains_key("parentId"));
        }

        #[test]
        fn frontend_without_parent() {
            let (mut tracer, receiver) = make_tracer(TracerOptions::default());
            tracer.set_profile(Profile::Frontend);
            tracer.trace().unwrap();
            let spans = receiver.recv().unwrap();
            assert_eq!(spans[0].parent_id, None);
            assert_eq!(tracer.info().trace_parent_span_id(), None);
        }

        #[test]
        fn backend_keeps_parent() {
            let parent = Identifier::generate();
            let options = TracerOptions::default()
                .trace_parent_span_id(parent)
                .profile(Profile::Backend);
            let (mut tracer, receiver) = make_tracer(options);
            tracer.trace().unwrap();
            let spans = receiver.recv().unwrap();
            assert_eq!(spans[0].parent_id, Some(parent));
            assert_eq!(tracer.info().trace_parent_span_id(), Some(parent));
        }

        #[test]
        fn root_carries_metadata() {
            let mut metadata = Metadata::new();
            metadata.set("http.path", "/checkout");
            let (mut tracer, receiver) = make_tracer(
                TracerOptions::default().metadata(metadata)
            );
            tracer.trace().unwrap();
            let spans = receiver.recv().unwrap();
            let annotations = spans[0].binary_annotations.as_ref().unwrap();
            assert_eq!(annotations[0].key, "http.path");
        }

        #[test]
        fn is_single_shot() {
            let (mut tracer, receiver) = make_tracer(TracerOptions::default());
            tracer.trace().unwrap();
            match tracer.trace() {
                Err(Error::AlreadyTraced) => {},
                other => panic!("Unexpected result: {:?}", other)
            }
            assert_eq!(receiver.recv().unwrap().len(), 1);
            assert_no_batch(&receiver);
        }

        #[test]
        fn unsampled_is_single_shot_too() {
            let (mut tracer, _) = make_tracer(TracerOptions::default().sampler(NeverSample));
            tracer.trace().unwrap();
            match tracer.trace() {
                Err(Error::AlreadyTraced) => {},
                other => panic!("Unexpected result: {:?}", other)
            }
        }
    }

    mod options {
        use std::collections::HashMap;

        use super::super::super::propagation;

        use super::B3Context;
        use super::FLAG_DEBUG;
        use super::Identifier;
        use super::SpanBatchReceiver;
        use super::Tracer;
        use super::TracerOptions;
        use super::assert_no_batch;
        use super::make_tracer;

        fn context(sampled: Option<bool>, flags: u8) -> B3Context {
            B3Context {
                trace_id: Some(Identifier::import("463ac35c9f6413ad48485a3953bb6124").unwrap()),
                span_id: Some(Identifier::import("a2fb4a1d1a96d312").unwrap()),
                parent_span_id: Some(Identifier::import("0020000000000001").unwrap()),
                sampled,
                flags,
            }
        }

        #[test]
        fn from_b3_keeps_identifiers() {
            let b3 = context(Some(true), 0);
            let (tracer, _) = make_tracer(TracerOptions::from_b3(b3.clone()));
            assert_eq!(Some(tracer.info().trace_id().unwrap()), b3.trace_id);
            assert_eq!(Some(tracer.info().trace_span_id().unwrap()), b3.span_id);
            assert_eq!(tracer.info().trace_parent_span_id(), b3.parent_span_id);
            assert!(tracer.info().is_sampled().unwrap());
        }

        #[test]
        fn from_b3_not_sampled() {
            let (tracer, _) = make_tracer(TracerOptions::from_b3(context(Some(false), 0)));
            assert!(!tracer.info().is_sampled().unwrap());
        }

        #[test]
        fn from_b3_deferred_is_sampled() {
            let (tracer, _) = make_tracer(TracerOptions::from_b3(context(None, 0)));
            assert!(tracer.info().is_sampled().unwrap());
        }

        fn from_headers(pairs: &[(&str, &str)]) -> (Tracer, SpanBatchReceiver) {
            let map: HashMap<String, String> = pairs.iter()
                .map(|&(k, v)| (String::from(k), String::from(v)))
                .collect();
            let context = propagation::extract(&map).unwrap().unwrap();
            make_tracer(TracerOptions::from_b3(context))
        }

        #[test]
        fn single_header_deny_is_honoured() {
            let (mut tracer, receiver) = from_headers(&[("b3", "0")]);
            assert!(!tracer.info().is_sampled().unwrap());
            assert!(!tracer.info().debug().unwrap());
            tracer.trace().unwrap();
            assert_no_batch(&receiver);
        }

        #[test]
        fn multi_header_deny_is_honoured() {
            let (mut tracer, receiver) = from_headers(&[("X-B3-Sampled", "0")]);
            assert!(!tracer.info().is_sampled().unwrap());
            assert!(!tracer.info().debug().unwrap());
            tracer.trace().unwrap();
            assert_no_batch(&receiver);
        }

        #[test]
        fn single_header_debug_is_honoured() {
            let (mut tracer, receiver) = from_headers(&[("b3", "d")]);
            assert!(tracer.info().is_sampled().unwrap());
            assert!(tracer.info().debug().unwrap());
            tracer.trace().unwrap();
            let spans = receiver.recv().unwrap();
            assert_eq!(spans.len(), 1);
            assert!(spans[0].debug);
        }

        #[test]
        fn decision_only_generates_ids() {
            let (tracer, _) = from_headers(&[("b3", "1")]);
            tracer.info().trace_id().unwrap();
            tracer.info().trace_span_id().unwrap();
            assert_eq!(tracer.info().trace_parent_span_id(), None);
        }

        #[test]
        fn from_b3_debug() {
            let (tracer, _) = make_tracer(
                TracerOptions::from_b3(context(Some(false), FLAG_DEBUG))
            );
            assert!(tracer.info().debug().unwrap());
            assert!(tracer.info().is_sampled().unwrap());
        }
    }

    struct FailingLogger;
    impl Logger for FailingLogger {
        fn trace(&mut self, _: &[SpanRecord]) -> Result<()> {
            Err(Error::InvalidArgument(String::from("sink is down")))
        }
    }

    #[test]
    fn logger_errors_propagate() {
        let mut tracer = Tracer::new(
            "checkout", Endpoint::new("checkout"), FailingLogger, TracerOptions::default()
        ).unwrap();
        match tracer.trace() {
            Err(Error::InvalidArgument(ref msg)) => assert_eq!(msg, "sink is down"),
            other => panic!("Unexpected result: {:?}", other)
        }
    }

    #[test]
    fn debug_flag_marks_spans() {
        let (mut tracer, receiver) = make_tracer(
            TracerOptions::default().trace_flags(FLAG_DEBUG)
        );
        let span = make_span(&tracer, "db-query");
        assert!(span.debug());
        tracer.add_span(&span).unwrap();
        tracer.trace().unwrap();
        let spans = receiver.recv().unwrap();
        assert!(spans.iter().all(|span| span.debug));
    }
}
