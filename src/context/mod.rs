use log::debug;

use super::Error;
use super::Result;
use super::samplers::Sampler;

mod identifier;

pub use self::identifier::Identifier;
pub use self::identifier::Origin;


/// No trace flags set.
pub const FLAG_EMPTY: u8 = 0;

/// Bit 0 of the trace flags: the trace is a debug trace.
pub const FLAG_DEBUG: u8 = 1;


/// B3 propagation context for one logical request.
///
/// Holds the sampling decision and the `X-B3-TraceId`, `X-B3-SpanId`,
/// `X-B3-ParentSpanId` and `X-B3-Flags` values of the request being traced.
/// Spans built against a `TracerInfo` default their trace and parent ids to
/// the values stored here.
///
/// The context must be initialised with `TracerInfo::init` before the
/// sampling decision or the trace identifiers can be read.
///
/// # Examples
///
/// ```
/// extern crate zipkin_b3;
///
/// use zipkin_b3::Identifier;
/// use zipkin_b3::TracerInfo;
/// use zipkin_b3::samplers::NeverSample;
///
///
/// fn main() {
///     let mut info = TracerInfo::new();
///     assert!(info.trace_id().is_err());
///
///     let trace_id = Identifier::import("463ac35c9f6413ad").unwrap();
///     info.init(Some(&NeverSample), Some(trace_id), None, None, 0).unwrap();
///     assert_eq!(info.trace_id().unwrap(), trace_id);
///     assert!(!info.is_sampled().unwrap());
/// }
/// ```
#[derive(Clone, Debug, Default)]
pub struct TracerInfo {
    sampled: bool,
    trace_flags: u8,
    trace_id: Option<Identifier>,
    trace_parent_span_id: Option<Identifier>,
    trace_span_id: Option<Identifier>,
}

impl TracerInfo {
    /// Creates an uninitialised context.
    pub fn new() -> TracerInfo {
        TracerInfo::default()
    }
}

impl TracerInfo {
    /// Initialises (or re-initialises) every field of the context at once.
    ///
    /// Without a sampler the trace is sampled, otherwise the sampler decides.
    /// A debug flag forces sampling whatever the sampler decided.
    /// Missing trace and span identifiers are generated.
    ///
    /// Fails without changing the context if the span or parent identifiers
    /// are not 64 bits wide.
    pub fn init(
        &mut self, sampler: Option<&dyn Sampler>, trace_id: Option<Identifier>,
        trace_span_id: Option<Identifier>,
        trace_parent_span_id: Option<Identifier>, trace_flags: u8
    ) -> Result<()> {
        check_span_width("trace span id", trace_span_id.as_ref())?;
        check_span_width("trace parent span id", trace_parent_span_id.as_ref())?;

        let decided = sampler.map(|sampler| sampler.decide()).unwrap_or(true);
        let debug = (trace_flags & FLAG_DEBUG) == FLAG_DEBUG;
        let trace_id = trace_id.unwrap_or_else(Identifier::generate);
        let trace_span_id = trace_span_id.unwrap_or_else(Identifier::generate);

        self.sampled = decided || debug;
        self.trace_flags = trace_flags;
        self.trace_id = Some(trace_id);
        self.trace_parent_span_id = trace_parent_span_id;
        self.trace_span_id = Some(trace_span_id);
        debug!(
            "Initialised trace context: trace_id={}, span_id={}, parent_id={:?}, sampled={}, flags={}",
            trace_id, trace_span_id,
            trace_parent_span_id.map(|id| id.to_string()),
            self.sampled, trace_flags
        );
        Ok(())
    }

    /// Whether the `FLAG_DEBUG` bit is set.
    pub fn debug(&self) -> Result<bool> {
        self.check_init()?;
        Ok((self.trace_flags & FLAG_DEBUG) == FLAG_DEBUG)
    }

    /// Current sampling decision, for `X-B3-Sampled`.
    pub fn is_sampled(&self) -> Result<bool> {
        self.check_init()?;
        Ok(self.sampled)
    }

    /// Raw trace flags bitmask.
    pub fn trace_flags(&self) -> Result<u8> {
        self.check_init()?;
        Ok(self.trace_flags)
    }

    /// Current trace id, for `X-B3-TraceId`.
    pub fn trace_id(&self) -> Result<Identifier> {
        self.check_init()?;
        self.trace_id.ok_or(Error::NotInitialized)
    }

    /// Parent of the current span, for `X-B3-ParentSpanId`.
    ///
    /// Not guarded: an uninitialised context has no parent.
    pub fn trace_parent_span_id(&self) -> Option<Identifier> {
        self.trace_parent_span_id
    }

    /// Span id of the current request, for `X-B3-SpanId`.
    pub fn trace_span_id(&self) -> Result<Identifier> {
        self.check_init()?;
        self.trace_span_id.ok_or(Error::NotInitialized)
    }

    /// Rewrites the parent span id propagated to new spans.
    pub fn set_trace_parent_span_id(&mut self, parent: Option<Identifier>) {
        self.trace_parent_span_id = parent;
    }

    fn check_init(&self) -> Result<()> {
        match self.trace_id {
            Some(_) => Ok(()),
            None => Err(Error::NotInitialized)
        }
    }
}


fn check_span_width(field: &str, id: Option<&Identifier>) -> Result<()> {
    match id {
        Some(id) if id.is_wide() => Err(Error::InvalidArgument(format!(
            "{} must be a 64-bit identifier, found {}", field, id
        ))),
        _ => Ok(())
    }
}
