use super::Error;
use super::Identifier;
use super::Result;
use super::TracerInfo;

pub mod annotation;
pub mod metadata;
mod record;

pub use self::record::SpanRecord;

use self::annotation::AnnotationBlock;
use self::metadata::Metadata;


/// Model of a finished unit of work.
///
/// A `Span` is immutable once built: its timing is fixed by the
/// `AnnotationBlock` and its identifiers by the `TracerInfo` (or explicit
/// `SpanOptions`) it was built against.
///
/// Spans are handed to `Tracer::add_span` which renders them with
/// `Span::to_record`.
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
/// use zipkin_b3::TracerInfo;
///
///
/// fn main() {
///     let mut info = TracerInfo::new();
///     info.init(None, None, None, None, 0).unwrap();
///
///     let block = AnnotationBlock::new(
///         Endpoint::new("checkout"), 1_000, 1_500, AnnotationKind::Client
///     ).unwrap();
///     let span = Span::new(&info, Identifier::generate(), "db-query", block).unwrap();
///     assert_eq!(span.trace_id(), info.trace_id().unwrap());
///     assert_eq!(span.to_record().duration, 500);
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Span {
    annotation_block: AnnotationBlock,
    debug: bool,
    id: Identifier,
    metadata: Option<Metadata>,
    name: String,
    parent_id: Option<Identifier>,
    trace_id: Identifier,
}

impl Span {
    /// Creates a span with the trace and parent ids of `info`.
    pub fn new(
        info: &TracerInfo, id: Identifier, name: &str, annotation_block: AnnotationBlock
    ) -> Result<Span> {
        Span::with_options(info, id, name, annotation_block, SpanOptions::default())
    }

    /// Creates a span, overriding any `TracerInfo` default set in `options`.
    ///
    /// Fails if `name` is empty, if `info` is not initialised, or if the
    /// span or parent ids are not 64 bits wide.
    pub fn with_options(
        info: &TracerInfo, id: Identifier, name: &str,
        annotation_block: AnnotationBlock, options: SpanOptions
    ) -> Result<Span> {
        if name.is_empty() {
            return Err(Error::InvalidArgument(String::from(
                "span name must not be empty"
            )));
        }
        if id.is_wide() {
            return Err(Error::InvalidArgument(format!(
                "span id must be a 64-bit identifier, found {}", id
            )));
        }
        let trace_id = match options.trace_id {
            Some(trace_id) => trace_id,
            None => info.trace_id()?,
        };
        let parent_id = options.parent_id.or_else(|| info.trace_parent_span_id());
        if let Some(parent_id) = parent_id {
            if parent_id.is_wide() {
                return Err(Error::InvalidArgument(format!(
                    "parent id must be a 64-bit identifier, found {}", parent_id
                )));
            }
        }
        Ok(Span {
            annotation_block,
            debug: info.debug()?,
            id,
            metadata: options.metadata,
            name: String::from(name),
            parent_id,
            trace_id,
        })
    }
}

impl Span {
    pub fn annotation_block(&self) -> &AnnotationBlock {
        &self.annotation_block
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn id(&self) -> Identifier {
        self.id
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent_id(&self) -> Option<Identifier> {
        self.parent_id
    }

    pub fn trace_id(&self) -> Identifier {
        self.trace_id
    }

    /// Renders the span into its Zipkin v1 record.
    pub fn to_record(&self) -> SpanRecord {
        SpanRecord {
            id: self.id,
            trace_id: self.trace_id,
            name: self.name.clone(),
            debug: self.debug,
            timestamp: self.annotation_block.start_timestamp(),
            duration: self.annotation_block.duration(),
            annotations: self.annotation_block.to_records(),
            parent_id: self.parent_id,
            binary_annotations: self.metadata.as_ref().map(Metadata::to_records),
        }
    }
}


/// Additional options passed to `Span::with_options`.
///
/// All values are optional; unset identifiers default to the `TracerInfo`.
///
/// # Examples
///
/// ```
/// extern crate zipkin_b3;
///
/// use zipkin_b3::Identifier;
/// use zipkin_b3::Metadata;
/// use zipkin_b3::SpanOptions;
///
///
/// fn main() {
///     let mut metadata = Metadata::new();
///     metadata.set("sql.table", "orders");
///     let options = SpanOptions::default()
///         .metadata(metadata)
///         .parent_id(Identifier::generate());
/// }
/// ```
#[derive(Clone, Debug, Default)]
pub struct SpanOptions {
    metadata: Option<Metadata>,
    parent_id: Option<Identifier>,
    trace_id: Option<Identifier>,
}

impl SpanOptions {
    /// Attaches metadata, rendered as `binaryAnnotations`.
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Sets the parent span id instead of the context's parent.
    pub fn parent_id(mut self, parent_id: Identifier) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Sets the trace id instead of the context's trace id.
    pub fn trace_id(mut self, trace_id: Identifier) -> Self {
        self.trace_id = Some(trace_id);
        self
    }
}
