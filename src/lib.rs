//! Zipkin v1 span recording with B3 header propagation.
//!
//! A `Tracer` owns the trace context of one request (`TracerInfo`), collects the
//! `Span`s produced while serving it and hands them, with a root span for the
//! request itself, to a `Logger` when `Tracer::trace` is called.
//!
//! The `propagation` module reads and writes the B3 headers used to continue a
//! trace across services.
//!
//! # Examples
//!
//! ```
//! extern crate zipkin_b3;
//!
//! use zipkin_b3::AnnotationBlock;
//! use zipkin_b3::AnnotationKind;
//! use zipkin_b3::Endpoint;
//! use zipkin_b3::Identifier;
//! use zipkin_b3::Span;
//! use zipkin_b3::Tracer;
//! use zipkin_b3::TracerOptions;
//! use zipkin_b3::loggers::ChannelLogger;
//! use zipkin_b3::samplers::AlwaysSample;
//!
//!
//! fn main() {
//!     let (logger, receiver) = ChannelLogger::new();
//!     let options = TracerOptions::default().sampler(AlwaysSample);
//!     let mut tracer = Tracer::new(
//!         "checkout", Endpoint::new("checkout"), logger, options
//!     ).unwrap();
//!
//!     let block = AnnotationBlock::new(
//!         Endpoint::new("inventory"), 100, 250, AnnotationKind::Client
//!     ).unwrap();
//!     let span = Span::new(tracer.info(), Identifier::generate(), "reserve", block).unwrap();
//!     tracer.add_span(&span).unwrap();
//!     tracer.trace().unwrap();
//!
//!     let spans = receiver.recv().unwrap();
//!     assert_eq!(spans.len(), 2);
//! }
//! ```
mod carrier;
mod context;
mod endpoint;
mod errors;
mod span;
mod timestamp;
mod tracer;

pub mod loggers;
pub mod propagation;
pub mod samplers;
pub mod utils;


pub use self::carrier::MapCarrier;

pub use self::context::FLAG_DEBUG;
pub use self::context::FLAG_EMPTY;
pub use self::context::Identifier;
pub use self::context::Origin;
pub use self::context::TracerInfo;

pub use self::endpoint::Endpoint;

pub use self::errors::Error;
pub use self::errors::Result;

pub use self::propagation::B3Context;

pub use self::span::Span;
pub use self::span::SpanOptions;
pub use self::span::SpanRecord;
pub use self::span::annotation::AnnotationBlock;
pub use self::span::annotation::AnnotationKind;
pub use self::span::annotation::AnnotationRecord;
pub use self::span::annotation::OpenAnnotationBlock;
pub use self::span::metadata::BinaryAnnotationRecord;
pub use self::span::metadata::Metadata;
pub use self::span::metadata::MetadataValue;
pub use self::span::metadata::RecordValue;

pub use self::tracer::Logger;
pub use self::tracer::Profile;
pub use self::tracer::Tracer;
pub use self::tracer::TracerOptions;
