//! B3 header propagation.
//!
//! Reads and writes the B3 trace context in either of its encodings:
//!
//!   1. Multiple headers: `X-B3-TraceId`, `X-B3-SpanId`, `X-B3-ParentSpanId`,
//!      `X-B3-Sampled` and `X-B3-Flags`.
//!   2. A single `b3` header: `{trace_id}-{span_id}-{sampling_state}-{parent_span_id}`,
//!      where the last two fields are optional.
//!
//! The single header takes precedence when both are present.
//! Headers are always injected in the multiple header encoding.
use log::debug;

use super::Error;
use super::FLAG_DEBUG;
use super::FLAG_EMPTY;
use super::Identifier;
use super::MapCarrier;
use super::Result;
use super::TracerInfo;


pub const B3_SINGLE_HEADER: &str = "b3";
pub const B3_FLAGS_HEADER: &str = "X-B3-Flags";
pub const B3_PARENT_SPAN_ID_HEADER: &str = "X-B3-ParentSpanId";
pub const B3_SAMPLED_HEADER: &str = "X-B3-Sampled";
pub const B3_SPAN_ID_HEADER: &str = "X-B3-SpanId";
pub const B3_TRACE_ID_HEADER: &str = "X-B3-TraceId";


/// Trace context carried by inbound B3 headers.
///
/// `sampled` is `None` when the caller deferred the sampling decision.
/// A debug request sets `FLAG_DEBUG` in `flags`.
///
/// Headers carrying only a sampling decision (`b3: 0`, `b3: d`, or a lone
/// `X-B3-Sampled`) leave `trace_id` and `span_id` empty; the decision still
/// applies to the new trace started downstream.
#[derive(Clone, Debug, PartialEq)]
pub struct B3Context {
    pub trace_id: Option<Identifier>,
    pub span_id: Option<Identifier>,
    pub parent_span_id: Option<Identifier>,
    pub sampled: Option<bool>,
    pub flags: u8,
}


/// Extracts a B3 context from the carrier.
///
/// Returns `Ok(None)` if the carrier holds no B3 header at all.
/// A sampling decision without a complete pair of trace and span ids is
/// returned as a context with no identifiers.
///
/// # Examples
///
/// ```
/// extern crate zipkin_b3;
///
/// use std::collections::HashMap;
///
/// use zipkin_b3::TracerOptions;
/// use zipkin_b3::propagation;
///
///
/// fn main() {
///     let mut headers: HashMap<String, String> = HashMap::new();
///     headers.insert("X-B3-TraceId".into(), "463ac35c9f6413ad".into());
///     headers.insert("X-B3-SpanId".into(), "a2fb4a1d1a96d312".into());
///     headers.insert("X-B3-Sampled".into(), "1".into());
///
///     let context = propagation::extract(&headers).unwrap().unwrap();
///     assert_eq!(context.sampled, Some(true));
///     let options = TracerOptions::from_b3(context);
///     // ... snip ...
/// }
/// ```
pub fn extract(carrier: &dyn MapCarrier) -> Result<Option<B3Context>> {
    match carrier.get_ignore_case(B3_SINGLE_HEADER) {
        Some(header) => extract_single_header(&header),
        None => extract_multi_header(carrier),
    }
}

/// Injects the context for a downstream call into the carrier.
///
/// The downstream span is `child_span_id` and its parent is the span of
/// the current request.
pub fn inject(
    info: &TracerInfo, child_span_id: &Identifier, carrier: &mut dyn MapCarrier
) -> Result<()> {
    if child_span_id.is_wide() {
        return Err(Error::InvalidArgument(format!(
            "span id must be a 64-bit identifier, found {}", child_span_id
        )));
    }
    let sampled = if info.is_sampled()? { "1" } else { "0" };
    carrier.set(B3_TRACE_ID_HEADER, &info.trace_id()?.to_string());
    carrier.set(B3_SPAN_ID_HEADER, &child_span_id.to_string());
    carrier.set(B3_PARENT_SPAN_ID_HEADER, &info.trace_span_id()?.to_string());
    carrier.set(B3_SAMPLED_HEADER, sampled);
    if info.debug()? {
        carrier.set(B3_FLAGS_HEADER, "1");
    }
    Ok(())
}


fn extract_multi_header(carrier: &dyn MapCarrier) -> Result<Option<B3Context>> {
    let trace_id = match carrier.get_ignore_case(B3_TRACE_ID_HEADER) {
        Some(trace_id) => Some(Identifier::import(trace_id.trim())?),
        None => None,
    };
    let span_id = match carrier.get_ignore_case(B3_SPAN_ID_HEADER) {
        Some(span_id) => Some(parse_span_id(span_id.trim())?),
        None => None,
    };
    let parent_span_id = match carrier.get_ignore_case(B3_PARENT_SPAN_ID_HEADER) {
        Some(parent) => Some(parse_span_id(parent.trim())?),
        None => None,
    };
    let sampled = match carrier.get_ignore_case(B3_SAMPLED_HEADER) {
        Some(sampled) => Some(parse_sampled(sampled.trim())?),
        None => None,
    };
    let flags = match carrier.get_ignore_case(B3_FLAGS_HEADER) {
        Some(flags) => parse_flags(flags.trim())?,
        None => FLAG_EMPTY,
    };

    if trace_id.is_some() && span_id.is_some() {
        return Ok(Some(B3Context {
            trace_id,
            span_id,
            parent_span_id,
            sampled,
            flags,
        }));
    }
    if trace_id.is_some() || span_id.is_some() {
        debug!("Ignoring incomplete B3 identifiers: trace={:?}, span={:?}", trace_id, span_id);
    }
    if sampled.is_none() && flags == FLAG_EMPTY {
        return Ok(None);
    }
    Ok(Some(sampling_only(sampled, flags)))
}

fn extract_single_header(header: &str) -> Result<Option<B3Context>> {
    let header = header.trim();
    if header.is_empty() {
        return Ok(None);
    }
    let parts: Vec<&str> = header.split('-').collect();
    if parts.len() == 1 {
        let (sampled, flags) = parse_sampling_state(parts[0])?;
        return Ok(Some(sampling_only(sampled, flags)));
    }
    if parts.len() > 4 {
        return Err(Error::InvalidArgument(format!(
            "malformed b3 header {:?}", header
        )));
    }

    let trace_id = Identifier::import(parts[0])?;
    let span_id = parse_span_id(parts[1])?;
    let (sampled, flags) = match parts.get(2) {
        Some(state) => parse_sampling_state(state)?,
        None => (None, FLAG_EMPTY),
    };
    let parent_span_id = match parts.get(3) {
        Some(parent) => Some(parse_span_id(parent)?),
        None => None,
    };
    Ok(Some(B3Context {
        trace_id: Some(trace_id),
        span_id: Some(span_id),
        parent_span_id,
        sampled,
        flags,
    }))
}

fn sampling_only(sampled: Option<bool>, flags: u8) -> B3Context {
    B3Context {
        trace_id: None,
        span_id: None,
        parent_span_id: None,
        sampled,
        flags,
    }
}

fn parse_flags(flags: &str) -> Result<u8> {
    match flags {
        "0" => Ok(FLAG_EMPTY),
        "1" => Ok(FLAG_DEBUG),
        _ => Err(Error::InvalidArgument(format!(
            "invalid {} value {:?}", B3_FLAGS_HEADER, flags
        ))),
    }
}

fn parse_sampled(sampled: &str) -> Result<bool> {
    match sampled {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(Error::InvalidArgument(format!(
            "invalid sampling state {:?}", sampled
        ))),
    }
}

fn parse_sampling_state(state: &str) -> Result<(Option<bool>, u8)> {
    match state {
        "d" => Ok((Some(true), FLAG_DEBUG)),
        state => Ok((Some(parse_sampled(state)?), FLAG_EMPTY)),
    }
}

fn parse_span_id(hex: &str) -> Result<Identifier> {
    let id = Identifier::import(hex)?;
    if id.is_wide() {
        return Err(Error::InvalidIdentifier(format!(
            "span ids must be 16 hex characters, found {:?}", hex
        )));
    }
    Ok(id)
}
