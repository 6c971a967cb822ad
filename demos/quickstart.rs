//! This example traces one request through two services in a single process.
//!
//! The "checkout" service receives a request without B3 headers and calls the
//! "inventory" service. The call is propagated with B3 headers and the
//! inventory service continues the same trace.
//!
//! The steps to use zipkin-b3 are:
//!
//!   1. Create a `Tracer` for the request, continuing inbound B3 headers if any.
//!   2. Record sub-operations as `Span`s and add them to the tracer.
//!   3. Inject B3 headers into outbound calls.
//!   4. Call `Tracer::trace` once the request is complete.
//!
//! Both tracers write their spans to standard error as Zipkin v1 JSON lines.
extern crate zipkin_b3;

use std::collections::HashMap;
use std::net::Ipv4Addr;

use zipkin_b3::AnnotationBlock;
use zipkin_b3::AnnotationKind;
use zipkin_b3::Endpoint;
use zipkin_b3::Identifier;
use zipkin_b3::Metadata;
use zipkin_b3::Profile;
use zipkin_b3::Result;
use zipkin_b3::Span;
use zipkin_b3::SpanOptions;
use zipkin_b3::Tracer;
use zipkin_b3::TracerOptions;
use zipkin_b3::loggers::FileLogger;
use zipkin_b3::propagation;
use zipkin_b3::samplers::PercentageSampler;
use zipkin_b3::utils::FailSpan;


fn main() -> Result<()> {
    let mut request = HashMap::new();
    request.insert(String::from("X-Quantity"), String::from("12x"));
    checkout(request)
}

fn checkout(inbound: HashMap<String, String>) -> Result<()> {
    let endpoint = Endpoint::new("checkout").ipv4(Ipv4Addr::new(10, 0, 0, 1)).port(8080);
    let options = match propagation::extract(&inbound)? {
        Some(context) => TracerOptions::from_b3(context),
        None => TracerOptions::default().sampler(PercentageSampler::new(1.0)?),
    };
    let mut tracer = Tracer::new("POST /checkout", endpoint.clone(), FileLogger::stderr(), options)?;

    // A malformed quantity is tagged on the span and replaced by a default.
    let mut metadata = Metadata::new();
    let raw = inbound.get("X-Quantity").map(String::as_str).unwrap_or("1");
    let quantity = match raw.parse::<i64>().fail_span(&mut metadata) {
        Ok(quantity) => quantity,
        Err(err) => {
            eprintln!("Invalid quantity {:?} ({}), reserving one item", raw, err);
            1
        }
    };
    metadata.set("quantity", quantity);

    // Outbound call to inventory, timed from the client side.
    let child_id = Identifier::generate();
    let mut outbound: HashMap<String, String> = HashMap::new();
    propagation::inject(tracer.info(), &child_id, &mut outbound)?;
    let block = AnnotationBlock::begin(endpoint, AnnotationKind::Client);
    inventory(outbound)?;

    let span_options = SpanOptions::default()
        .metadata(metadata)
        .parent_id(tracer.info().trace_span_id()?);
    let span = Span::with_options(
        tracer.info(), child_id, "reserve-stock", block.finish(), span_options
    )?;
    tracer.add_span(&span)?;
    tracer.trace()
}

fn inventory(inbound: HashMap<String, String>) -> Result<()> {
    let endpoint = Endpoint::new("inventory");
    let options = match propagation::extract(&inbound)? {
        Some(context) => TracerOptions::from_b3(context).profile(Profile::Backend),
        None => TracerOptions::default(),
    };
    let mut tracer = Tracer::new("GET /stock", endpoint, FileLogger::stderr(), options)?;
    tracer.trace()
}
