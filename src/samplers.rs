use rand::Rng;

use super::Error;
use super::Result;


/// Decides whether a new trace is recorded.
///
/// A `TracerInfo` asks its sampler exactly once, while it is initialised.
pub trait Sampler {
    fn decide(&self) -> bool;
}


/// Samples every trace.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysSample;

impl Sampler for AlwaysSample {
    fn decide(&self) -> bool {
        true
    }
}


/// Samples no trace.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverSample;

impl Sampler for NeverSample {
    fn decide(&self) -> bool {
        false
    }
}


/// Samples a random share of traces.
///
/// # Examples
///
/// ```
/// extern crate zipkin_b3;
///
/// use zipkin_b3::samplers::PercentageSampler;
/// use zipkin_b3::samplers::Sampler;
///
///
/// fn main() {
///     let sampler = PercentageSampler::new(1.0).unwrap();
///     assert!(sampler.decide());
/// }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct PercentageSampler {
    rate: f64,
}

impl PercentageSampler {
    /// Creates a sampler keeping `rate` of all traces, with `rate` in `[0, 1]`.
    pub fn new(rate: f64) -> Result<PercentageSampler> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(Error::InvalidArgument(format!(
                "sampling rate must be between 0 and 1, found {}", rate
            )));
        }
        Ok(PercentageSampler { rate })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Sampler for PercentageSampler {
    fn decide(&self) -> bool {
        rand::thread_rng().gen_bool(self.rate)
    }
}
