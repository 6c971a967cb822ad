use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use crossbeam_channel::unbounded;

use super::super::Logger;
use super::super::Result;
use super::super::SpanRecord;


/// Type alias for a `crossbeam_channel::Receiver` of span batches.
pub type SpanBatchReceiver = Receiver<Vec<SpanRecord>>;

/// Type alias for a `crossbeam_channel::Sender` of span batches.
pub type SpanBatchSender = Sender<Vec<SpanRecord>>;


/// A `Logger` that hands every trace to a channel.
///
/// The receiving end, returned by `ChannelLogger::new`, gets one batch of
/// span records per sampled trace. `utils::ReporterThread` can drain it from
/// a background thread.
#[derive(Clone, Debug)]
pub struct ChannelLogger {
    sender: SpanBatchSender,
}

impl ChannelLogger {
    /// Creates a logger backed by a new `crossbeam_channel::unbounded` channel.
    pub fn new() -> (ChannelLogger, SpanBatchReceiver) {
        let (sender, receiver) = unbounded();
        (ChannelLogger { sender }, receiver)
    }

    /// Creates a logger sending to an existing channel.
    pub fn with_sender(sender: SpanBatchSender) -> ChannelLogger {
        ChannelLogger { sender }
    }
}

impl Logger for ChannelLogger {
    fn trace(&mut self, spans: &[SpanRecord]) -> Result<()> {
        self.sender.send(spans.to_vec())?;
        Ok(())
    }
}
