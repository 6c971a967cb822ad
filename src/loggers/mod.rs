mod channel;
mod file;
mod null;

pub use self::channel::ChannelLogger;
pub use self::channel::SpanBatchReceiver;
pub use self::channel::SpanBatchSender;
pub use self::file::FileLogger;
pub use self::null::NullLogger;
