use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use std::thread;
use std::thread::Builder;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use log::error;
use log::info;

use super::super::Result;
use super::super::SpanRecord;
use super::super::loggers::SpanBatchReceiver;


const STOP_DELAY_SEC_DEFAULT: u64 = 2;
const RECV_TIMEOUT_MSEC_DEFAULT: u64 = 50;


/// A span batch reporter backed by a background thread.
///
/// The reporter spawns a thread that waits for batches sent by a `ChannelLogger`.
/// Every time a batch is received the `ReporterFn` closure is called with it.
/// The closure is responsible for shipping the spans to a Zipkin collector.
///
/// When `ReporterThread::stop` is called or an instance is dropped:
///
///   1. The calling thread is paused for the `stop_delay` duration
///      so batches still in the channel can be processed.
///   2. The background thread is told to shut down and the calling thread joins it.
///   3. Batches still queued at that point are reported before the thread exits.
///
/// The thread also exits once every `ChannelLogger` sending to it is dropped.
pub struct ReporterThread {
    stop_delay: Duration,
    stopping: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl ReporterThread {
    /// Creates a new reporter waiting for span batches on the `receiver`.
    pub fn new<ReporterFn>(receiver: SpanBatchReceiver, mut reporter: ReporterFn) -> Result<ReporterThread>
        where ReporterFn: FnMut(Vec<SpanRecord>) + Send + 'static
    {
        let stopping = Arc::new(AtomicBool::new(false));
        let inner_stopping = Arc::clone(&stopping);

        let thread = Builder::new().name("ZipkinReporter".into()).spawn(move || {
            loop {
                if inner_stopping.load(Ordering::Relaxed) {
                    let mut drained = 0;
                    for spans in receiver.try_iter() {
                        reporter(spans);
                        drained += 1;
                    }
                    info!("Reporter stopping after draining {} queued batches", drained);
                    break;
                }
                let timeout = Duration::from_millis(RECV_TIMEOUT_MSEC_DEFAULT);
                match receiver.recv_timeout(timeout) {
                    Ok(spans) => reporter(spans),
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => {
                        info!("All span senders are gone, reporter exiting");
                        break;
                    }
                }
            }
        })?;

        Ok(ReporterThread {
            stop_delay: Duration::from_secs(STOP_DELAY_SEC_DEFAULT),
            stopping,
            thread_handle: Some(thread),
        })
    }

    /// Version of `new` that also sets the `stop_delay`.
    pub fn new_with_duration<ReporterFn>(
        receiver: SpanBatchReceiver, stop_delay: Duration, reporter: ReporterFn
    ) -> Result<ReporterThread>
        where ReporterFn: FnMut(Vec<SpanRecord>) + Send + 'static
    {
        let mut reporter = ReporterThread::new(receiver, reporter)?;
        reporter.stop_delay(stop_delay);
        Ok(reporter)
    }

    /// Updates the `stop_delay` for when the thread is stopped.
    pub fn stop_delay(&mut self, stop_delay: Duration) {
        self.stop_delay = stop_delay;
    }

    /// Stops the background thread and joins it.
    pub fn stop(&mut self) {
        if let Some(thread) = self.thread_handle.take() {
            thread::sleep(self.stop_delay);
            self.stopping.store(true, Ordering::Relaxed);
            if thread.join().is_err() {
                error!("Zipkin reporter thread panicked");
            }
        }
    }
}

impl Drop for ReporterThread {
    fn drop(&mut self) {
        self.stop()
    }
}
