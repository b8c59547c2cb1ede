//! Serial worker thread with a periodic timer.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, never, select, tick, unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, error, trace};

use crate::{SchedulerError, SchedulerResult};

/// State owned by the worker thread.
pub trait Worker: Send + 'static {
    type Item: Send + 'static;

    /// Process one work item.
    fn handle(&mut self, item: Self::Item);

    /// The periodic timer fired.
    fn tick(&mut self);

    /// The periodic timer was cancelled.
    fn timer_cancelled(&mut self) {}
}

/// A message to the worker thread.
enum Envelope<I> {
    Work(I),
    ArmTimer(Duration),
    DisarmTimer,
    Barrier(Sender<()>),
    Shutdown,
}

/// Handle to a serial worker thread.
///
/// Work items run one at a time, in the order they were dispatched. Timer
/// ticks are interleaved between items, never during one.
pub struct Scheduler<I: Send + 'static> {
    name: String,
    tx: Sender<Envelope<I>>,
    timer_armed: Arc<AtomicBool>,
    /// Work items dispatched and not yet finished.
    in_flight: Arc<AtomicUsize>,
    closed: AtomicBool,
    worker_id: ThreadId,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl<I: Send + 'static> Scheduler<I> {
    /// Start `worker` on a new thread called `name`.
    pub fn spawn<W>(name: impl Into<String>, worker: W) -> SchedulerResult<Self>
    where
        W: Worker<Item = I>,
    {
        let name = name.into();
        let (tx, rx) = unbounded();
        let timer_armed = Arc::new(AtomicBool::new(false));
        let in_flight = Arc::new(AtomicUsize::new(0));

        let handle = {
            let name = name.clone();
            let timer_armed = Arc::clone(&timer_armed);
            let in_flight = Arc::clone(&in_flight);
            thread::Builder::new()
                .name(name.clone())
                .spawn(move || run(name, worker, rx, timer_armed, in_flight))?
        };

        debug!(worker = %name, "Worker started");

        Ok(Self {
            name,
            tx,
            timer_armed,
            in_flight,
            closed: AtomicBool::new(false),
            worker_id: handle.thread().id(),
            handle: Mutex::new(Some(handle)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queue a work item.
    pub fn dispatch(&self, item: I) -> SchedulerResult<()> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let sent = self.send(Envelope::Work(item));
        if sent.is_err() {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
        sent
    }

    /// Start the periodic timer. Re-arming with the same interval keeps the
    /// current schedule.
    pub fn arm_timer(&self, interval: Duration) -> SchedulerResult<()> {
        self.send(Envelope::ArmTimer(interval))
    }

    /// Stop the periodic timer.
    pub fn cancel_timer(&self) -> SchedulerResult<()> {
        self.send(Envelope::DisarmTimer)
    }

    /// Whether the worker currently has a timer scheduled.
    ///
    /// Reflects arm/cancel requests the worker has already processed.
    pub fn timer_armed(&self) -> bool {
        self.timer_armed.load(Ordering::SeqCst)
    }

    /// Block until everything queued before this call has been processed.
    ///
    /// Returns immediately when called from the worker thread itself.
    pub fn flush(&self) -> SchedulerResult<()> {
        if self.on_worker_thread() {
            return Ok(());
        }
        let (ack_tx, ack_rx) = bounded(1);
        self.send(Envelope::Barrier(ack_tx))?;
        ack_rx.recv().map_err(|_| SchedulerError::Closed)
    }

    /// Like [`flush`](Self::flush), but also waits for work that processed
    /// items queued in turn.
    ///
    /// An item dispatched while another runs is counted before the running
    /// one finishes, so the in-flight count only reaches zero once the
    /// whole chain is done.
    pub fn settle(&self) -> SchedulerResult<()> {
        if self.on_worker_thread() {
            return Ok(());
        }
        loop {
            self.flush()?;
            if self.in_flight.load(Ordering::SeqCst) == 0 {
                return Ok(());
            }
        }
    }

    /// Stop accepting work, let queued work finish and join the thread.
    pub fn shutdown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.tx.send(Envelope::Shutdown);

        if self.on_worker_thread() {
            return;
        }
        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!(worker = %self.name, "Worker thread panicked");
            }
        }
        debug!(worker = %self.name, "Worker stopped");
    }

    fn send(&self, envelope: Envelope<I>) -> SchedulerResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SchedulerError::Closed);
        }
        self.tx.send(envelope).map_err(|_| SchedulerError::Closed)
    }

    fn on_worker_thread(&self) -> bool {
        thread::current().id() == self.worker_id
    }
}

impl<I: Send + 'static> Drop for Scheduler<I> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The worker loop.
fn run<W: Worker>(
    name: String,
    mut worker: W,
    rx: Receiver<Envelope<W::Item>>,
    timer_armed: Arc<AtomicBool>,
    in_flight: Arc<AtomicUsize>,
) {
    let mut ticks: Receiver<Instant> = never();
    let mut interval: Option<Duration> = None;

    loop {
        select! {
            recv(rx) -> msg => match msg {
                Ok(Envelope::Work(item)) => {
                    trace!(worker = %name, "Running work item");
                    guarded(&name, || worker.handle(item));
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                }
                Ok(Envelope::ArmTimer(every)) => {
                    if interval != Some(every) {
                        ticks = tick(every);
                        interval = Some(every);
                        timer_armed.store(true, Ordering::SeqCst);
                        debug!(worker = %name, interval_ms = every.as_millis() as u64, "Timer armed");
                    }
                }
                Ok(Envelope::DisarmTimer) => {
                    if interval.take().is_some() {
                        ticks = never();
                        timer_armed.store(false, Ordering::SeqCst);
                        debug!(worker = %name, "Timer cancelled");
                        guarded(&name, || worker.timer_cancelled());
                    }
                }
                Ok(Envelope::Barrier(ack)) => {
                    let _ = ack.send(());
                }
                Ok(Envelope::Shutdown) | Err(_) => break,
            },
            recv(ticks) -> _ => {
                trace!(worker = %name, "Timer tick");
                guarded(&name, || worker.tick());
            }
        }
    }

    timer_armed.store(false, Ordering::SeqCst);
}

/// Run `f`, logging instead of unwinding out of the worker loop.
fn guarded(name: &str, f: impl FnOnce()) {
    if panic::catch_unwind(AssertUnwindSafe(f)).is_err() {
        error!(worker = %name, "Work item panicked");
    }
}
