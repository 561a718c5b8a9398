//! Debounced query channel between rapid criteria edits and the filter engine.
//!
//! Every keystroke or selection change produces a new [`FilterCriteria`].
//! Recomputing the filtered list on each one is wasteful, so updates pass
//! through a [`Debouncer`]. Updates are compared in normalized form (search
//! lowercased and trimmed), so one equal to the last emitted criteria is
//! dropped. Otherwise the latest update is emitted, trimmed but with its case
//! kept for exact id lookups, once no further input has arrived for the quiet
//! window.
//!
//! [`Debouncer`] is a plain state machine driven by caller-supplied instants.
//! [`QueryChannel`] runs one on a worker thread; with the `async` feature,
//! [`spawn_query_channel`] runs one on a tokio task.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::error::{PriceError, Result};
use crate::filter::FilterCriteria;

// ---------------------------------------------------------------------------
// Debouncer
// ---------------------------------------------------------------------------

/// Coalesces bursts of criteria updates into single emissions.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<(FilterCriteria, Instant)>,
    last_emitted: Option<FilterCriteria>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last_emitted: None,
        }
    }

    /// Start from criteria the view already shows, so re-entering them emits nothing.
    pub fn with_initial(quiet: Duration, initial: &FilterCriteria) -> Self {
        Self {
            quiet,
            pending: None,
            last_emitted: Some(initial.trimmed()),
        }
    }

    /// Record an update received at `now`, restarting the quiet window.
    ///
    /// An update equal to the last emitted criteria cancels anything pending.
    pub fn push(&mut self, criteria: &FilterCriteria, now: Instant) {
        if self.last_emitted.as_ref().is_some_and(|last| last.same_query(criteria)) {
            trace!("criteria unchanged since last emission");
            self.pending = None;
            return;
        }
        self.pending = Some((criteria.trimmed(), now + self.quiet));
    }

    /// When the pending update becomes due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    /// Emit the pending update if its quiet window has elapsed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<FilterCriteria> {
        if now < self.deadline()? {
            return None;
        }
        let (criteria, _) = self.pending.take()?;
        self.last_emitted = Some(criteria.clone());
        Some(criteria)
    }

    pub fn last_emitted(&self) -> Option<&FilterCriteria> {
        self.last_emitted.as_ref()
    }

    /// Drop the pending update without emitting it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

// ---------------------------------------------------------------------------
// QueryChannel
// ---------------------------------------------------------------------------

/// A [`Debouncer`] running on its own thread.
///
/// Send raw updates with [`send`](Self::send), receive coalesced ones with
/// [`recv_timeout`](Self::recv_timeout) or [`try_recv`](Self::try_recv).
/// Dropping the channel stops the worker; an update still inside its quiet
/// window is discarded.
pub struct QueryChannel {
    inbox: Option<mpsc::Sender<FilterCriteria>>,
    outbox: mpsc::Receiver<FilterCriteria>,
    worker: Option<JoinHandle<()>>,
}

impl QueryChannel {
    pub fn new(quiet: Duration) -> Self {
        Self::start(Debouncer::new(quiet))
    }

    pub fn with_initial(quiet: Duration, initial: &FilterCriteria) -> Self {
        Self::start(Debouncer::with_initial(quiet, initial))
    }

    fn start(debouncer: Debouncer) -> Self {
        let (in_tx, in_rx) = mpsc::channel();
        let (out_tx, out_rx) = mpsc::channel();
        let worker = std::thread::spawn(move || run_worker(debouncer, in_rx, out_tx));
        Self {
            inbox: Some(in_tx),
            outbox: out_rx,
            worker: Some(worker),
        }
    }

    /// Submit a raw update.
    pub fn send(&self, criteria: FilterCriteria) -> Result<()> {
        self.inbox
            .as_ref()
            .and_then(|tx| tx.send(criteria).ok())
            .ok_or_else(|| PriceError::InvalidArgument("query channel is closed".into()))
    }

    /// Wait up to `timeout` for the next coalesced update.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FilterCriteria> {
        self.outbox.recv_timeout(timeout).ok()
    }

    /// Take a coalesced update if one is ready.
    pub fn try_recv(&self) -> Option<FilterCriteria> {
        self.outbox.try_recv().ok()
    }

    /// Stop the worker and wait for it to exit.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.inbox = None;
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for QueryChannel {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(
    mut debouncer: Debouncer,
    inbox: mpsc::Receiver<FilterCriteria>,
    outbox: mpsc::Sender<FilterCriteria>,
) {
    loop {
        let received = match debouncer.deadline() {
            Some(due) => {
                let now = Instant::now();
                if due <= now {
                    if let Some(criteria) = debouncer.poll(now) {
                        debug!(search = criteria.search_text(), "emitting debounced criteria");
                        if outbox.send(criteria).is_err() {
                            break;
                        }
                    }
                    continue;
                }
                inbox.recv_timeout(due - now)
            }
            None => inbox.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(criteria) => debouncer.push(&criteria, Instant::now()),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    trace!("query channel worker stopped");
}

// ---------------------------------------------------------------------------
// Async channel
// ---------------------------------------------------------------------------

/// Handle to a [`Debouncer`] running on a tokio task.
///
/// Dropping the handle aborts the task.
#[cfg(feature = "async")]
pub struct AsyncQueryChannel {
    pub sender: tokio::sync::mpsc::UnboundedSender<FilterCriteria>,
    pub receiver: tokio::sync::mpsc::UnboundedReceiver<FilterCriteria>,
    task: tokio::task::JoinHandle<()>,
}

#[cfg(feature = "async")]
impl Drop for AsyncQueryChannel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn a debouncer on the current tokio runtime.
#[cfg(feature = "async")]
pub fn spawn_query_channel(quiet: Duration, initial: Option<&FilterCriteria>) -> AsyncQueryChannel {
    use tokio::sync::mpsc::unbounded_channel;
    use tokio::time::{sleep_until, Instant as TokioInstant};

    let mut debouncer = match initial {
        Some(c) => Debouncer::with_initial(quiet, c),
        None => Debouncer::new(quiet),
    };
    let (in_tx, mut in_rx) = unbounded_channel::<FilterCriteria>();
    let (out_tx, out_rx) = unbounded_channel::<FilterCriteria>();

    let task = tokio::spawn(async move {
        loop {
            let deadline = debouncer.deadline();
            tokio::select! {
                maybe = in_rx.recv() => {
                    let Some(criteria) = maybe else { break; };
                    debouncer.push(&criteria, TokioInstant::now().into_std());
                }
                _ = async {
                    if let Some(due) = deadline {
                        sleep_until(TokioInstant::from_std(due)).await;
                    }
                }, if deadline.is_some() => {
                    if let Some(criteria) = debouncer.poll(TokioInstant::now().into_std()) {
                        debug!(search = criteria.search_text(), "emitting debounced criteria");
                        if out_tx.send(criteria).is_err() {
                            break;
                        }
                    }
                }
            }
        }
    });

    AsyncQueryChannel {
        sender: in_tx,
        receiver: out_rx,
        task,
    }
}
