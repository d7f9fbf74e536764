//! Asynchronous find-as-you-type search.
//!
//! Queries go through a bounded queue to a single worker thread that owns
//! store access. Before each store call the worker drains the queue and keeps
//! only the newest query, so a burst of keystrokes costs one store round trip
//! and stale queries are never executed. Results come back on a second
//! bounded queue as [`SearchOutcome`] values; with one query in flight at a
//! time, arrival order is submission order.

use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError, bounded, never};
use sqish_store::HistoryStore;
use sqish_types::{Query, Record, SqishError, SqishResult};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, warn};

/// Default capacity of the query and result queues.
pub const DEFAULT_QUEUE_CAPACITY: usize = 128;

/// Records returned for one query, tagged with that query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    pub query: Query,
    pub records: Vec<Record>,
}

/// What the worker reports for each executed query. A store failure is
/// reported once and ends the worker.
pub type SearchOutcome = SqishResult<ResultSet>;

pub struct SearchPipeline {
    queries: Option<Sender<Query>>,
    /// Second handle on the query queue, used to evict the oldest pending
    /// query when the queue is full.
    overflow: Receiver<Query>,
    results: Receiver<SearchOutcome>,
    worker: Option<JoinHandle<()>>,
}

impl SearchPipeline {
    /// Start the worker thread. `store` is moved onto it.
    pub fn spawn<S>(store: S, capacity: usize) -> SqishResult<Self>
    where
        S: HistoryStore + Send + 'static,
    {
        let capacity = capacity.max(1);
        let (query_tx, query_rx) = bounded::<Query>(capacity);
        let (result_tx, result_rx) = bounded::<SearchOutcome>(capacity);

        let overflow = query_rx.clone();
        let worker = thread::Builder::new()
            .name("sqish-search".to_string())
            .spawn(move || search_worker(store, query_rx, result_tx))?;

        Ok(SearchPipeline {
            queries: Some(query_tx),
            overflow,
            results: result_rx,
            worker: Some(worker),
        })
    }

    /// Queue `query` without blocking. When the queue is full the oldest
    /// pending query is dropped; it would have been superseded anyway.
    pub fn submit(&self, query: Query) -> SqishResult<()> {
        let sender = self.queries.as_ref().ok_or(SqishError::PipelineClosed)?;
        let mut pending = query;
        loop {
            match sender.try_send(pending) {
                Ok(()) => return Ok(()),
                Err(TrySendError::Full(query)) => {
                    if let Ok(dropped) = self.overflow.try_recv() {
                        debug!("query queue full, dropped {:?}", dropped.text);
                    }
                    pending = query;
                }
                Err(TrySendError::Disconnected(_)) => return Err(SqishError::PipelineClosed),
            }
        }
    }

    /// Completed searches, in arrival order.
    pub fn results(&self) -> &Receiver<SearchOutcome> {
        &self.results
    }

    /// Close both queues and wait for the worker to finish its current
    /// store call. Dropping the result receiver unblocks a worker stuck on a
    /// full result queue.
    pub fn shutdown(mut self) {
        self.close();
        drop(std::mem::replace(&mut self.results, never()));
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            error!("search worker panicked");
        }
    }

    fn close(&mut self) {
        self.queries.take();
    }
}

impl Drop for SearchPipeline {
    fn drop(&mut self) {
        // Detach rather than join: a slow store call may still be running
        // and the process is usually about to exit.
        self.close();
    }
}

/// Take everything currently queued and return the newest, or `first` when
/// nothing else is waiting.
pub fn drain_latest<T>(queue: &Receiver<T>, first: T) -> (T, usize) {
    let mut latest = first;
    let mut superseded = 0;
    loop {
        match queue.try_recv() {
            Ok(next) => {
                latest = next;
                superseded += 1;
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
        }
    }
    (latest, superseded)
}

fn search_worker<S: HistoryStore>(
    store: S,
    queries: Receiver<Query>,
    results: Sender<SearchOutcome>,
) {
    while let Ok(first) = queries.recv() {
        let (query, superseded) = drain_latest(&queries, first);
        debug!(
            "executing query {:?} ({} superseded)",
            query.text, superseded
        );

        match store.query(&query) {
            Ok(records) => {
                if results.send(Ok(ResultSet { query, records })).is_err() {
                    break;
                }
            }
            Err(err) => {
                warn!("history query failed: {err:#}");
                let _ = results.send(Err(SqishError::Store(err)));
                break;
            }
        }
    }
    debug!("search worker stopped");
}
