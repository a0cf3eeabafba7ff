//! Long-poll consumer for the `_changes` feed.
//!
//! [`ChangesFeed`] runs a single self-looping poll task: issue a blocking
//! `feed=longpoll&since={cursor}` request, publish the returned batch to every
//! subscriber, advance the cursor to the server-reported `last_seq`, and poll
//! again after a short delay. Poll n+1 is only issued from within poll n's
//! completion, so polls never overlap.

use crate::database::Database;
use crate::types::ChangesResponse;
use futures::Stream;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::Mutex;

type Subscribers = Arc<Mutex<Vec<async_channel::Sender<ChangesResponse>>>>;

/// Handle to a change-feed poll task. Created stopped; call [`start`] to
/// begin polling and [`stop`] to end it deterministically.
///
/// [`start`]: ChangesFeed::start
/// [`stop`]: ChangesFeed::stop
pub struct ChangesFeed {
    database: Database,
    cursor: Arc<AtomicU64>,
    subscribers: Subscribers,
    stop_tx: async_channel::Sender<()>,
    stop_rx: async_channel::Receiver<()>,
    task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl ChangesFeed {
    pub(crate) fn new(database: Database, since: u64) -> Self {
        let (stop_tx, stop_rx) = async_channel::bounded(1);
        ChangesFeed {
            database,
            cursor: Arc::new(AtomicU64::new(since)),
            subscribers: Arc::new(Mutex::new(Vec::new())),
            stop_tx,
            stop_rx,
            task: Mutex::new(None),
        }
    }

    /// Register a subscriber. Every batch is delivered to all subscribers
    /// registered at the time it arrives, so subscribe before [`start`] to
    /// see the feed from its beginning.
    ///
    /// [`start`]: ChangesFeed::start
    pub async fn subscribe(&self) -> ChangesSubscription {
        let (tx, rx) = async_channel::unbounded();
        self.subscribers.lock().await.push(tx);
        ChangesSubscription { receiver: rx }
    }

    /// The sequence the next poll will ask for.
    pub fn last_seq(&self) -> u64 {
        self.cursor.load(Ordering::SeqCst)
    }

    pub async fn is_running(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }

    /// Spawn the poll loop. A no-op when the loop is already running; after
    /// [`stop`] the feed may be started again and resumes from the cursor.
    ///
    /// [`stop`]: ChangesFeed::stop
    pub async fn start(&self) {
        let mut task = self.task.lock().await;
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            return;
        }
        // Discard any stop signal left over from a previous run.
        while self.stop_rx.try_recv().is_ok() {}

        let database = self.database.clone();
        let cursor = self.cursor.clone();
        let subscribers = self.subscribers.clone();
        let stop_rx = self.stop_rx.clone();
        let poll_delay = Duration::from_millis(database.client().config().poll_delay_ms);

        *task = Some(tokio::spawn(async move {
            loop {
                let since = cursor.load(Ordering::SeqCst);
                let batch = tokio::select! {
                    result = database.poll_changes(since) => match result {
                        Ok(batch) => batch,
                        Err(e) => {
                            tracing::warn!("changes poll at seq {} failed: {}", since, e);
                            break;
                        }
                    },
                    _ = stop_rx.recv() => break,
                };

                let last_seq = batch.last_seq;
                {
                    let mut subs = subscribers.lock().await;
                    subs.retain(|tx| !tx.is_closed());
                    for tx in subs.iter() {
                        let _ = tx.send(batch.clone()).await;
                    }
                }
                cursor.store(last_seq, Ordering::SeqCst);

                tokio::select! {
                    _ = tokio::time::sleep(poll_delay) => {}
                    _ = stop_rx.recv() => break,
                }
            }
            // Dropping the senders ends every subscription stream.
            subscribers.lock().await.clear();
        }));
    }

    /// Stop the loop and wait for the task to finish. Subscriptions observe
    /// end-of-stream once any already-delivered batches are drained.
    pub async fn stop(&self) {
        let _ = self.stop_tx.try_send(());
        if let Some(handle) = self.task.lock().await.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ChangesFeed {
    fn drop(&mut self) {
        if let Some(handle) = self.task.get_mut().take() {
            handle.abort();
        }
    }
}

/// A subscriber's view of the feed: one [`ChangesResponse`] per successful
/// poll, ending when the feed stops or a poll fails.
pub struct ChangesSubscription {
    receiver: async_channel::Receiver<ChangesResponse>,
}

impl ChangesSubscription {
    /// The next batch, or `None` once the feed has stopped.
    pub async fn next(&mut self) -> Option<ChangesResponse> {
        self.receiver.recv().await.ok()
    }
}

impl Stream for ChangesSubscription {
    type Item = ChangesResponse;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_next(cx)
    }
}
