//! Debounced live search for one connected client.
//!
//! Every keystroke re-filters the last fetched catalog immediately. Fetches
//! happen once on start, after the keystrokes go quiet for the debounce
//! period, and on every matching change notice. A newer fetch aborts the one
//! in flight, so a slow stale response can never replace a newer catalog.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use crate::domain::repository::CatalogPort;
use crate::domain::types::SearchView;
use crate::usecase::feed::{Notice, Subscription};
use crate::usecase::search::{SearchAggregator, SearchCatalog};

const FRAME_BUFFER: usize = 32;

/// One pushed view, tagged with the fetch generation it was filtered from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveFrame {
    pub generation: u64,
    #[serde(flatten)]
    pub view: SearchView,
}

#[derive(Clone)]
pub struct LiveSearch<C> {
    pub aggregator: SearchAggregator<C>,
    pub debounce: Duration,
}

impl<C: CatalogPort + Clone> LiveSearch<C> {
    /// Start the session task. It stops, aborting any fetch in flight, once
    /// the returned handle is dropped.
    pub fn spawn(self, changes: Subscription) -> LiveSession {
        let (keys_tx, keys_rx) = watch::channel(String::new());
        let (frames_tx, frames_rx) = mpsc::channel(FRAME_BUFFER);
        tokio::spawn(self.run(keys_rx, changes, frames_tx));
        LiveSession {
            keys: keys_tx,
            frames: frames_rx,
        }
    }

    async fn run(
        self,
        mut keys: watch::Receiver<String>,
        mut changes: Subscription,
        frames: mpsc::Sender<LiveFrame>,
    ) {
        let mut query = String::new();
        let mut current: Option<(u64, SearchCatalog)> = None;
        let mut generation = 0u64;
        let mut in_flight = None;
        let mut deadline: Option<Instant> = None;
        let mut feed_open = true;

        self.refetch(&mut generation, &mut in_flight);

        loop {
            tokio::select! {
                changed = keys.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    query = keys.borrow_and_update().clone();
                    deadline = Some(Instant::now() + self.debounce);
                    if let Some((shown, catalog)) = &current {
                        let frame = LiveFrame { generation: *shown, view: catalog.view(&query) };
                        if frames.send(frame).await.is_err() {
                            break;
                        }
                    }
                }
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    deadline = None;
                    self.refetch(&mut generation, &mut in_flight);
                }
                joined = join_in_flight(&mut in_flight) => {
                    in_flight = None;
                    match joined {
                        Ok(catalog) => {
                            let frame = LiveFrame { generation, view: catalog.view(&query) };
                            current = Some((generation, catalog));
                            if frames.send(frame).await.is_err() {
                                break;
                            }
                        }
                        Err(e) if e.is_cancelled() => {}
                        Err(e) => warn!(generation, error = %e, "search fetch task failed"),
                    }
                }
                notice = changes.next(), if feed_open => match notice {
                    Some(Notice::Changed(event)) => {
                        debug!(table = %event.table, "listing changed, re-fetching");
                        self.refetch(&mut generation, &mut in_flight);
                    }
                    Some(Notice::Missed(missed)) => {
                        warn!(missed, "change feed lagged, re-fetching");
                        self.refetch(&mut generation, &mut in_flight);
                    }
                    None => feed_open = false,
                },
            }
        }

        if let Some(stale) = in_flight {
            stale.abort();
        }
    }

    fn refetch(&self, generation: &mut u64, in_flight: &mut Option<JoinHandle<SearchCatalog>>) {
        if let Some(stale) = in_flight.take() {
            stale.abort();
        }
        *generation += 1;
        let aggregator = self.aggregator.clone();
        *in_flight = Some(tokio::spawn(async move { aggregator.fetch().await }));
    }
}

async fn join_in_flight(
    in_flight: &mut Option<JoinHandle<SearchCatalog>>,
) -> Result<SearchCatalog, JoinError> {
    match in_flight {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

/// Client side of a running live search.
pub struct LiveSession {
    keys: watch::Sender<String>,
    frames: mpsc::Receiver<LiveFrame>,
}

impl LiveSession {
    /// Replace the query with the full text of the search box.
    pub fn keystroke(&self, query: impl Into<String>) {
        self.keys.send_replace(query.into());
    }

    pub async fn next_frame(&mut self) -> Option<LiveFrame> {
        self.frames.recv().await
    }
}
