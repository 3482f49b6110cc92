//! In-process fan-out of row change events.
//!
//! The webhook handler publishes; every live search session holds a
//! [`Subscription`] filtered to the tables it renders. Dropping the
//! subscription unsubscribes.

use tokio::sync::broadcast::{self, error::RecvError};

use bazaar_domain::entity::ServiceType;

use crate::domain::types::ChangeEvent;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Deliver an event to every subscriber. Returns how many received it.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self, tables: &[ServiceType]) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
            tables: tables.to_vec(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// What a subscriber learns from the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Changed(ChangeEvent),
    /// The subscriber fell behind and `n` events were dropped. Any of them may
    /// have matched, so treat it as a change.
    Missed(u64),
}

pub struct Subscription {
    rx: broadcast::Receiver<ChangeEvent>,
    tables: Vec<ServiceType>,
}

impl Subscription {
    /// Wait for the next event on a subscribed table. `None` once the feed is gone.
    ///
    /// Cancel safe: events skipped by the filter are never of interest.
    pub async fn next(&mut self) -> Option<Notice> {
        loop {
            match self.rx.recv().await {
                Ok(event) => {
                    if event
                        .service_type()
                        .is_some_and(|service| self.tables.contains(&service))
                    {
                        return Some(Notice::Changed(event));
                    }
                }
                Err(RecvError::Lagged(n)) => return Some(Notice::Missed(n)),
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
