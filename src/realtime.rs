// src/realtime.rs
//! In-process row-change feed.
//!
//! Writers publish a [`ChangeEvent`] after each committed insert, update or
//! delete. Readers subscribe with one or more [`ChangeFilter`]s (table plus an
//! optional equality predicate on a key column) and only see matching events.

use serde::Serialize;
use std::collections::BTreeMap;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Jobs,
    CompanySwipes,
    CandidateSwipes,
    Conversations,
    Messages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
    /// Columns a subscriber may filter on, with their values.
    pub keys: BTreeMap<&'static str, i64>,
    /// The row after the change (before it, for deletes).
    pub row: serde_json::Value,
}

impl ChangeEvent {
    pub fn new<T: Serialize>(table: Table, kind: ChangeKind, row: &T) -> Self {
        let row = serde_json::to_value(row).unwrap_or_else(|e| {
            warn!("Failed to serialize {:?} row for change feed: {}", table, e);
            serde_json::Value::Null
        });
        Self {
            table,
            kind,
            keys: BTreeMap::new(),
            row,
        }
    }

    pub fn key(mut self, column: &'static str, value: i64) -> Self {
        self.keys.insert(column, value);
        self
    }
}

/// Which events a subscriber wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeFilter {
    table: Table,
    kind: Option<ChangeKind>,
    eq: Option<(&'static str, i64)>,
}

impl ChangeFilter {
    pub fn table(table: Table) -> Self {
        Self {
            table,
            kind: None,
            eq: None,
        }
    }

    pub fn kind(mut self, kind: ChangeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn eq(mut self, column: &'static str, value: i64) -> Self {
        self.eq = Some((column, value));
        self
    }

    pub fn matches(&self, event: &ChangeEvent) -> bool {
        if event.table != self.table {
            return false;
        }
        if matches!(self.kind, Some(kind) if kind != event.kind) {
            return false;
        }
        match self.eq {
            Some((column, value)) => event.keys.get(column) == Some(&value),
            None => true,
        }
    }
}

/// Cloneable handle to the feed. All clones share one channel.
#[derive(Clone, Debug)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event. No-op if nobody is listening.
    pub fn publish(&self, event: ChangeEvent) {
        let table = event.table;
        let kind = event.kind;
        match self.sender.send(event) {
            Ok(receivers) => debug!(
                "{:?} {:?} delivered to {} subscriber(s)",
                table, kind, receivers
            ),
            Err(_) => debug!("{:?} {:?} published with no subscribers", table, kind),
        }
    }

    /// Subscribe to every event matching at least one of `filters`.
    pub fn subscribe<I>(&self, filters: I) -> Subscription
    where
        I: IntoIterator<Item = ChangeFilter>,
    {
        Subscription {
            receiver: self.sender.subscribe(),
            filters: filters.into_iter().collect(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Subscription {
    receiver: broadcast::Receiver<ChangeEvent>,
    filters: Vec<ChangeFilter>,
}

impl Subscription {
    /// Wait for the next matching event. `None` once the feed is gone.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filters.iter().any(|f| f.matches(&event)) => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(missed)) => {
                    warn!("Change feed subscriber lagged, {} event(s) skipped", missed);
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
