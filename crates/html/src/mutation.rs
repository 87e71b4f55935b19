//! Subtree mutation observation.
//!
//! Every structural change to a [`Document`](crate::Document) produces one
//! [`MutationRecord`] that is delivered to each observer whose root is an
//! inclusive ancestor of the record's target.
//!
//! Invariants:
//! - Records are delivered in the order the mutations happened.
//! - `added` keys were live at the time the record was produced; they may be
//!   gone by the time the record is consumed.
//! - Delivery never blocks: each observer owns a bounded queue. When the
//!   queue is full the record is dropped and the observer is flagged as
//!   overflowed until the flag is taken.
//! - An observer whose receiver was dropped is unregistered on the next
//!   delivery attempt.

use crate::types::NodeKey;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u32);

/// One child-list change on `target`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodeKey,
    pub added: Vec<NodeKey>,
    pub removed: Vec<NodeKey>,
}

impl MutationRecord {
    pub fn added(target: NodeKey, added: Vec<NodeKey>) -> Self {
        Self {
            target,
            added,
            removed: Vec::new(),
        }
    }

    pub fn removed(target: NodeKey, removed: Vec<NodeKey>) -> Self {
        Self {
            target,
            added: Vec::new(),
            removed,
        }
    }
}

struct ObserverEntry {
    id: ObserverId,
    root: NodeKey,
    tx: SyncSender<MutationRecord>,
    overflowed: bool,
}

#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: u32,
    entries: Vec<ObserverEntry>,
}

impl ObserverRegistry {
    pub(crate) fn register(
        &mut self,
        root: NodeKey,
        capacity: usize,
    ) -> (ObserverId, Receiver<MutationRecord>) {
        self.next_id = self.next_id.wrapping_add(1);
        let id = ObserverId(self.next_id);
        let (tx, rx) = mpsc::sync_channel(capacity.max(1));
        self.entries.push(ObserverEntry {
            id,
            root,
            tx,
            overflowed: false,
        });
        (id, rx)
    }

    pub(crate) fn unregister(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        before != self.entries.len()
    }

    pub(crate) fn is_registered(&self, id: ObserverId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub(crate) fn take_overflow(&mut self, id: ObserverId) -> bool {
        self.entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .map(|entry| std::mem::take(&mut entry.overflowed))
            .unwrap_or(false)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deliver `record` to every observer whose root `covers` the target.
    pub(crate) fn notify(&mut self, record: &MutationRecord, covers: impl Fn(NodeKey) -> bool) {
        self.entries.retain_mut(|entry| {
            if !covers(entry.root) {
                return true;
            }
            match entry.tx.try_send(record.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    if !entry.overflowed {
                        log::debug!(
                            target: "html.mutation",
                            "observer {:?} queue full; dropping records",
                            entry.id
                        );
                    }
                    entry.overflowed = true;
                    true
                }
                Err(TrySendError::Disconnected(_)) => {
                    log::trace!(
                        target: "html.mutation",
                        "observer {:?} receiver dropped; unregistering",
                        entry.id
                    );
                    false
                }
            }
        });
    }
}
