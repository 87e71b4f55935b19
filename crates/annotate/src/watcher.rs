//! Incremental re-annotation driven by subtree insertions.

use crate::annotator::{AnnotateStats, annotate, has_skipped_ancestor};
use core_types::WordSet;
use html::{Document, DomError, MutationRecord, NodeKey, ObserverId};
use std::sync::mpsc::{Receiver, TryRecvError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WatcherConfig {
    /// Bound of the mutation record queue. Records arriving while it is
    /// full are dropped and the next batch is flagged as overflowed.
    pub capacity: usize,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

/// Records drained from the queue in one go, in delivery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MutationBatch {
    pub records: Vec<MutationRecord>,
    /// Some records were dropped; only a full pass over the observed root
    /// is reliable.
    pub overflowed: bool,
}

impl MutationBatch {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && !self.overflowed
    }

    /// Inserted nodes, record by record.
    pub fn added_nodes(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.records.iter().flat_map(|r| r.added.iter().copied())
    }
}

struct Subscription {
    id: ObserverId,
    root: NodeKey,
    rx: Receiver<MutationRecord>,
}

pub struct MutationWatcher {
    config: WatcherConfig,
    subscription: Option<Subscription>,
}

impl MutationWatcher {
    pub fn new(config: WatcherConfig) -> Self {
        Self {
            config,
            subscription: None,
        }
    }

    pub fn config(&self) -> WatcherConfig {
        self.config
    }

    pub fn is_observing(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn root(&self) -> Option<NodeKey> {
        self.subscription.as_ref().map(|s| s.root)
    }

    /// Start watching insertions under `root`. Re-observing the current
    /// root is a no-op; observing another root replaces the subscription.
    pub fn observe(&mut self, doc: &mut Document, root: NodeKey) -> Result<(), DomError> {
        if self.root() == Some(root) {
            return Ok(());
        }
        self.disconnect(doc);
        let (id, rx) = doc.observe(root, self.config.capacity)?;
        log::debug!(
            target: "annotate.watcher",
            "observing {root:?} as {id:?} (capacity {})",
            self.config.capacity
        );
        self.subscription = Some(Subscription { id, root, rx });
        Ok(())
    }

    /// Stop watching and discard pending records. Returns whether a
    /// subscription was active.
    pub fn disconnect(&mut self, doc: &mut Document) -> bool {
        let Some(subscription) = self.subscription.take() else {
            return false;
        };
        doc.unobserve(subscription.id);
        log::debug!(target: "annotate.watcher", "disconnected {:?}", subscription.id);
        true
    }

    /// Take everything currently queued.
    pub fn drain(&mut self, doc: &mut Document) -> MutationBatch {
        let Some(subscription) = &self.subscription else {
            return MutationBatch::default();
        };
        let mut batch = MutationBatch::default();
        loop {
            match subscription.rx.try_recv() {
                Ok(record) => batch.records.push(record),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::debug!(target: "annotate.watcher", "observer {:?} was dropped", subscription.id);
                    break;
                }
            }
        }
        batch.overflowed = doc.take_overflow(subscription.id);
        batch
    }

    /// Annotate what `batch` inserted, or the whole observed root if it
    /// overflowed.
    pub fn process(&self, doc: &mut Document, batch: &MutationBatch, words: &WordSet) -> AnnotateStats {
        let mut stats = AnnotateStats::default();
        if batch.overflowed {
            if let Some(root) = self.root() {
                log::debug!(
                    target: "annotate.watcher",
                    "queue overflowed; re-annotating {root:?}"
                );
                stats.merge(annotate(doc, root, words));
            }
            return stats;
        }
        for key in batch.added_nodes() {
            if has_skipped_ancestor(doc, key) {
                log::trace!(target: "annotate.watcher", "{key:?} was inserted into skipped content");
                continue;
            }
            stats.merge(annotate(doc, key, words));
        }
        stats
    }
}

impl Default for MutationWatcher {
    fn default() -> Self {
        Self::new(WatcherConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotator::STAR_ANCHOR_TAG;
    use core_types::Word;
    use html::NodeSpec;
    use html::traverse::find_elements_by_tag;

    fn apple() -> WordSet {
        [Word::parse("apple").unwrap()].into_iter().collect()
    }

    #[test]
    fn drains_in_delivery_order() {
        let mut doc = Document::new();
        let mut watcher = MutationWatcher::default();
        let body = doc.body();
        watcher.observe(&mut doc, body).unwrap();
        let first = doc.append_fragment(doc.body(), &NodeSpec::paragraph("one")).unwrap();
        let second = doc.append_fragment(doc.body(), &NodeSpec::paragraph("two")).unwrap();
        let batch = watcher.drain(&mut doc);
        assert_eq!(batch.added_nodes().collect::<Vec<_>>(), vec![first, second]);
        assert!(!batch.overflowed);
        assert!(watcher.drain(&mut doc).is_empty());
    }

    #[test]
    fn overflow_reannotates_whole_root() {
        let mut doc = Document::new();
        let mut watcher = MutationWatcher::new(WatcherConfig { capacity: 1 });
        let body = doc.body();
        watcher.observe(&mut doc, body).unwrap();
        for _ in 0..3 {
            doc.append_fragment(doc.body(), &NodeSpec::paragraph("an apple")).unwrap();
        }
        let batch = watcher.drain(&mut doc);
        assert!(batch.overflowed);
        assert_eq!(batch.records.len(), 1);
        let stats = watcher.process(&mut doc, &batch, &apple());
        assert_eq!(stats.anchored, 3);
        assert_eq!(find_elements_by_tag(&doc, doc.body(), STAR_ANCHOR_TAG).len(), 3);
    }

    #[test]
    fn disconnect_is_idempotent_and_stops_delivery() {
        let mut doc = Document::new();
        let mut watcher = MutationWatcher::default();
        let body = doc.body();
        watcher.observe(&mut doc, body).unwrap();
        assert!(watcher.disconnect(&mut doc));
        assert!(!watcher.disconnect(&mut doc));
        doc.append_fragment(doc.body(), &NodeSpec::paragraph("apple")).unwrap();
        assert!(watcher.drain(&mut doc).is_empty());
    }

    #[test]
    fn observing_same_root_twice_keeps_queue() {
        let mut doc = Document::new();
        let mut watcher = MutationWatcher::default();
        let body = doc.body();
        watcher.observe(&mut doc, body).unwrap();
        doc.append_fragment(doc.body(), &NodeSpec::paragraph("apple")).unwrap();
        watcher.observe(&mut doc, body).unwrap();
        assert_eq!(watcher.drain(&mut doc).records.len(), 1);
    }

    #[test]
    fn removed_nodes_in_batch_are_skipped() {
        let mut doc = Document::new();
        let mut watcher = MutationWatcher::default();
        let body = doc.body();
        watcher.observe(&mut doc, body).unwrap();
        let p = doc.append_fragment(doc.body(), &NodeSpec::paragraph("apple")).unwrap();
        doc.remove(p).unwrap();
        let batch = watcher.drain(&mut doc);
        let stats = watcher.process(&mut doc, &batch, &apple());
        assert_eq!(stats.anchored, 0);
        assert_eq!(stats.skipped, 1);
    }
}
