//! Lifecycle of annotation on one document.

use crate::annotator::{AnnotateStats, annotate};
use crate::watcher::{MutationWatcher, WatcherConfig};
use core_types::{CoreError, WordSet};
use html::Document;
use std::sync::Arc;
use store::StarredWords;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Not observing. A word set may or may not have been loaded.
    Idle,
    /// Inside `render`.
    Rendering,
    Observing,
    /// Observation was stopped for good; `render` still works.
    Disconnected,
}

/// Owns the interesting word set and the mutation watcher for a document.
///
/// All entry points run to completion on the caller's thread; the host
/// calls [`pump`](Self::pump) after the page has mutated.
pub struct AnnotationSession<S> {
    stars: S,
    words: Option<Arc<WordSet>>,
    watcher: MutationWatcher,
    state: SessionState,
}

impl<S: StarredWords> AnnotationSession<S> {
    pub fn new(stars: S) -> Self {
        Self::with_config(stars, WatcherConfig::default())
    }

    pub fn with_config(stars: S, config: WatcherConfig) -> Self {
        Self {
            stars,
            words: None,
            watcher: MutationWatcher::new(config),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stars(&self) -> &S {
        &self.stars
    }

    /// Word set of the last successful render.
    pub fn words(&self) -> Option<&Arc<WordSet>> {
        self.words.as_ref()
    }

    /// Refresh the word set from the star store and annotate `body`.
    ///
    /// On store failure nothing changes: existing anchors stay and later
    /// mutation passes keep using the previous set.
    pub fn render(&mut self, doc: &mut Document) -> Result<AnnotateStats, CoreError> {
        let resting = self.state;
        self.state = SessionState::Rendering;
        let listed = self.stars.list_starred();
        let words = match listed {
            Ok(words) => Arc::new(words.into_iter().collect::<WordSet>()),
            Err(err) => {
                self.state = resting;
                log::warn!(target: "annotate.session", "failed to list starred words: {err}");
                return Err(match err {
                    CoreError::Transport(_) => err,
                    other => CoreError::transport(other),
                });
            }
        };
        self.words = Some(Arc::clone(&words));
        let body = doc.body();
        let stats = annotate(doc, body, &words);
        self.state = resting;
        log::debug!(
            target: "annotate.session",
            "rendered {} words: anchored={} reverted={}",
            words.len(),
            stats.anchored,
            stats.reverted
        );
        Ok(stats)
    }

    /// Start incremental annotation of insertions under `body`.
    pub fn observe(&mut self, doc: &mut Document) -> Result<(), CoreError> {
        match self.state {
            SessionState::Observing => return Ok(()),
            SessionState::Disconnected => {
                return Err(CoreError::State("session is disconnected"));
            }
            SessionState::Idle | SessionState::Rendering => {}
        }
        if self.words.is_none() {
            return Err(CoreError::State("observe() requires a successful render()"));
        }
        let body = doc.body();
        self.watcher
            .observe(doc, body)
            .map_err(|_| CoreError::State("document body is gone"))?;
        self.state = SessionState::Observing;
        Ok(())
    }

    /// Stop observing. Safe to call any number of times.
    pub fn disconnect(&mut self, doc: &mut Document) {
        self.watcher.disconnect(doc);
        if self.state != SessionState::Disconnected {
            log::debug!(target: "annotate.session", "disconnected from {:?}", self.state);
        }
        self.state = SessionState::Disconnected;
    }

    /// Annotate whatever was inserted since the last pump.
    pub fn pump(&mut self, doc: &mut Document) -> AnnotateStats {
        if self.state != SessionState::Observing {
            return AnnotateStats::default();
        }
        let Some(words) = self.words.clone() else {
            return AnnotateStats::default();
        };
        let batch = self.watcher.drain(doc);
        if batch.is_empty() {
            return AnnotateStats::default();
        }
        log::trace!(
            target: "annotate.session",
            "pumping {} records (overflowed={})",
            batch.records.len(),
            batch.overflowed
        );
        self.watcher.process(doc, &batch, &words)
    }
}
