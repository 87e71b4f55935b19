//! Star-word annotation engine.
//!
//! [`AnnotationSession`] pulls the interesting word set from a
//! [`StarredWords`](store::StarredWords) store, rewrites matching text in a
//! [`Document`](html::Document) into anchor elements, and keeps doing so
//! for content inserted later.

pub mod annotator;
pub mod matcher;
pub mod session;
pub mod watcher;

pub use annotator::{
    AnnotateStats, DATA_KEY, DATA_TEXT, QUERY_ANCHOR_TAG, STAR_ANCHOR_TAG, TOOLTIP_CONTENT_CLASS,
    anchor_kind, annotate, has_skipped_ancestor, is_anchor,
};
pub use matcher::{Span, match_words};
pub use session::{AnnotationSession, SessionState};
pub use watcher::{MutationBatch, MutationWatcher, WatcherConfig};
