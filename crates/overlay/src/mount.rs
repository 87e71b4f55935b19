//! Lazily attached overlays, one per anchor.

use crate::tooltip::{Triggers, TooltipState};
use annotate::{DATA_KEY, DATA_TEXT, QUERY_ANCHOR_TAG, STAR_ANCHOR_TAG, anchor_kind};
use core_types::{AnchorKind, CoreError, Word};
use html::traverse::{find_elements_by_class, find_elements_by_tag};
use html::{Document, DomError, NodeKey};
use layout::Preferred;
use std::collections::HashMap;
use store::{DefinitionLookup, StarredWords};

/// What an overlay renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlayContent {
    Ready {
        word: Word,
        definitions: Vec<String>,
        starred: bool,
    },
    /// A collaborator failed; the message is shown instead of a definition.
    Failed { message: String },
}

impl OverlayContent {
    pub fn first_definition(&self) -> Option<&str> {
        match self {
            OverlayContent::Ready { definitions, .. } => definitions.first().map(String::as_str),
            OverlayContent::Failed { .. } => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Overlay {
    pub anchor: NodeKey,
    pub kind: AnchorKind,
    /// Original casing from `data-text`.
    pub text: String,
    pub content: OverlayContent,
    pub tooltip: TooltipState,
}

pub struct OverlayMount<L, S> {
    lookup: L,
    stars: S,
    overlays: HashMap<NodeKey, Overlay>,
}

impl<L: DefinitionLookup, S: StarredWords> OverlayMount<L, S> {
    pub fn new(lookup: L, stars: S) -> Self {
        Self {
            lookup,
            stars,
            overlays: HashMap::new(),
        }
    }

    pub fn get(&self, anchor: NodeKey) -> Option<&Overlay> {
        self.overlays.get(&anchor)
    }

    pub fn get_mut(&mut self, anchor: NodeKey) -> Option<&mut Overlay> {
        self.overlays.get_mut(&anchor)
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Attach an overlay to `anchor` unless it already has one.
    ///
    /// Returns whether a new overlay was created. Collaborator failures do
    /// not fail the mount; they become [`OverlayContent::Failed`].
    pub fn mount(&mut self, doc: &mut Document, anchor: NodeKey) -> Result<bool, DomError> {
        let kind = anchor_kind(doc, anchor).ok_or(DomError::WrongNodeKind(anchor))?;
        if doc.has_shadow_root(anchor) {
            return Ok(false);
        }
        doc.attach_shadow(anchor)?;

        let key = doc.get_attribute(anchor, DATA_KEY).unwrap_or_default().to_string();
        let text = doc.get_attribute(anchor, DATA_TEXT).unwrap_or_default().to_string();
        let content = self.load(&key);
        let tooltip = match kind {
            AnchorKind::Star => TooltipState::new(Triggers::HOVER, Preferred::Auto),
            AnchorKind::Query => TooltipState::new(Triggers::CLICK, Preferred::Auto).opened(),
        };
        log::debug!(target: "overlay.mount", "mounted {kind:?} overlay on {anchor:?} for {key:?}");
        self.overlays.insert(
            anchor,
            Overlay {
                anchor,
                kind,
                text,
                content,
                tooltip,
            },
        );
        Ok(true)
    }

    /// Mount every anchor under `root`. Returns how many were new.
    pub fn mount_all(&mut self, doc: &mut Document, root: NodeKey) -> usize {
        let mut anchors = find_elements_by_tag(doc, root, STAR_ANCHOR_TAG);
        anchors.extend(find_elements_by_class(doc, root, QUERY_ANCHOR_TAG));
        anchors.extend(find_elements_by_tag(doc, root, QUERY_ANCHOR_TAG));
        anchors.sort_unstable();
        anchors.dedup();
        anchors
            .into_iter()
            .filter(|anchor| match self.mount(doc, *anchor) {
                Ok(mounted) => mounted,
                Err(err) => {
                    log::debug!(target: "overlay.mount", "cannot mount {anchor:?}: {err}");
                    false
                }
            })
            .count()
    }

    /// Forget overlays whose anchor left the document.
    pub fn prune(&mut self, doc: &Document) -> usize {
        let before = self.overlays.len();
        self.overlays.retain(|anchor, _| doc.is_connected(*anchor));
        before - self.overlays.len()
    }

    /// Star or unstar the overlay's word.
    ///
    /// Returns `true` when the store changed, meaning the session should
    /// render again so anchors elsewhere follow.
    pub fn toggle_star(&mut self, anchor: NodeKey) -> Result<bool, CoreError> {
        let overlay = self
            .overlays
            .get_mut(&anchor)
            .ok_or(CoreError::State("anchor has no overlay"))?;
        let OverlayContent::Ready { word, starred, .. } = &mut overlay.content else {
            return Ok(false);
        };
        let result = if *starred {
            self.stars.unstar(word.as_str())
        } else {
            self.stars.star(word.as_str())
        };
        match result {
            Ok(_) => {
                *starred = !*starred;
                log::debug!(target: "overlay.mount", "{word} starred={starred}");
                Ok(true)
            }
            Err(err) => {
                log::warn!(target: "overlay.mount", "star toggle for {word} failed: {err}");
                Err(err)
            }
        }
    }

    fn load(&self, key: &str) -> OverlayContent {
        let word = match Word::parse(key) {
            Ok(word) => word,
            Err(err) => {
                return OverlayContent::Failed {
                    message: err.to_string(),
                };
            }
        };
        let definitions = self.lookup.lookup(&word);
        let starred = self.stars.is_starred(&word);
        match (definitions, starred) {
            (Ok(definitions), Ok(starred)) => OverlayContent::Ready {
                word,
                definitions,
                starred,
            },
            (Err(err), _) | (_, Err(err)) => {
                log::debug!(target: "overlay.mount", "lookup for {word} failed: {err}");
                OverlayContent::Failed {
                    message: err.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotate::annotate;
    use core_types::WordSet;
    use html::NodeSpec;
    use std::cell::Cell;
    use store::{KeyValueStorage, SyncStarStore};

    struct FixedLookup {
        calls: Cell<usize>,
    }

    impl DefinitionLookup for FixedLookup {
        fn lookup(&self, word: &Word) -> Result<Vec<String>, CoreError> {
            self.calls.set(self.calls.get() + 1);
            match word.as_str() {
                "apple" => Ok(vec!["n. 苹果".to_string(), "n. 苹果树".to_string()]),
                "offline" => Err(CoreError::Transport("connection refused".into())),
                other => Err(CoreError::NotFound(other.to_string())),
            }
        }
    }

    fn setup(text: &str, words: &[&str]) -> (Document, OverlayMount<FixedLookup, SyncStarStore>) {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append_fragment(body, &NodeSpec::paragraph(text)).unwrap();
        let stars = SyncStarStore::new(KeyValueStorage::new());
        for word in words {
            stars.star(word).unwrap();
        }
        let set: WordSet = stars.list_starred().unwrap().into_iter().collect();
        annotate(&mut doc, body, &set);
        let mount = OverlayMount::new(FixedLookup { calls: Cell::new(0) }, stars);
        (doc, mount)
    }

    fn first_anchor(doc: &Document) -> NodeKey {
        find_elements_by_tag(doc, doc.body(), STAR_ANCHOR_TAG)[0]
    }

    #[test]
    fn mounts_once_per_anchor() {
        let (mut doc, mut mount) = setup("An Apple a day", &["apple"]);
        let anchor = first_anchor(&doc);
        assert!(mount.mount(&mut doc, anchor).unwrap());
        assert!(!mount.mount(&mut doc, anchor).unwrap());
        assert!(doc.has_shadow_root(anchor));
        assert_eq!(mount.lookup.calls.get(), 1);

        let overlay = mount.get(anchor).unwrap();
        assert_eq!(overlay.kind, AnchorKind::Star);
        assert_eq!(overlay.text, "Apple");
        assert_eq!(overlay.content.first_definition(), Some("n. 苹果"));
        assert!(matches!(overlay.content, OverlayContent::Ready { starred: true, .. }));
        assert!(!overlay.tooltip.is_open());
    }

    #[test]
    fn lookup_failure_becomes_error_state() {
        let (mut doc, mut mount) = setup("we are offline today", &["offline"]);
        let anchor = first_anchor(&doc);
        assert!(mount.mount(&mut doc, anchor).unwrap());
        assert_eq!(
            mount.get(anchor).unwrap().content,
            OverlayContent::Failed {
                message: "transport error: connection refused".to_string()
            }
        );
    }

    #[test]
    fn non_anchor_is_rejected() {
        let (mut doc, mut mount) = setup("plain", &[]);
        let body = doc.body();
        assert_eq!(mount.mount(&mut doc, body), Err(DomError::WrongNodeKind(body)));
    }

    #[test]
    fn mount_all_and_prune() {
        let (mut doc, mut mount) = setup("apple pear apple", &["apple", "pear"]);
        let body = doc.body();
        assert_eq!(mount.mount_all(&mut doc, body), 3);
        assert_eq!(mount.mount_all(&mut doc, body), 0);
        let anchor = first_anchor(&doc);
        doc.remove(anchor).unwrap();
        assert_eq!(mount.prune(&doc), 1);
        assert_eq!(mount.len(), 2);
    }

    #[test]
    fn toggle_star_flips_store_and_reports_rerender() {
        let (mut doc, mut mount) = setup("apple", &["apple"]);
        let anchor = first_anchor(&doc);
        mount.mount(&mut doc, anchor).unwrap();
        assert!(mount.toggle_star(anchor).unwrap());
        assert!(mount.stars.list_starred().unwrap().is_empty());
        assert!(matches!(
            mount.get(anchor).unwrap().content,
            OverlayContent::Ready { starred: false, .. }
        ));
        assert!(mount.toggle_star(anchor).unwrap());
        assert_eq!(mount.stars.list_starred().unwrap().len(), 1);
    }

    #[test]
    fn toggle_without_overlay_is_state_error() {
        let (doc, mut mount) = setup("apple", &["apple"]);
        let anchor = first_anchor(&doc);
        assert!(matches!(mount.toggle_star(anchor), Err(CoreError::State(_))));
    }
}
