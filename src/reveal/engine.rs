//! Scroll-reveal engine
//!
//! Tags structural elements, watches them for viewport entry and flips them
//! into the revealed state:
//! - stagger groups reveal their children with an increasing delay
//! - everything is one-shot unless the element opts out with `data-once="false"`
//! - under reduced motion, everything is revealed at once and nothing is watched

use super::category::Category;
use super::platform::{FrameScheduler, ViewportWatcher};
use super::scan::Scanner;
use crate::config::RevealConfig;
use crate::dom::{Dom, Selector};

/// Frames to wait before revealing a plain target
const PLAIN_REVEAL_FRAMES: u32 = 1;
/// Stagger children wait one extra frame so the delay property is committed
/// before the transition class lands
const STAGGER_REVEAL_FRAMES: u32 = 2;

const REPEAT_ATTRIBUTE: &str = "data-once";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Pending,
    Revealed,
}

/// An element the engine knows about
#[derive(Debug, Clone)]
pub struct RevealTarget<N> {
    pub node: N,
    pub category: Category,
    pub state: RevealState,
    /// Reveal on every entry instead of once
    pub repeat: bool,
    /// Position inside a stagger group, when revealed as a child
    pub ordinal: Option<usize>,
    observed: bool,
}

impl<N> RevealTarget<N> {
    pub fn is_observed(&self) -> bool {
        self.observed
    }
}

pub struct RevealEngine<D: Dom, W, F> {
    dom: D,
    watcher: W,
    frames: F,
    config: RevealConfig,
    targets: Vec<RevealTarget<D::Node>>,
}

impl<D, W, F> RevealEngine<D, W, F>
where
    D: Dom,
    W: ViewportWatcher<D::Node>,
    F: FrameScheduler,
{
    pub fn new(dom: D, watcher: W, frames: F, config: RevealConfig) -> Self {
        Self {
            dom,
            watcher,
            frames,
            config,
            targets: Vec::new(),
        }
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn target(&self, node: &D::Node) -> Option<&RevealTarget<D::Node>> {
        self.targets.iter().find(|t| t.node == *node)
    }

    pub fn targets(&self) -> &[RevealTarget<D::Node>] {
        &self.targets
    }

    /// Page-ready entry point: scan the whole document, then either observe
    /// everything or, when nothing could ever report an entry, reveal it all
    pub fn start(&mut self) {
        if !self.animated() {
            if !self.config.reduced_motion {
                reveal_log!(self.config, "IntersectionObserver unavailable, revealing everything");
            }
            self.reduced_motion_fallback();
            return;
        }
        let Some(root) = self.dom.document_root() else {
            return;
        };
        self.scan(&root);
        let marked = self.marked_within(&root);
        for node in &marked {
            self.observe(node);
        }
        reveal_log!(self.config, "Observing {} elements", marked.len());
    }

    /// Tag the subtree at `root`; returns how many elements were newly tagged
    pub fn scan(&mut self, root: &D::Node) -> usize {
        let tagged = Scanner::new(&self.dom, &self.config.classes).scan(root);
        let count = tagged.len();
        for (node, category) in tagged {
            let idx = self.entry(&node);
            self.targets[idx].category = category;
        }
        reveal_log!(self.config, "AutoTag complete, {} new", count);
        count
    }

    /// Start watching `node`. Returns false when it was already watched or
    /// has already been revealed for good.
    pub fn observe(&mut self, node: &D::Node) -> bool {
        let idx = self.entry(node);
        let target = &mut self.targets[idx];
        if target.observed || (target.state == RevealState::Revealed && !target.repeat) {
            return false;
        }
        target.observed = true;
        self.watcher.watch(node);
        true
    }

    /// Handle `node` crossing the threshold while entering the viewport
    pub fn on_intersect(&mut self, node: &D::Node) {
        let idx = self.entry(node);
        let target = &self.targets[idx];
        if target.state == RevealState::Revealed && !target.repeat && !target.observed {
            return;
        }
        let (category, repeat) = (target.category, target.repeat);

        match category {
            Category::StaggerGroup => {
                self.reveal_children(node, false);
                // Groups have no transition of their own
                self.dom.add_class(node, &self.config.classes.revealed);
            }
            Category::Plain | Category::Heading | Category::Card => {
                self.schedule_reveal(node.clone(), PLAIN_REVEAL_FRAMES);
            }
        }

        let target = &mut self.targets[idx];
        target.state = RevealState::Revealed;
        if !repeat {
            target.observed = false;
            self.watcher.unwatch(node);
        }
        reveal_log!(self.config, "Revealed: {:?}", node);
    }

    /// Observer callback: only entries count, exits are ignored
    pub fn on_visibility_change(&mut self, node: &D::Node, intersecting: bool) {
        if intersecting {
            self.on_intersect(node);
        }
    }

    /// Reveal every eligible element at once without watching anything
    pub fn reduced_motion_fallback(&mut self) {
        let Some(root) = self.dom.document_root() else {
            return;
        };
        self.scan(&root);
        self.reveal_all_within(&root);
        reveal_log!(self.config, "Reduced motion: revealed all elements immediately");
    }

    /// Explicit entry point for content inserted after page-ready. Only the
    /// subtree at `root` is scanned and observed.
    pub fn register_new_content(&mut self, root: &D::Node) {
        self.prune();
        self.scan(root);
        if !self.animated() {
            self.reveal_all_within(root);
            return;
        }
        for node in self.marked_within(root) {
            if self.observe(&node) {
                reveal_log!(self.config, "Observing dynamically added: {:?}", node);
            }
        }
    }

    /// Drop targets that can no longer change: one-shot targets whose reveal
    /// has landed, and anything detached from the document. Returns how many
    /// were dropped.
    ///
    /// Lookups are linear in the number of live targets; pruning keeps that
    /// bounded by what is still pending on the page.
    pub fn prune(&mut self) -> usize {
        let before = self.targets.len();
        let (dom, watcher, revealed) = (&self.dom, &self.watcher, &self.config.classes.revealed);
        self.targets.retain(|t| {
            if !dom.is_connected(&t.node) {
                if t.observed {
                    watcher.unwatch(&t.node);
                }
                return false;
            }
            let settled = t.state == RevealState::Revealed
                && !t.repeat
                && !t.observed
                && dom.has_class(&t.node, revealed);
            !settled
        });
        before - self.targets.len()
    }

    /// Whether reveals go through the viewport watcher at all
    fn animated(&self) -> bool {
        !self.config.reduced_motion && self.watcher.is_available()
    }

    fn reveal_all_within(&mut self, root: &D::Node) {
        for node in self.marked_within(root) {
            let idx = self.entry(&node);
            self.dom.add_class(&node, &self.config.classes.revealed);
            self.targets[idx].state = RevealState::Revealed;
            if self.targets[idx].category == Category::StaggerGroup {
                self.reveal_children(&node, true);
            }
        }
    }

    /// Stagger the direct children of `group`. With `immediate`, every child
    /// gets a zero delay and is revealed synchronously.
    fn reveal_children(&mut self, group: &D::Node, immediate: bool) {
        for (index, child) in self.dom.children(group).into_iter().enumerate() {
            let delay = if immediate { 0.0 } else { self.config.stagger_delay(index) };
            self.dom.set_style_property(
                &child,
                &self.config.classes.delay_property,
                &format!("{}ms", delay),
            );
            self.dom.add_class(&child, &self.config.classes.marker);

            let idx = self.entry(&child);
            self.targets[idx].ordinal = Some(index);
            self.targets[idx].state = RevealState::Revealed;

            if immediate {
                self.dom.add_class(&child, &self.config.classes.revealed);
            } else {
                self.schedule_reveal(child, STAGGER_REVEAL_FRAMES);
            }
        }
    }

    fn schedule_reveal(&self, node: D::Node, frames: u32) {
        let dom = self.dom.clone();
        let class = self.config.classes.revealed.clone();
        self.frames
            .after_frames(frames, Box::new(move || dom.add_class(&node, &class)));
    }

    fn marked_within(&self, root: &D::Node) -> Vec<D::Node> {
        self.dom
            .select_inclusive(root, &Selector::Class(&self.config.classes.marker))
    }

    /// Index of the target for `node`, registering it on first sight. A node
    /// that already carries the revealed class comes back as revealed.
    fn entry(&mut self, node: &D::Node) -> usize {
        if let Some(idx) = self.targets.iter().position(|t| t.node == *node) {
            return idx;
        }
        let state = if self.dom.has_class(node, &self.config.classes.revealed) {
            RevealState::Revealed
        } else {
            RevealState::Pending
        };
        let repeat = self
            .dom
            .attribute(node, REPEAT_ATTRIBUTE)
            .map(|v| v == "false")
            .unwrap_or(false);
        self.targets.push(RevealTarget {
            node: node.clone(),
            category: Category::from_classes(&self.dom, node, &self.config.classes),
            state,
            repeat,
            ordinal: None,
            observed: false,
        });
        self.targets.len() - 1
    }
}
