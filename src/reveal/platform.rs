//! Platform seams the engine schedules through
//!
//! The browser backends live in `crate::web`; the manual ones here drive the
//! engine headless and let tests step frames by hand.

use std::cell::RefCell;
use std::rc::Rc;

/// Viewport-intersection tracking
pub trait ViewportWatcher<N> {
    fn watch(&self, node: &N);
    fn unwatch(&self, node: &N);

    /// False when the platform cannot report intersections at all
    fn is_available(&self) -> bool {
        true
    }
}

/// Deferral by rendering frames
pub trait FrameScheduler {
    /// Run `task` after `frames` rendering frames have elapsed
    fn after_frames(&self, frames: u32, task: Box<dyn FnOnce()>);
}

/// Watcher that only records what it was asked to watch
#[derive(Debug)]
pub struct RecordingWatcher<N> {
    inner: Rc<RefCell<WatchLog<N>>>,
    available: bool,
}

#[derive(Debug)]
struct WatchLog<N> {
    watched: Vec<N>,
    watch_calls: usize,
}

impl<N> Clone for RecordingWatcher<N> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            available: self.available,
        }
    }
}

impl<N> Default for RecordingWatcher<N> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(WatchLog {
                watched: Vec::new(),
                watch_calls: 0,
            })),
            available: true,
        }
    }
}

impl<N: Clone + PartialEq> RecordingWatcher<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A watcher standing in for a platform without intersection support
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    pub fn is_watching(&self, node: &N) -> bool {
        self.inner.borrow().watched.contains(node)
    }

    /// Elements currently watched, in registration order
    pub fn watched(&self) -> Vec<N> {
        self.inner.borrow().watched.clone()
    }

    /// Total `watch` calls, duplicates included
    pub fn watch_calls(&self) -> usize {
        self.inner.borrow().watch_calls
    }
}

impl<N: Clone + PartialEq> ViewportWatcher<N> for RecordingWatcher<N> {
    fn watch(&self, node: &N) {
        let mut log = self.inner.borrow_mut();
        log.watch_calls += 1;
        if !log.watched.contains(node) {
            log.watched.push(node.clone());
        }
    }

    fn unwatch(&self, node: &N) {
        self.inner.borrow_mut().watched.retain(|n| n != node);
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

type PendingTask = (u32, Box<dyn FnOnce()>);

/// Frame scheduler advanced explicitly by the caller
#[derive(Clone, Default)]
pub struct ManualFrames {
    pending: Rc<RefCell<Vec<PendingTask>>>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Advance one frame and run every task that came due
    pub fn advance(&self) {
        let due: Vec<Box<dyn FnOnce()>> = {
            let mut pending = self.pending.borrow_mut();
            let mut due = Vec::new();
            let mut waiting = Vec::new();
            for (frames, task) in pending.drain(..) {
                if frames <= 1 {
                    due.push(task);
                } else {
                    waiting.push((frames - 1, task));
                }
            }
            *pending = waiting;
            due
        };
        // Tasks may schedule more work, so run them outside the borrow
        for task in due {
            task();
        }
    }

    /// Advance until nothing is pending
    pub fn run_all(&self) {
        while self.pending() > 0 {
            self.advance();
        }
    }
}

impl FrameScheduler for ManualFrames {
    fn after_frames(&self, frames: u32, task: Box<dyn FnOnce()>) {
        self.pending.borrow_mut().push((frames, task));
    }
}
