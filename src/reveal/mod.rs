//! Scroll-reveal: tagging, observation and staggered reveal of page content

mod category;
mod engine;
pub mod platform;
mod scan;

pub use category::Category;
pub use engine::{RevealEngine, RevealState, RevealTarget};
pub use platform::{FrameScheduler, ManualFrames, RecordingWatcher, ViewportWatcher};
pub use scan::Scanner;
