//! Recovers the article → rule → sub-rule → sub-sub-rule hierarchy from
//! plain text.
//!
//! Lines are classified independently by `LineClassifier` and then folded
//! into the tree by [`StructureExtractor`]. Lines that cannot be attached to
//! an open parent are dropped, never reported as errors; the [`ParseReport`]
//! returned alongside the tree records them.

mod classify;
mod extract;
mod outline;

pub use extract::{DroppedLine, ParseReport, StructureExtractor};
pub use outline::{preview_text, render_outline};
