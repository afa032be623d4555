// src/events.rs
use crate::pipeline::paint::PaintSignal;
use masonry_layout::LayoutDiff;
use masonry_types::{Generation, LayoutResult};

/// What the pipeline hands to the rendering collaborator.
///
/// Each generation produces one `Provisional` event and, unless a newer
/// generation supersedes it, one `Committed` event. Superseded generations
/// never emit `Committed`.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutEvent {
    /// Single-column safe placement to render and measure.
    Provisional {
        generation: Generation,
        layout: LayoutResult,
    },
    /// Final packed layout for the generation.
    Committed {
        generation: Generation,
        layout: LayoutResult,
        /// Changes relative to the previously committed layout.
        diff: LayoutDiff,
        /// Whether paint settled or the fallback timer fired.
        paint: PaintSignal,
    },
}

impl LayoutEvent {
    pub fn generation(&self) -> Generation {
        match self {
            LayoutEvent::Provisional { generation, .. }
            | LayoutEvent::Committed { generation, .. } => *generation,
        }
    }

    pub fn layout(&self) -> &LayoutResult {
        match self {
            LayoutEvent::Provisional { layout, .. } | LayoutEvent::Committed { layout, .. } => {
                layout
            }
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, LayoutEvent::Committed { .. })
    }
}
