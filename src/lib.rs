//! Masonry: multi-column packing of variable-height sections with a
//! measure-then-commit layout cycle.
//!
//! The algorithm crates are re-exported so hosts depend on this crate only.

pub mod error;
pub mod events;
pub mod pipeline;

pub use error::MasonryError;
pub use events::LayoutEvent;
pub use pipeline::{
    Commit, FrameClock, LayoutOrchestrator, LayoutPipeline, LayoutPipelineBuilder,
    OrchestratorConfig, PaintSignal, Phase, Submission,
};

pub use masonry_layout::{
    Breakpoint, Breakpoints, EstimatorConfig, HeightCache, HeightEstimator, LayoutDiff,
    LayoutError, PackingConfig, PackingStrategy, Packer, QualityThresholds, pack, validate,
};
pub use masonry_traits::{HeightProbe, InMemoryHeightProbe, ProbeError};
pub use masonry_types::{
    ContentMetrics, Generation, LayoutResult, PlacedSection, QualityRating, QualityReport,
    SectionDescriptor, SectionId, SectionKind,
};

pub mod layout {
    pub use masonry_layout::*;
}
