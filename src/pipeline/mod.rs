//! Two-phase layout orchestration.
//!
//! - [`LayoutOrchestrator`]: the synchronous measure-then-commit state machine
//! - [`LayoutPipeline`]: async driver that waits on a [`FrameClock`] and
//!   delivers [`LayoutEvent`](crate::LayoutEvent)s
//! - [`LayoutPipelineBuilder`]: fluent builder for both
//!
//! # Example
//!
//! ```ignore
//! use masonry::{LayoutPipelineBuilder, InMemoryHeightProbe};
//!
//! let probe = Arc::new(InMemoryHeightProbe::new());
//! let (pipeline, events) = LayoutPipelineBuilder::new()
//!     .with_probe(probe.clone())
//!     .build()?;
//!
//! // host: render each event's layout, write heights into `probe`,
//! // call `pipeline.clock().tick()` after every paint
//! let layout = pipeline.layout(sections, 1280.0).await?;
//! ```

mod builder;
pub mod config;
mod driver;
mod orchestrator;
pub mod paint;

pub use builder::LayoutPipelineBuilder;
pub use config::OrchestratorConfig;
pub use driver::LayoutPipeline;
pub use orchestrator::{Commit, LayoutOrchestrator, Phase, Submission};
pub use paint::{FrameClock, PaintSignal};
