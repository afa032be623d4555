pub mod fixtures;
pub mod layout_assertions;

use masonry::{LayoutOrchestrator, LayoutPipelineBuilder, MasonryError};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// An orchestrator with default settings and a private cache.
pub fn orchestrator() -> Result<LayoutOrchestrator, MasonryError> {
    LayoutPipelineBuilder::new().build_orchestrator()
}
