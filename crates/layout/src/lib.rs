//! Masonry packing: height estimation, responsive column resolution, column
//! packing strategies and layout quality scoring.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Column count must be at least 1, got {0}.")]
    InvalidColumnCount(usize),
    #[error("Gap must be a finite, non-negative number, got {0}.")]
    InvalidGap(f32),
    #[error("Gap penalty weight must be a finite, non-negative number, got {0}.")]
    InvalidPenaltyWeight(f32),
    #[error("Section id '{0}' appears more than once.")]
    DuplicateSectionId(String),
    #[error("Invalid breakpoint table: {0}")]
    InvalidBreakpoint(String),
}

pub mod algorithms;
pub mod breakpoints;
pub mod cache;
pub mod config;
pub mod diff;
pub mod estimator;
pub mod packer;
pub mod perf;
pub mod quality;

pub use self::breakpoints::{Breakpoint, Breakpoints};
pub use self::cache::{DEFAULT_CACHE_CAPACITY, HeightCache, KindCorrection};
pub use self::config::{MAX_OPTIMIZATION_PASSES, PackingConfig, PackingStrategy};
pub use self::diff::LayoutDiff;
pub use self::estimator::{Estimate, EstimateSource, EstimatorConfig, HeightEstimator};
pub use self::packer::{Packer, pack};
pub use self::perf::{DebugProfiler, NoOpProfiler, Profiler};
pub use self::quality::{QualityThresholds, validate};
