// src/error.rs
use masonry_layout::LayoutError;
use masonry_traits::ProbeError;
use thiserror::Error;

/// Errors surfaced by the layout pipeline.
///
/// Measurement anomalies and stale generations are not errors; they are
/// handled inside the orchestrator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MasonryError {
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Measurement failed: {0}")]
    Probe(#[from] ProbeError),

    #[error("Pipeline is misconfigured: {0}")]
    Config(String),

    #[error("Layout event receiver was dropped")]
    ChannelClosed,
}
