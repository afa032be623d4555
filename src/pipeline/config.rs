use crate::error::MasonryError;
use masonry_layout::{Breakpoints, PackingConfig};
use std::time::Duration;

pub const DEFAULT_SAFE_SPACING: f32 = 16.0;
pub const DEFAULT_PAINT_FRAMES: u64 = 2;
pub const DEFAULT_PAINT_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

/// Settings for the two-phase orchestrator and its async driver.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    /// Maps container width to column count.
    pub breakpoints: Breakpoints,
    /// Packing template; `column_count` is replaced by the resolved value on
    /// every submit.
    pub packing: PackingConfig,
    /// Vertical spacing of the provisional single-column placement.
    pub safe_spacing: f32,
    /// Paint frames to wait before measuring.
    pub paint_frames: u64,
    /// Upper bound on the paint wait; measuring proceeds when it elapses.
    pub paint_timeout: Duration,
    /// Drop cached heights of sections absent from a new submission.
    pub evict_absent: bool,
    /// Buffered events before the driver waits on the consumer.
    pub event_capacity: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            breakpoints: Breakpoints::default(),
            packing: PackingConfig::default(),
            safe_spacing: DEFAULT_SAFE_SPACING,
            paint_frames: DEFAULT_PAINT_FRAMES,
            paint_timeout: DEFAULT_PAINT_TIMEOUT,
            evict_absent: true,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl OrchestratorConfig {
    pub fn validate(&self) -> Result<(), MasonryError> {
        if !self.safe_spacing.is_finite() || self.safe_spacing < 0.0 {
            return Err(MasonryError::Config(format!(
                "safe spacing must be finite and non-negative, got {}",
                self.safe_spacing
            )));
        }
        if self.paint_timeout.is_zero() {
            return Err(MasonryError::Config(
                "paint timeout must be greater than zero".to_string(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(MasonryError::Config(
                "event capacity must be at least 1".to_string(),
            ));
        }
        self.packing.validate()?;
        Ok(())
    }

    /// The packing configuration for a container of the given width.
    pub fn packing_for_width(&self, container_width: f32) -> PackingConfig {
        self.packing
            .with_column_count(self.breakpoints.resolve(container_width))
    }
}
