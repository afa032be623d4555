use crate::LayoutError;
use serde::{Deserialize, Serialize};

/// Upper bound on local-improvement sweeps. Each sweep re-runs placement at
/// most `SWAP_WINDOW` times, so the cap bounds the cost of a single pack call.
pub const MAX_OPTIMIZATION_PASSES: usize = 8;

/// Multiplier applied to the normalised neighbour penalty of the gap-aware strategy.
pub const DEFAULT_GAP_PENALTY_WEIGHT: f32 = 100.0;

/// Column selection strategy of a packing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackingStrategy {
    /// Place every section on the column window with the lowest resting top.
    #[default]
    ShortestColumn,
    /// Level-oriented first fit over sections sorted tallest first: columns are
    /// handed out shelf by shelf, left to right, and sections stack under
    /// their column's running height. Sorting is forced regardless of
    /// `sort_by_height_descending`.
    FirstFitDecreasingHeight,
    /// Bottom-left placement over a merged skyline profile.
    SkylineBestFit,
    /// Shortest-column scoring plus a penalty for stranding neighbour columns.
    GapAware,
}

impl PackingStrategy {
    pub const fn label(self) -> &'static str {
        match self {
            PackingStrategy::ShortestColumn => "shortest-column",
            PackingStrategy::FirstFitDecreasingHeight => "first-fit-decreasing-height",
            PackingStrategy::SkylineBestFit => "skyline-best-fit",
            PackingStrategy::GapAware => "gap-aware",
        }
    }
}

/// Per-run packing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingConfig {
    /// Number of columns. Must be at least 1.
    pub column_count: usize,
    /// Vertical spacing inserted between stacked sections in the same column.
    pub gap: f32,
    pub strategy: PackingStrategy,
    /// Sort sections tallest-first (stable) before placing them.
    pub sort_by_height_descending: bool,
    /// Extra sweeps of adjacent swaps, each kept only if it lowers the total height.
    ///
    /// Values above [`MAX_OPTIMIZATION_PASSES`] are clamped.
    pub optimization_passes: usize,
    /// Weight of the gap-aware neighbour penalty. Ignored by other strategies.
    pub gap_penalty_weight: f32,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            column_count: 1,
            gap: 16.0,
            strategy: PackingStrategy::default(),
            sort_by_height_descending: false,
            optimization_passes: 0,
            gap_penalty_weight: DEFAULT_GAP_PENALTY_WEIGHT,
        }
    }
}

impl PackingConfig {
    pub fn new(column_count: usize) -> Self {
        Self {
            column_count,
            ..Default::default()
        }
    }

    pub fn with_column_count(mut self, column_count: usize) -> Self {
        self.column_count = column_count;
        self
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_strategy(mut self, strategy: PackingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_sort_by_height(mut self, sort: bool) -> Self {
        self.sort_by_height_descending = sort;
        self
    }

    pub fn with_optimization_passes(mut self, passes: usize) -> Self {
        self.optimization_passes = passes;
        self
    }

    pub fn with_gap_penalty_weight(mut self, weight: f32) -> Self {
        self.gap_penalty_weight = weight;
        self
    }

    /// Rejects configurations that cannot produce a layout.
    ///
    /// # Errors
    ///
    /// - `InvalidColumnCount` if `column_count < 1`
    /// - `InvalidGap` if `gap` is negative or not finite
    /// - `InvalidPenaltyWeight` if `gap_penalty_weight` is negative or not finite
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.column_count < 1 {
            return Err(LayoutError::InvalidColumnCount(self.column_count));
        }
        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(LayoutError::InvalidGap(self.gap));
        }
        if !self.gap_penalty_weight.is_finite() || self.gap_penalty_weight < 0.0 {
            return Err(LayoutError::InvalidPenaltyWeight(self.gap_penalty_weight));
        }
        Ok(())
    }

    /// Whether the working order is sorted tallest-first.
    pub fn sorts_by_height(&self) -> bool {
        self.sort_by_height_descending
            || self.strategy == PackingStrategy::FirstFitDecreasingHeight
    }

    /// Optimisation passes after applying the cap.
    pub fn effective_passes(&self) -> usize {
        if self.optimization_passes > MAX_OPTIMIZATION_PASSES {
            log::warn!(
                "optimization_passes={} exceeds the cap, clamping to {}",
                self.optimization_passes,
                MAX_OPTIMIZATION_PASSES
            );
        }
        self.optimization_passes.min(MAX_OPTIMIZATION_PASSES)
    }
}
