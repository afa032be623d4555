//! Height estimation for sections that have not been rendered yet.
//!
//! Estimates are resolved in order of trust:
//!
//! 1. the section's own observed height
//! 2. a height recorded in the shared [`HeightCache`] for the same id
//! 3. the caller-supplied estimate
//! 4. a per-kind formula over the section's content volume, scaled by the
//!    correction the cache has learned for that kind
//!
//! Everything except an observed height is clamped to
//! `[min_height, max_height]`.

use crate::cache::HeightCache;
use masonry_types::{SectionDescriptor, SectionId, SectionKind, is_usable_height};
use std::collections::HashMap;
use std::sync::Arc;

/// Where an estimate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateSource {
    Observed,
    Cached,
    Caller,
    Formula,
}

impl EstimateSource {
    /// Whether the height is a real measurement rather than a guess.
    pub fn is_measured(self) -> bool {
        matches!(self, EstimateSource::Observed | EstimateSource::Cached)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub height: f32,
    pub source: EstimateSource,
}

/// Coefficients of the content-volume formula.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorConfig {
    /// Overrides of the built-in per-kind base heights.
    pub base_heights: HashMap<SectionKind, f32>,
    /// Added per label/value field.
    pub per_field: f32,
    /// Added per list item.
    pub per_item: f32,
    /// Added per wrapped line of description.
    pub line_height: f32,
    pub chars_per_line: u32,
    pub min_height: f32,
    pub max_height: f32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            base_heights: HashMap::new(),
            per_field: 24.0,
            per_item: 56.0,
            line_height: 20.0,
            chars_per_line: 60,
            min_height: 100.0,
            max_height: 600.0,
        }
    }
}

impl EstimatorConfig {
    pub fn with_base_height(mut self, kind: SectionKind, height: f32) -> Self {
        self.base_heights.insert(kind, height);
        self
    }

    /// Sets the clamp band. A reversed band is swapped.
    pub fn with_bounds(mut self, min_height: f32, max_height: f32) -> Self {
        self.min_height = min_height.min(max_height);
        self.max_height = max_height.max(min_height);
        self
    }

    pub fn base_height(&self, kind: SectionKind) -> f32 {
        self.base_heights
            .get(&kind)
            .copied()
            .unwrap_or_else(|| default_base_height(kind))
    }

    fn clamp(&self, height: f32) -> f32 {
        height.clamp(self.min_height, self.max_height)
    }
}

fn default_base_height(kind: SectionKind) -> f32 {
    match kind {
        SectionKind::Info => 160.0,
        SectionKind::Overview => 220.0,
        SectionKind::Analytics => 240.0,
        SectionKind::Chart => 300.0,
        SectionKind::List => 180.0,
        SectionKind::Contact => 150.0,
        SectionKind::Map => 280.0,
        SectionKind::Event => 200.0,
        SectionKind::News => 200.0,
        SectionKind::Product => 220.0,
        SectionKind::Financials => 240.0,
        SectionKind::Other => 180.0,
    }
}

/// Best-guess heights before render, corrected by real measurements afterwards.
#[derive(Debug, Clone)]
pub struct HeightEstimator {
    config: EstimatorConfig,
    cache: Arc<HeightCache>,
}

impl Default for HeightEstimator {
    fn default() -> Self {
        Self::new(EstimatorConfig::default(), Arc::new(HeightCache::new()))
    }
}

impl HeightEstimator {
    pub fn new(config: EstimatorConfig, cache: Arc<HeightCache>) -> Self {
        Self { config, cache }
    }

    /// An estimator with default coefficients over a shared cache.
    pub fn with_cache(cache: Arc<HeightCache>) -> Self {
        Self::new(EstimatorConfig::default(), cache)
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<HeightCache> {
        &self.cache
    }

    pub fn estimate(&self, section: &SectionDescriptor) -> f32 {
        self.estimate_with_source(section).height
    }

    pub fn estimate_with_source(&self, section: &SectionDescriptor) -> Estimate {
        if let Some(height) = section.usable_observed_height() {
            return Estimate {
                height,
                source: EstimateSource::Observed,
            };
        }
        if let Some(height) = self.cache.observed(&section.id) {
            return Estimate {
                height,
                source: EstimateSource::Cached,
            };
        }
        if let Some(height) = section.usable_estimated_height() {
            return Estimate {
                height: self.config.clamp(height),
                source: EstimateSource::Caller,
            };
        }
        let ratio = self.cache.kind_ratio(section.kind).unwrap_or(1.0);
        Estimate {
            height: self.config.clamp(self.formula_estimate(section) * ratio),
            source: EstimateSource::Formula,
        }
    }

    /// The raw content-volume formula, unclamped and uncorrected.
    pub fn formula_estimate(&self, section: &SectionDescriptor) -> f32 {
        let content = &section.content;
        let lines = if content.description_len == 0 {
            0
        } else {
            content.description_len.div_ceil(self.config.chars_per_line.max(1))
        };
        self.config.base_height(section.kind)
            + content.field_count as f32 * self.config.per_field
            + content.item_count as f32 * self.config.per_item
            + lines as f32 * self.config.line_height
    }

    /// Stores the true height of `section` and teaches its kind.
    ///
    /// Unusable heights (non-finite or not positive) are ignored.
    pub fn record(&self, section: &SectionDescriptor, observed_height: f32) {
        if !is_usable_height(observed_height) {
            log::debug!(
                "ignoring unusable height {} for section '{}'",
                observed_height,
                section.id
            );
            return;
        }
        let formula = self.formula_estimate(section);
        self.cache
            .record(section.id.clone(), section.kind, observed_height, formula);
    }

    /// Stores the true height of a section by id only, without kind learning.
    pub fn record_id(&self, id: &SectionId, observed_height: f32) {
        self.cache.insert(id.clone(), observed_height);
    }
}
