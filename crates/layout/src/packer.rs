//! The column packing entry point.
//!
//! [`Packer::pack`] resolves a height for every section, builds the working
//! order, runs the configured strategy, optionally improves the order with
//! adjacent swaps, and scores the result.

use crate::LayoutError;
use crate::algorithms::column_state::content_heights;
use crate::algorithms::optimize::improve;
use crate::algorithms::ordering::working_order;
use crate::algorithms::{PassOutcome, run_pass};
use crate::config::PackingConfig;
use crate::estimator::HeightEstimator;
use crate::perf::{DebugProfiler, NoOpProfiler, Profiler};
use crate::quality;
use masonry_types::{LayoutResult, PlacedSection, SectionDescriptor, is_usable_height};
use std::collections::HashSet;

/// Packs section lists into columns.
///
/// Holds the estimator (and through it the shared height cache) plus the
/// active profiler. A packer carries no per-run state.
#[derive(Debug)]
pub struct Packer {
    estimator: HeightEstimator,
    profiler: Box<dyn Profiler>,
}

impl Default for Packer {
    fn default() -> Self {
        Self::new(HeightEstimator::default())
    }
}

impl Packer {
    pub fn new(estimator: HeightEstimator) -> Self {
        let profiler: Box<dyn Profiler> = if cfg!(feature = "profiling") {
            Box::new(DebugProfiler::new())
        } else {
            Box::new(NoOpProfiler)
        };
        Self {
            estimator,
            profiler,
        }
    }

    pub fn with_profiler(mut self, profiler: Box<dyn Profiler>) -> Self {
        self.profiler = profiler;
        self
    }

    pub fn estimator(&self) -> &HeightEstimator {
        &self.estimator
    }

    pub fn profiler(&self) -> &dyn Profiler {
        self.profiler.as_ref()
    }

    /// Heights used for placement, one per section, from the estimator.
    pub fn resolve_heights(&self, sections: &[SectionDescriptor]) -> Vec<f32> {
        sections
            .iter()
            .map(|section| {
                let estimate = self.estimator.estimate_with_source(section);
                if estimate.source.is_measured() {
                    self.profiler.count_hit();
                } else {
                    self.profiler.count_miss();
                }
                estimate.height
            })
            .collect()
    }

    /// Places `sections` into columns.
    ///
    /// Rejects invalid configurations and duplicate ids before any placement
    /// work. Identical inputs always produce identical results.
    pub fn pack(
        &self,
        sections: &[SectionDescriptor],
        config: &PackingConfig,
    ) -> Result<LayoutResult, LayoutError> {
        config.validate()?;
        check_unique_ids(sections)?;

        if sections.is_empty() {
            log::debug!(
                "packing 0 sections into {} columns",
                config.column_count
            );
            return Ok(LayoutResult::empty(config.column_count, config.gap));
        }

        #[cfg(feature = "profiling")]
        let started = instant::Instant::now();

        let heights = self.resolve_heights(sections);
        let result = self.place(sections, heights, config);

        #[cfg(feature = "profiling")]
        {
            let elapsed = started.elapsed();
            self.profiler.record("pack.total", elapsed);
            self.profiler.record_run(sections.len(), elapsed);
        }

        Ok(result)
    }

    /// Places `sections` using the given heights instead of the estimator.
    ///
    /// `heights[i]` belongs to `sections[i]`; a length mismatch or an unusable
    /// height falls back to the estimator for that section.
    pub fn pack_heights(
        &self,
        sections: &[SectionDescriptor],
        heights: &[f32],
        config: &PackingConfig,
    ) -> Result<LayoutResult, LayoutError> {
        config.validate()?;
        check_unique_ids(sections)?;
        if sections.is_empty() {
            return Ok(LayoutResult::empty(config.column_count, config.gap));
        }

        let heights = sections
            .iter()
            .enumerate()
            .map(|(i, section)| match heights.get(i) {
                Some(&h) if is_usable_height(h) => h,
                _ => self.estimator.estimate(section),
            })
            .collect();
        Ok(self.place(sections, heights, config))
    }

    fn place(
        &self,
        sections: &[SectionDescriptor],
        heights: Vec<f32>,
        config: &PackingConfig,
    ) -> LayoutResult {
        let spans: Vec<usize> = sections
            .iter()
            .map(|s| s.span_for(config.column_count))
            .collect();
        let priorities: Vec<i32> = sections.iter().map(|s| s.priority).collect();

        let order = working_order(&heights, &priorities, config.sorts_by_height());
        let initial = run_pass(&order, &heights, &spans, config);

        let passes = config.effective_passes();
        let outcome = if passes > 0 {
            let (outcome, stats) = improve(initial, passes, |candidate| {
                run_pass(candidate, &heights, &spans, config)
            });
            log::debug!(
                "optimisation: {} sweeps, {} attempts, {} accepted",
                stats.sweeps,
                stats.attempts,
                stats.accepted
            );
            outcome
        } else {
            initial
        };

        let result = assemble(sections, &heights, &spans, outcome, config);
        log::debug!(
            "packed {} sections into {} columns with {}: total height {:.2}, utilization {:.1}%",
            sections.len(),
            config.column_count,
            config.strategy.label(),
            result.total_height,
            result.quality.utilization
        );
        result
    }
}

/// Packs with a fresh estimator and its own private cache.
pub fn pack(
    sections: &[SectionDescriptor],
    config: &PackingConfig,
) -> Result<LayoutResult, LayoutError> {
    Packer::default().pack(sections, config)
}

pub fn check_unique_ids(sections: &[SectionDescriptor]) -> Result<(), LayoutError> {
    let mut seen = HashSet::with_capacity(sections.len());
    for section in sections {
        if !seen.insert(&section.id) {
            return Err(LayoutError::DuplicateSectionId(section.id.to_string()));
        }
    }
    Ok(())
}

fn assemble(
    sections: &[SectionDescriptor],
    heights: &[f32],
    spans: &[usize],
    outcome: PassOutcome,
    config: &PackingConfig,
) -> LayoutResult {
    let mut position = vec![0; sections.len()];
    for (k, &i) in outcome.order.iter().enumerate() {
        position[i] = k;
    }

    let placements = sections
        .iter()
        .enumerate()
        .map(|(i, section)| PlacedSection {
            id: section.id.clone(),
            column: outcome.slots[i].column,
            span: spans[i],
            top: outcome.slots[i].top,
            height: heights[i],
            order: position[i],
        })
        .collect();

    let column_heights = content_heights(&outcome.running, config.gap);
    let total_height = column_heights.iter().copied().fold(0.0, f32::max);

    let mut result = LayoutResult {
        placements,
        total_height,
        column_count: config.column_count,
        column_heights,
        gap: config.gap,
        quality: Default::default(),
    };
    result.quality = quality::validate(&result, config.column_count);
    result
}
