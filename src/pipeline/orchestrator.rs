// src/pipeline/orchestrator.rs
use super::config::OrchestratorConfig;
use crate::error::MasonryError;
use log::{debug, info};
use masonry_layout::packer::check_unique_ids;
use masonry_layout::{HeightEstimator, LayoutDiff, PackingConfig, Packer, quality};
use masonry_traits::HeightProbe;
use masonry_types::{
    Generation, LayoutResult, PlacedSection, SectionDescriptor, SectionId, is_usable_height,
};
use std::collections::HashSet;

/// Where the orchestrator is in the measure-then-commit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Computing the provisional single-column placement.
    MeasuringPhase1,
    /// Waiting for the host to paint the provisional placement.
    AwaitingPaint,
    /// Reading real heights and packing with them.
    MeasuringPhase2,
    /// The latest generation's layout has been delivered.
    Committed,
    /// The in-flight generation was abandoned and nothing replaced it yet.
    Cancelled,
}

impl Phase {
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            Phase::MeasuringPhase1 | Phase::AwaitingPaint | Phase::MeasuringPhase2
        )
    }
}

/// Returned by [`LayoutOrchestrator::submit`].
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub generation: Generation,
    pub column_count: usize,
    /// Overlap-free placement to render before any measurement.
    pub provisional: LayoutResult,
    /// Generation abandoned by this submission, if one was in flight.
    pub cancelled: Option<Generation>,
}

/// A committed generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub generation: Generation,
    pub layout: LayoutResult,
    pub diff: LayoutDiff,
    /// Sections whose measurement was missing or unusable.
    pub fallbacks: Vec<SectionId>,
}

#[derive(Debug)]
struct InFlight {
    generation: Generation,
    sections: Vec<SectionDescriptor>,
    /// Heights the provisional placement used; the fallback for failed measurements.
    estimates: Vec<f32>,
    packing: PackingConfig,
}

/// The two-phase layout state machine.
///
/// Synchronous and free of any rendering surface: the caller renders the
/// provisional placement, waits for paint, then hands in a [`HeightProbe`].
/// Only the most recently submitted generation can ever commit.
#[derive(Debug)]
pub struct LayoutOrchestrator {
    config: OrchestratorConfig,
    packer: Packer,
    phase: Phase,
    latest: Generation,
    in_flight: Option<InFlight>,
    committed: Option<(Generation, LayoutResult)>,
    // Ids this orchestrator measured into the (possibly shared) cache.
    recorded: HashSet<SectionId>,
}

impl LayoutOrchestrator {
    pub fn new(config: OrchestratorConfig, packer: Packer) -> Result<Self, MasonryError> {
        config.validate()?;
        Ok(Self {
            config,
            packer,
            phase: Phase::Idle,
            latest: Generation::default(),
            in_flight: None,
            committed: None,
            recorded: HashSet::new(),
        })
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn estimator(&self) -> &HeightEstimator {
        self.packer.estimator()
    }

    pub fn packer(&self) -> &Packer {
        &self.packer
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Highest generation requested so far.
    pub fn latest_generation(&self) -> Generation {
        self.latest
    }

    pub fn in_flight_generation(&self) -> Option<Generation> {
        self.in_flight.as_ref().map(|f| f.generation)
    }

    /// Whether `generation` is the one still allowed to commit.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.in_flight_generation() == Some(generation)
    }

    pub fn committed(&self) -> Option<&LayoutResult> {
        self.committed.as_ref().map(|(_, layout)| layout)
    }

    pub fn committed_generation(&self) -> Option<Generation> {
        self.committed.as_ref().map(|(generation, _)| *generation)
    }

    /// Starts a new generation for `sections` in a container `container_width` wide.
    ///
    /// Abandons any generation still in flight. Configuration errors and
    /// duplicate ids are rejected before any state changes.
    pub fn submit(
        &mut self,
        sections: Vec<SectionDescriptor>,
        container_width: f32,
    ) -> Result<Submission, MasonryError> {
        let packing = self.config.packing_for_width(container_width);
        packing.validate()?;
        check_unique_ids(&sections)?;

        let cancelled = self.cancel();
        self.latest = self.latest.next();
        let generation = self.latest;

        if self.config.evict_absent {
            self.evict_absent(&sections, generation);
        }

        self.phase = Phase::MeasuringPhase1;
        let estimates: Vec<f32> = sections
            .iter()
            .map(|s| self.packer.estimator().estimate(s))
            .collect();
        let provisional = self.safe_placement(&sections, &estimates, packing.column_count);
        debug!(
            "{}: provisional placement of {} sections ({} columns resolved for width {})",
            generation,
            sections.len(),
            packing.column_count,
            container_width
        );

        self.in_flight = Some(InFlight {
            generation,
            sections,
            estimates,
            packing,
        });
        self.phase = Phase::AwaitingPaint;

        Ok(Submission {
            generation,
            column_count: packing.column_count,
            provisional,
            cancelled,
        })
    }

    /// Abandons the in-flight generation, if any.
    pub fn cancel(&mut self) -> Option<Generation> {
        if !self.phase.is_in_flight() {
            return None;
        }
        let abandoned = self.in_flight.take().map(|f| f.generation);
        if let Some(generation) = abandoned {
            debug!("{}: cancelled before commit", generation);
        }
        self.phase = Phase::Cancelled;
        abandoned
    }

    /// Measures and commits `generation` once the host has painted it.
    ///
    /// Returns `Ok(None)` when `generation` has been superseded or is not
    /// waiting for paint. Missing or unusable measurements fall back to the
    /// height the provisional placement used for that section.
    ///
    /// # Errors
    ///
    /// A probe that fails as a whole leaves the generation waiting for paint
    /// so the caller can retry.
    pub fn on_paint_settled(
        &mut self,
        generation: Generation,
        probe: &dyn HeightProbe,
    ) -> Result<Option<Commit>, MasonryError> {
        if !self.is_current(generation) || self.phase != Phase::AwaitingPaint {
            debug!(
                "{}: discarded, latest is {} in phase {:?}",
                generation, self.latest, self.phase
            );
            return Ok(None);
        }
        let Some(flight) = self.in_flight.take() else {
            return Ok(None);
        };

        self.phase = Phase::MeasuringPhase2;
        let ids: Vec<SectionId> = flight.sections.iter().map(|s| s.id.clone()).collect();
        let measured = match probe.measure_all(&ids) {
            Ok(measured) => measured,
            Err(e) => {
                self.in_flight = Some(flight);
                self.phase = Phase::AwaitingPaint;
                return Err(e.into());
            }
        };

        let estimator = self.packer.estimator();
        let mut heights = Vec::with_capacity(flight.sections.len());
        let mut fallbacks = Vec::new();
        let samples = flight.sections.iter().zip(&flight.estimates).zip(measured);
        for ((section, &fallback), (_, height)) in samples {
            match height {
                Some(h) if is_usable_height(h) => {
                    estimator.record(section, h);
                    self.recorded.insert(section.id.clone());
                    heights.push(h);
                }
                other => {
                    debug!(
                        "{}: section '{}' measured {:?}, using estimate {:.2}",
                        generation, section.id, other, fallback
                    );
                    fallbacks.push(section.id.clone());
                    heights.push(fallback);
                }
            }
        }

        let layout = match self
            .packer
            .pack_heights(&flight.sections, &heights, &flight.packing)
        {
            Ok(layout) => layout,
            Err(e) => {
                self.in_flight = Some(flight);
                self.phase = Phase::AwaitingPaint;
                return Err(e.into());
            }
        };

        let diff = match &self.committed {
            Some((_, previous)) => LayoutDiff::between(previous, &layout),
            None => LayoutDiff::between(&LayoutResult::empty(0, 0.0), &layout),
        };
        info!(
            "{}: committed {} sections, total height {:.2}, {} ({:.1}% utilization, {} gaps)",
            generation,
            layout.len(),
            layout.total_height,
            layout.quality.rating,
            layout.quality.utilization,
            layout.quality.gap_count
        );

        self.committed = Some((generation, layout.clone()));
        self.phase = Phase::Committed;
        Ok(Some(Commit {
            generation,
            layout,
            diff,
            fallbacks,
        }))
    }

    /// Forgets cached heights this orchestrator recorded for sections that are
    /// no longer submitted. Entries recorded by other grids sharing the cache
    /// are untouched.
    fn evict_absent(&mut self, sections: &[SectionDescriptor], generation: Generation) {
        let current: HashSet<&SectionId> = sections.iter().map(|s| &s.id).collect();
        let stale: Vec<SectionId> = self
            .recorded
            .iter()
            .filter(|id| !current.contains(id))
            .cloned()
            .collect();
        if stale.is_empty() {
            return;
        }
        let evicted = self.packer.estimator().cache().remove_ids(&stale);
        for id in &stale {
            self.recorded.remove(id);
        }
        debug!("{}: evicted {} cached heights", generation, evicted);
    }

    /// Single column, full span, stacked with the configured spacing.
    ///
    /// Needs no measurement and cannot overlap.
    fn safe_placement(
        &self,
        sections: &[SectionDescriptor],
        heights: &[f32],
        column_count: usize,
    ) -> LayoutResult {
        let spacing = self.config.safe_spacing;
        let mut top = 0.0_f32;
        let placements: Vec<PlacedSection> = sections
            .iter()
            .zip(heights)
            .enumerate()
            .map(|(order, (section, &height))| {
                let placed = PlacedSection {
                    id: section.id.clone(),
                    column: 0,
                    span: column_count,
                    top,
                    height,
                    order,
                };
                top += height + spacing;
                placed
            })
            .collect();

        let total_height = placements.last().map(|p| p.bottom()).unwrap_or(0.0);
        let mut layout = LayoutResult {
            placements,
            total_height,
            column_count,
            column_heights: vec![total_height; column_count],
            gap: spacing,
            quality: Default::default(),
        };
        layout.quality = quality::validate(&layout, column_count);
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use masonry_traits::{InMemoryHeightProbe, ProbeError};
    use masonry_types::SectionKind;

    fn orchestrator() -> LayoutOrchestrator {
        LayoutOrchestrator::new(OrchestratorConfig::default(), Packer::default()).unwrap()
    }

    fn sections(n: usize) -> Vec<SectionDescriptor> {
        (0..n)
            .map(|i| SectionDescriptor::new(format!("s{}", i), SectionKind::Info))
            .collect()
    }

    #[derive(Debug)]
    struct DetachedProbe;

    impl HeightProbe for DetachedProbe {
        fn measure(&self, _id: &SectionId) -> Result<Option<f32>, ProbeError> {
            Err(ProbeError::Detached("surface gone".to_string()))
        }

        fn name(&self) -> &'static str {
            "DetachedProbe"
        }
    }

    #[test]
    fn test_submit_produces_safe_placement() {
        let mut orch = orchestrator();
        let submission = orch.submit(sections(3), 1000.0).unwrap();

        assert_eq!(submission.generation, Generation(1));
        assert_eq!(submission.column_count, 3);
        assert_eq!(orch.phase(), Phase::AwaitingPaint);

        let provisional = &submission.provisional;
        assert!(provisional.placements.iter().all(|p| p.column == 0 && p.span == 3));
        // Info estimates at 160, stacked with 16 spacing.
        let tops: Vec<f32> = provisional.placements.iter().map(|p| p.top).collect();
        assert_eq!(tops, vec![0.0, 176.0, 352.0]);
        assert_eq!(provisional.total_height, 512.0);
        assert!(provisional.overlapping_pairs().is_empty());
    }

    #[test]
    fn test_paint_commits_with_measured_heights() {
        let mut orch = orchestrator();
        let submission = orch.submit(sections(4), 700.0).unwrap();
        let probe = InMemoryHeightProbe::with_heights([
            ("s0", 300.0),
            ("s1", 100.0),
            ("s2", 200.0),
            ("s3", 150.0),
        ]);

        let commit = orch
            .on_paint_settled(submission.generation, &probe)
            .unwrap()
            .unwrap();
        assert_eq!(orch.phase(), Phase::Committed);
        assert_eq!(commit.layout.column_count, 2);
        assert!(commit.fallbacks.is_empty());
        assert_eq!(commit.diff.added.len(), 4);
        assert_eq!(orch.committed_generation(), Some(submission.generation));
        assert_eq!(orch.estimator().cache().peek(&SectionId::new("s0")), Some(300.0));
    }

    #[test]
    fn test_new_submission_cancels_in_flight() {
        let mut orch = orchestrator();
        let g1 = orch.submit(sections(10), 1000.0).unwrap().generation;
        let second = orch.submit(sections(12), 1000.0).unwrap();
        assert_eq!(second.cancelled, Some(g1));

        let probe = InMemoryHeightProbe::new();
        assert!(orch.on_paint_settled(g1, &probe).unwrap().is_none());
        assert_eq!(orch.phase(), Phase::AwaitingPaint);

        let commit = orch.on_paint_settled(second.generation, &probe).unwrap().unwrap();
        assert_eq!(commit.layout.len(), 12);
        assert_eq!(orch.committed_generation(), Some(second.generation));
    }

    #[test]
    fn test_commit_happens_once() {
        let mut orch = orchestrator();
        let generation = orch.submit(sections(2), 1000.0).unwrap().generation;
        let probe = InMemoryHeightProbe::new();
        assert!(orch.on_paint_settled(generation, &probe).unwrap().is_some());
        assert!(orch.on_paint_settled(generation, &probe).unwrap().is_none());
    }

    #[test]
    fn test_unusable_measurements_fall_back() {
        let mut orch = orchestrator();
        let generation = orch.submit(sections(3), 1000.0).unwrap().generation;
        let probe = InMemoryHeightProbe::with_heights([("s0", 250.0), ("s1", -5.0)]);

        let commit = orch.on_paint_settled(generation, &probe).unwrap().unwrap();
        assert_eq!(
            commit.fallbacks,
            vec![SectionId::new("s1"), SectionId::new("s2")]
        );
        // Fallbacks keep the provisional Info estimate of 160.
        let heights: Vec<f32> = commit.layout.placements.iter().map(|p| p.height).collect();
        assert_eq!(heights, vec![250.0, 160.0, 160.0]);
    }

    #[test]
    fn test_fallback_does_not_depend_on_position() {
        let mut orch = orchestrator();
        let input: Vec<SectionDescriptor> = ["x0", "x1", "x2"]
            .into_iter()
            .map(|id| SectionDescriptor::new(id, SectionKind::Info))
            .collect();
        let submission = orch.submit(input, 1000.0).unwrap();
        let provisional: Vec<f32> = submission
            .provisional
            .placements
            .iter()
            .map(|p| p.height)
            .collect();
        assert_eq!(provisional, vec![160.0, 160.0, 160.0]);

        let probe = InMemoryHeightProbe::with_heights([("x1", 400.0)]);
        let commit = orch
            .on_paint_settled(submission.generation, &probe)
            .unwrap()
            .unwrap();
        assert_eq!(commit.fallbacks, vec![SectionId::new("x0"), SectionId::new("x2")]);
        let heights: Vec<f32> = commit.layout.placements.iter().map(|p| p.height).collect();
        assert_eq!(heights, vec![160.0, 400.0, 160.0]);
        // The measurement still teaches the kind for the next generation.
        assert_eq!(orch.estimator().cache().kind_ratio(SectionKind::Info), Some(2.5));
    }

    #[test]
    fn test_probe_failure_keeps_generation_waiting() {
        let mut orch = orchestrator();
        let generation = orch.submit(sections(2), 1000.0).unwrap().generation;

        let err = orch.on_paint_settled(generation, &DetachedProbe).unwrap_err();
        assert!(matches!(err, MasonryError::Probe(ProbeError::Detached(_))));
        assert_eq!(orch.phase(), Phase::AwaitingPaint);
        assert!(orch.is_current(generation));

        let retry = orch.on_paint_settled(generation, &InMemoryHeightProbe::new());
        assert!(retry.unwrap().is_some());
    }

    #[test]
    fn test_rejected_submission_leaves_state_untouched() {
        let mut orch = orchestrator();
        let generation = orch.submit(sections(2), 1000.0).unwrap().generation;

        let mut duplicated = sections(2);
        duplicated.push(SectionDescriptor::new("s0", SectionKind::List));
        let err = orch.submit(duplicated, 1000.0).unwrap_err();
        assert!(matches!(err, MasonryError::Layout(_)));
        assert!(orch.is_current(generation));
        assert_eq!(orch.latest_generation(), generation);
    }

    #[test]
    fn test_explicit_cancel() {
        let mut orch = orchestrator();
        let generation = orch.submit(sections(2), 1000.0).unwrap().generation;
        assert_eq!(orch.cancel(), Some(generation));
        assert_eq!(orch.phase(), Phase::Cancelled);
        assert_eq!(orch.cancel(), None);
        assert!(
            orch.on_paint_settled(generation, &InMemoryHeightProbe::new())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_absent_sections_are_evicted() {
        let mut orch = orchestrator();
        let generation = orch.submit(sections(3), 1000.0).unwrap().generation;
        let probe = InMemoryHeightProbe::with_heights([("s0", 200.0), ("s1", 200.0), ("s2", 200.0)]);
        orch.on_paint_settled(generation, &probe).unwrap();
        assert_eq!(orch.estimator().cache().len(), 3);

        orch.submit(sections(1), 1000.0).unwrap();
        assert_eq!(orch.estimator().cache().len(), 1);
    }

    #[test]
    fn test_eviction_spares_other_grids_on_shared_cache() {
        let cache = std::sync::Arc::new(masonry_layout::HeightCache::new());
        let packer = || Packer::new(HeightEstimator::with_cache(std::sync::Arc::clone(&cache)));
        let mut grid_a = LayoutOrchestrator::new(OrchestratorConfig::default(), packer()).unwrap();
        let mut grid_b = LayoutOrchestrator::new(OrchestratorConfig::default(), packer()).unwrap();

        let a1 = SectionId::new("grid-a-1");
        let generation = grid_a
            .submit(vec![SectionDescriptor::new("grid-a-1", SectionKind::Info)], 1000.0)
            .unwrap()
            .generation;
        let probe = InMemoryHeightProbe::with_heights([("grid-a-1", 420.0)]);
        grid_a.on_paint_settled(generation, &probe).unwrap();
        assert_eq!(cache.peek(&a1), Some(420.0));

        let generation = grid_b
            .submit(vec![SectionDescriptor::new("grid-b-1", SectionKind::Info)], 1000.0)
            .unwrap()
            .generation;
        assert_eq!(cache.peek(&a1), Some(420.0));
        let probe = InMemoryHeightProbe::with_heights([("grid-b-1", 180.0)]);
        grid_b.on_paint_settled(generation, &probe).unwrap();

        // Grid A dropping its own section evicts only that entry.
        grid_a
            .submit(vec![SectionDescriptor::new("grid-a-2", SectionKind::Info)], 1000.0)
            .unwrap();
        assert_eq!(cache.peek(&a1), None);
        assert_eq!(cache.peek(&SectionId::new("grid-b-1")), Some(180.0));
    }
}
