// src/pipeline/builder.rs
use super::config::OrchestratorConfig;
use super::driver::LayoutPipeline;
use super::orchestrator::LayoutOrchestrator;
use super::paint::FrameClock;
use crate::error::MasonryError;
use crate::events::LayoutEvent;
use masonry_layout::{
    Breakpoints, EstimatorConfig, HeightCache, HeightEstimator, PackingConfig, PackingStrategy,
    Packer, Profiler,
};
use masonry_traits::HeightProbe;
use std::sync::Arc;
use std::time::Duration;

/// A builder for a `LayoutOrchestrator` or a full async `LayoutPipeline`.
#[derive(Debug, Default)]
pub struct LayoutPipelineBuilder {
    config: OrchestratorConfig,
    estimator_config: EstimatorConfig,
    cache: Option<Arc<HeightCache>>,
    cache_capacity: Option<usize>,
    probe: Option<Arc<dyn HeightProbe>>,
    clock: Option<FrameClock>,
    profiler: Option<Box<dyn Profiler>>,
}

impl LayoutPipelineBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Replaces every orchestrator setting at once.
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_breakpoints(mut self, breakpoints: Breakpoints) -> Self {
        self.config.breakpoints = breakpoints;
        self
    }

    /// Packing template. Its column count is replaced by the breakpoint table.
    pub fn with_packing(mut self, packing: PackingConfig) -> Self {
        self.config.packing = packing;
        self
    }

    pub fn with_strategy(mut self, strategy: PackingStrategy) -> Self {
        self.config.packing.strategy = strategy;
        self
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.config.packing.gap = gap;
        self
    }

    pub fn with_safe_spacing(mut self, spacing: f32) -> Self {
        self.config.safe_spacing = spacing;
        self
    }

    pub fn with_paint_frames(mut self, frames: u64) -> Self {
        self.config.paint_frames = frames;
        self
    }

    pub fn with_paint_timeout(mut self, timeout: Duration) -> Self {
        self.config.paint_timeout = timeout;
        self
    }

    pub fn with_evict_absent(mut self, evict: bool) -> Self {
        self.config.evict_absent = evict;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity;
        self
    }

    pub fn with_estimator_config(mut self, config: EstimatorConfig) -> Self {
        self.estimator_config = config;
        self
    }

    /// Shares learned heights with every other surface holding `cache`.
    pub fn with_shared_cache(mut self, cache: Arc<HeightCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Capacity of the private cache. Ignored with a shared cache.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    pub fn with_probe(mut self, probe: Arc<dyn HeightProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn with_frame_clock(mut self, clock: FrameClock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_profiler(mut self, profiler: Box<dyn Profiler>) -> Self {
        self.profiler = Some(profiler);
        self
    }

    /// Builds the synchronous state machine only. No probe is needed.
    pub fn build_orchestrator(mut self) -> Result<LayoutOrchestrator, MasonryError> {
        let packer = self.packer();
        LayoutOrchestrator::new(self.config, packer)
    }

    /// Builds the async pipeline and the receiver its events arrive on.
    ///
    /// # Errors
    ///
    /// `MasonryError::Config` if no probe was configured, plus any
    /// configuration error from the orchestrator.
    pub fn build(
        mut self,
    ) -> Result<(LayoutPipeline, async_channel::Receiver<LayoutEvent>), MasonryError> {
        let probe = self.probe.take().ok_or_else(|| {
            MasonryError::Config(
                "No height probe has been configured. Use `with_probe`.".to_string(),
            )
        })?;
        let clock = self.clock.take().unwrap_or_default();
        let orchestrator = self.build_orchestrator()?;
        log::info!(
            "layout pipeline ready: probe {}, {} paint frames, {:?} fallback",
            probe.name(),
            orchestrator.config().paint_frames,
            orchestrator.config().paint_timeout
        );
        Ok(LayoutPipeline::new(orchestrator, probe, clock))
    }

    fn packer(&mut self) -> Packer {
        let cache = self.cache.take().unwrap_or_else(|| {
            Arc::new(match self.cache_capacity {
                Some(capacity) => HeightCache::with_capacity(capacity),
                None => HeightCache::new(),
            })
        });
        let estimator = HeightEstimator::new(self.estimator_config.clone(), cache);
        let packer = Packer::new(estimator);
        match self.profiler.take() {
            Some(profiler) => packer.with_profiler(profiler),
            None => packer,
        }
    }
}
