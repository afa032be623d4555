// src/pipeline/driver.rs
use super::orchestrator::LayoutOrchestrator;
use super::paint::{FrameClock, PaintSignal};
use crate::error::MasonryError;
use crate::events::LayoutEvent;
use log::debug;
use masonry_traits::HeightProbe;
use masonry_types::{LayoutResult, SectionDescriptor};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Runs whole generations against a host that paints and signals frames.
///
/// Each call to [`LayoutPipeline::layout`] submits a generation, emits its
/// provisional placement, waits for paint, measures through the probe and
/// commits. Calls may overlap; a call whose generation was superseded while it
/// waited returns `Ok(None)` and emits nothing further.
#[derive(Debug, Clone)]
pub struct LayoutPipeline {
    orchestrator: Arc<Mutex<LayoutOrchestrator>>,
    probe: Arc<dyn HeightProbe>,
    clock: FrameClock,
    events: async_channel::Sender<LayoutEvent>,
}

impl LayoutPipeline {
    pub(crate) fn new(
        orchestrator: LayoutOrchestrator,
        probe: Arc<dyn HeightProbe>,
        clock: FrameClock,
    ) -> (Self, async_channel::Receiver<LayoutEvent>) {
        let capacity = orchestrator.config().event_capacity;
        let (tx, rx) = async_channel::bounded(capacity);
        let pipeline = Self {
            orchestrator: Arc::new(Mutex::new(orchestrator)),
            probe,
            clock,
            events: tx,
        };
        (pipeline, rx)
    }

    /// The clock the host ticks after each paint.
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn orchestrator(&self) -> &Arc<Mutex<LayoutOrchestrator>> {
        &self.orchestrator
    }

    /// Lays out one generation. Returns the committed layout, or `None` if a
    /// newer generation superseded this one.
    pub async fn layout(
        &self,
        sections: Vec<SectionDescriptor>,
        container_width: f32,
    ) -> Result<Option<LayoutResult>, MasonryError> {
        // Emitted under the lock to keep provisional events in generation
        // order; the frame baseline is read before the host can see them.
        let (generation, baseline, frames, timeout) = {
            let mut orch = self.orchestrator.lock().await;
            let submission = orch.submit(sections, container_width)?;
            let (frames, timeout) = (orch.config().paint_frames, orch.config().paint_timeout);
            let baseline = self.clock.frame();
            let generation = submission.generation;
            self.emit(LayoutEvent::Provisional {
                generation,
                layout: submission.provisional,
            })
            .await?;
            (generation, baseline, frames, timeout)
        };

        let paint = self.clock.wait_from(baseline, frames, timeout).await;
        if paint == PaintSignal::TimedOut {
            debug!("{}: measuring after paint fallback timeout", generation);
        }

        let commit = {
            let mut orch = self.orchestrator.lock().await;
            orch.on_paint_settled(generation, self.probe.as_ref())?
        };
        let Some(commit) = commit else {
            return Ok(None);
        };

        let layout = commit.layout.clone();
        self.emit(LayoutEvent::Committed {
            generation,
            layout: commit.layout,
            diff: commit.diff,
            paint,
        })
        .await?;
        Ok(Some(layout))
    }

    async fn emit(&self, event: LayoutEvent) -> Result<(), MasonryError> {
        self.events
            .send(event)
            .await
            .map_err(|_| MasonryError::ChannelClosed)
    }
}
