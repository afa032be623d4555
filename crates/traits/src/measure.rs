//! HeightProbe trait for abstracting rendered-size measurement.
//!
//! The orchestrator reads true heights through this trait after the host has
//! painted, so the engine never touches a real rendering surface.

use masonry_types::SectionId;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;
use thiserror::Error;

/// Error type for measurement sources that fail as a whole.
///
/// A single section without a measurement is not an error; probes report it
/// as `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbeError {
    #[error("Measurement surface is detached: {0}")]
    Detached(String),

    #[error("Height store lock poisoned")]
    LockPoisoned,
}

/// A source of rendered section heights.
///
/// # Implementations
///
/// - `InMemoryHeightProbe`: heights pushed by the host (or a test) before the
///   paint-settled signal
///
/// # Example
///
/// ```ignore
/// let probe = InMemoryHeightProbe::new();
/// probe.set("overview", 312.0)?;
/// let h = probe.measure(&SectionId::new("overview"))?;
/// ```
pub trait HeightProbe: Send + Sync + Debug {
    /// Rendered height of a section, or `None` if it has not been measured.
    fn measure(&self, id: &SectionId) -> Result<Option<f32>, ProbeError>;

    /// Measures several sections at once. Entries keep the order of `ids`.
    fn measure_all(&self, ids: &[SectionId]) -> Result<Vec<(SectionId, Option<f32>)>, ProbeError> {
        ids.iter()
            .map(|id| self.measure(id).map(|h| (id.clone(), h)))
            .collect()
    }

    /// Returns a human-readable name for this probe (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// A probe whose heights are written by the host.
#[derive(Debug, Default)]
pub struct InMemoryHeightProbe {
    heights: RwLock<HashMap<SectionId, f32>>,
}

impl InMemoryHeightProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a probe pre-populated with `(id, height)` pairs.
    pub fn with_heights<I, K>(heights: I) -> Self
    where
        I: IntoIterator<Item = (K, f32)>,
        K: Into<SectionId>,
    {
        let map = heights.into_iter().map(|(k, h)| (k.into(), h)).collect();
        Self {
            heights: RwLock::new(map),
        }
    }

    /// Records the rendered height of a section, replacing any earlier value.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::LockPoisoned` if the internal lock is poisoned.
    pub fn set(&self, id: impl Into<SectionId>, height: f32) -> Result<(), ProbeError> {
        let mut heights = self.heights.write().map_err(|_| ProbeError::LockPoisoned)?;
        heights.insert(id.into(), height);
        Ok(())
    }

    /// Returns `None` if the lock is poisoned or the section was never measured.
    pub fn remove(&self, id: &SectionId) -> Option<f32> {
        self.heights.write().ok()?.remove(id)
    }

    /// Does nothing if the lock is poisoned.
    pub fn clear(&self) {
        if let Ok(mut heights) = self.heights.write() {
            heights.clear();
        }
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.heights.read().map(|h| h.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.heights.read().map(|h| h.is_empty()).unwrap_or(true)
    }
}

impl HeightProbe for InMemoryHeightProbe {
    fn measure(&self, id: &SectionId) -> Result<Option<f32>, ProbeError> {
        let heights = self.heights.read().map_err(|_| ProbeError::LockPoisoned)?;
        Ok(heights.get(id).copied())
    }

    fn name(&self) -> &'static str {
        "InMemoryHeightProbe"
    }
}
