use indexmap::IndexMap;
use masonry_types::{SectionId, SectionKind, is_usable_height};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Weight of a new sample in the per-kind moving average.
const KIND_LEARNING_RATE: f32 = 0.25;

/// Bounds on the per-kind correction so one outlier cannot blow up estimates.
const MIN_KIND_RATIO: f32 = 0.25;
const MAX_KIND_RATIO: f32 = 4.0;

/// Learned ratio of observed height to formula estimate for one section kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindCorrection {
    pub ratio: f32,
    pub samples: u32,
}

impl KindCorrection {
    fn absorb(&mut self, sample: f32) {
        self.ratio += (sample - self.ratio) * KIND_LEARNING_RATE;
        self.ratio = self.ratio.clamp(MIN_KIND_RATIO, MAX_KIND_RATIO);
        self.samples = self.samples.saturating_add(1);
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    height: f32,
    stamp: u64,
}

#[derive(Default)]
struct CacheState {
    observed: IndexMap<SectionId, Entry>,
    // Recency stamp -> id, least recently used first.
    recency: BTreeMap<u64, SectionId>,
    clock: u64,
    kinds: HashMap<SectionKind, KindCorrection>,
}

impl CacheState {
    fn next_stamp(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn touch(&mut self, id: &SectionId) -> Option<f32> {
        let stamp = self.next_stamp();
        let entry = self.observed.get_mut(id)?;
        self.recency.remove(&entry.stamp);
        entry.stamp = stamp;
        self.recency.insert(stamp, id.clone());
        Some(entry.height)
    }

    fn put(&mut self, id: SectionId, height: f32) {
        let stamp = self.next_stamp();
        if let Some(previous) = self.observed.insert(id.clone(), Entry { height, stamp }) {
            self.recency.remove(&previous.stamp);
        }
        self.recency.insert(stamp, id);
    }

    fn take(&mut self, id: &SectionId) -> Option<f32> {
        let entry = self.observed.swap_remove(id)?;
        self.recency.remove(&entry.stamp);
        Some(entry.height)
    }

    fn evict_oldest(&mut self) -> Option<SectionId> {
        let (_, id) = self.recency.pop_first()?;
        self.observed.swap_remove(&id);
        Some(id)
    }
}

/// Recorded real heights, shared by every estimator holding the same instance.
///
/// Per-id entries are bounded by an LRU policy; per-kind corrections are a
/// fixed-size table and never evicted. Two grids only share learning when they
/// share the `Arc<HeightCache>`.
pub struct HeightCache {
    state: RwLock<CacheState>,
    capacity: usize,
}

impl Default for HeightCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl std::fmt::Debug for HeightCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeightCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl HeightCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the recorded height of `id` and marks it most recently used.
    pub fn observed(&self, id: &SectionId) -> Option<f32> {
        self.state.write().ok()?.touch(id)
    }

    /// Returns the recorded height without touching recency.
    pub fn peek(&self, id: &SectionId) -> Option<f32> {
        self.state.read().ok()?.observed.get(id).map(|e| e.height)
    }

    pub fn contains(&self, id: &SectionId) -> bool {
        self.state
            .read()
            .map(|s| s.observed.contains_key(id))
            .unwrap_or(false)
    }

    /// Stores the true height of a section, evicting the least recently used
    /// entries past capacity. Unusable heights are ignored.
    pub fn insert(&self, id: SectionId, height: f32) {
        if !is_usable_height(height) {
            return;
        }
        if let Ok(mut state) = self.state.write() {
            state.put(id, height);
            while state.observed.len() > self.capacity {
                match state.evict_oldest() {
                    Some(evicted) => log::trace!("height cache evicted '{}'", evicted),
                    None => break,
                }
            }
        }
    }

    /// Stores the true height and folds `observed / formula_estimate` into the
    /// correction for `kind`.
    pub fn record(&self, id: SectionId, kind: SectionKind, observed: f32, formula_estimate: f32) {
        if !is_usable_height(observed) {
            return;
        }
        self.insert(id, observed);
        if !is_usable_height(formula_estimate) {
            return;
        }
        let sample = (observed / formula_estimate).clamp(MIN_KIND_RATIO, MAX_KIND_RATIO);
        if let Ok(mut state) = self.state.write() {
            state
                .kinds
                .entry(kind)
                .and_modify(|c| c.absorb(sample))
                .or_insert(KindCorrection {
                    ratio: sample,
                    samples: 1,
                });
        }
    }

    pub fn kind_correction(&self, kind: SectionKind) -> Option<KindCorrection> {
        self.state.read().ok()?.kinds.get(&kind).copied()
    }

    pub fn kind_ratio(&self, kind: SectionKind) -> Option<f32> {
        self.kind_correction(kind).map(|c| c.ratio)
    }

    /// Drops the per-id entries of `ids`. Returns how many were present.
    ///
    /// Other ids and per-kind corrections are left alone, so grids sharing the
    /// cache only evict what they recorded themselves.
    pub fn remove_ids<'a, I>(&self, ids: I) -> usize
    where
        I: IntoIterator<Item = &'a SectionId>,
    {
        match self.state.write() {
            Ok(mut state) => ids
                .into_iter()
                .filter(|id| state.take(id).is_some())
                .count(),
            Err(_) => 0,
        }
    }

    pub fn remove(&self, id: &SectionId) -> Option<f32> {
        self.state.write().ok()?.take(id)
    }

    /// Forgets both per-id heights and per-kind corrections.
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.write() {
            state.observed.clear();
            state.recency.clear();
            state.kinds.clear();
        }
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.observed.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
