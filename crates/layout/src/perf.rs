use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Collects packing timings and estimator hit rates.
///
/// Packers hold a `Box<dyn Profiler>`; builds without the `profiling` feature
/// use [`NoOpProfiler`] and the calls inline away.
pub trait Profiler: Send + Sync + fmt::Debug {
    /// Adds `duration` to the phase named `key`.
    fn record(&self, key: &str, duration: Duration);
    /// A height came from a measurement (observed or cached).
    fn count_hit(&self);
    /// A height had to be estimated.
    fn count_miss(&self);
    /// Adds one packing run over `sections` sections taking `duration`.
    fn record_run(&self, sections: usize, duration: Duration);
    fn reset(&self);
    /// Mean time spent per placed section.
    fn avg_section_time(&self) -> Option<Duration>;
    /// Writes a summary through the `log` facade.
    fn log_summary(&self, _label: &str) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpProfiler;

impl Profiler for NoOpProfiler {
    #[inline(always)]
    fn record(&self, _key: &str, _duration: Duration) {}
    #[inline(always)]
    fn count_hit(&self) {}
    #[inline(always)]
    fn count_miss(&self) {}
    #[inline(always)]
    fn record_run(&self, _sections: usize, _duration: Duration) {}
    #[inline(always)]
    fn reset(&self) {}
    #[inline(always)]
    fn avg_section_time(&self) -> Option<Duration> {
        None
    }
}

/// Accumulating profiler used with the `profiling` feature and in tests.
#[derive(Debug, Default)]
pub struct DebugProfiler {
    phases: Mutex<HashMap<String, Duration>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
    runs: AtomicUsize,
    sections: AtomicUsize,
    total_ns: AtomicU64,
}

impl DebugProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Acquire)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Acquire)
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::Acquire)
    }

    /// Accumulated time for one phase, if it was ever recorded.
    pub fn phase(&self, key: &str) -> Option<Duration> {
        self.phases.lock().ok().and_then(|g| g.get(key).copied())
    }

    /// Sections placed per second across all recorded runs.
    pub fn throughput(&self) -> f64 {
        let sections = self.sections.load(Ordering::Acquire);
        let time_ns = self.total_ns.load(Ordering::Acquire);
        if time_ns == 0 {
            return 0.0;
        }
        sections as f64 / (time_ns as f64 / 1_000_000_000.0)
    }
}

impl Profiler for DebugProfiler {
    fn record(&self, key: &str, duration: Duration) {
        if let Ok(mut g) = self.phases.lock() {
            *g.entry(key.to_string()).or_default() += duration;
        }
    }

    fn count_hit(&self) {
        self.hits.fetch_add(1, Ordering::Release);
    }

    fn count_miss(&self) {
        self.misses.fetch_add(1, Ordering::Release);
    }

    fn record_run(&self, sections: usize, duration: Duration) {
        self.runs.fetch_add(1, Ordering::Release);
        self.sections.fetch_add(sections, Ordering::Release);
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.total_ns.fetch_add(nanos, Ordering::Release);
    }

    fn reset(&self) {
        if let Ok(mut g) = self.phases.lock() {
            g.clear();
        }
        self.hits.store(0, Ordering::Release);
        self.misses.store(0, Ordering::Release);
        self.runs.store(0, Ordering::Release);
        self.sections.store(0, Ordering::Release);
        self.total_ns.store(0, Ordering::Release);
    }

    fn avg_section_time(&self) -> Option<Duration> {
        let sections = self.sections.load(Ordering::Acquire);
        if sections == 0 {
            return None;
        }
        let time_ns = self.total_ns.load(Ordering::Acquire);
        Some(Duration::from_nanos(time_ns / sections as u64))
    }

    fn log_summary(&self, label: &str) {
        let hits = self.hits();
        let misses = self.misses();
        let total = hits + misses;
        if total == 0 {
            return;
        }

        log::info!("=== Packing profile ({}) ===", label);
        log::info!(
            "Measured heights: {} ({:.1}%), estimated: {}",
            hits,
            (hits as f64 / total as f64) * 100.0,
            misses
        );
        log::info!(
            "Runs: {}, throughput: {:.0} sections/sec",
            self.runs(),
            self.throughput()
        );
        if let Ok(phases) = self.phases.lock() {
            for (k, v) in phases.iter() {
                log::info!("{}: {:?}", k, v);
            }
        }
    }
}
