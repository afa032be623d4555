use super::PassOutcome;
use masonry_types::EPSILON;

/// Adjacent swaps tried per sweep, walking back from the section that ends the
/// tallest column.
pub const SWAP_WINDOW: usize = 8;

/// Counters from a run of [`improve`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizeStats {
    pub sweeps: usize,
    pub attempts: usize,
    pub accepted: usize,
}

/// Local improvement by adjacent swaps in the working order.
///
/// A sweep looks at the section whose bottom edge sets the total height and
/// tries moving it earlier, one adjacent swap at a time, up to [`SWAP_WINDOW`]
/// positions back. Each trial is a full re-run of placement; the first swap
/// that strictly lowers the total height is kept and ends the sweep. Stops
/// after `passes` sweeps or the first sweep that changes nothing, so a call
/// costs at most `passes * SWAP_WINDOW` placement runs.
pub fn improve<F>(initial: PassOutcome, passes: usize, mut run: F) -> (PassOutcome, OptimizeStats)
where
    F: FnMut(&[usize]) -> PassOutcome,
{
    let mut stats = OptimizeStats::default();
    let mut best = initial;
    if best.order.len() < 2 {
        return (best, stats);
    }

    for _ in 0..passes {
        stats.sweeps += 1;
        let Some(critical) = best.critical else {
            break;
        };

        let mut order = best.order.clone();
        let mut accepted = None;
        for i in (critical.saturating_sub(SWAP_WINDOW)..critical).rev() {
            // Bubble the critical section one slot earlier; `order[i + 1]`
            // holds it after the previous trial.
            order.swap(i, i + 1);
            stats.attempts += 1;
            let candidate = run(&order);
            if candidate.total_height + EPSILON < best.total_height {
                log::trace!(
                    "moving position {} to {} lowers total height {:.2} -> {:.2}",
                    critical,
                    i,
                    best.total_height,
                    candidate.total_height
                );
                accepted = Some(candidate);
                break;
            }
        }

        match accepted {
            Some(candidate) => {
                best = candidate;
                stats.accepted += 1;
            }
            None => break,
        }
    }
    (best, stats)
}
