//! Column packing strategies.
//!
//! A packing pass walks the working order once, asks the strategy's selector
//! for a slot, and commits it. Passes own their column state; nothing is
//! shared between passes.

pub mod column_state;
pub mod first_fit;
pub mod gap_aware;
pub mod optimize;
pub mod ordering;
pub mod shortest_column;
pub mod skyline;

use crate::config::{PackingConfig, PackingStrategy};
use column_state::{ColumnState, Slot};
use first_fit::Shelves;
use skyline::Skyline;

/// Result of a single placement pass over a working order.
#[derive(Debug, Clone, PartialEq)]
pub struct PassOutcome {
    /// Working order used, as input indices.
    pub order: Vec<usize>,
    /// Chosen slot per input index.
    pub slots: Vec<Slot>,
    /// Running height per column at completion (trailing gap included).
    pub running: Vec<f32>,
    pub total_height: f32,
    /// Position in `order` of the section whose bottom edge is furthest down; the
    /// later one on ties. `None` for an empty order.
    pub critical: Option<usize>,
}

/// Places every section of `order` with the configured strategy.
///
/// `heights` and `spans` are indexed by input index; spans are already clamped
/// to the column count.
pub fn run_pass(
    order: &[usize],
    heights: &[f32],
    spans: &[usize],
    config: &PackingConfig,
) -> PassOutcome {
    let mut slots = vec![Slot { column: 0, top: 0.0 }; heights.len()];

    let running = match config.strategy {
        PackingStrategy::SkylineBestFit => {
            let mut sky = Skyline::new(config.column_count, config.gap);
            for &i in order {
                let slot = sky.select(spans[i]);
                sky.commit(slot.column, spans[i], slot.top, heights[i]);
                log::trace!("section #{} -> column {} at {:.2}", i, slot.column, slot.top);
                slots[i] = slot;
            }
            sky.running_heights()
        }
        PackingStrategy::FirstFitDecreasingHeight => {
            let mut state = ColumnState::new(config.column_count, config.gap);
            let mut shelves = Shelves::new(config.column_count);
            for &i in order {
                let column = shelves.assign(spans[i]);
                let slot = Slot {
                    column,
                    top: state.candidate_top(column, spans[i]),
                };
                state.commit(slot.column, spans[i], slot.top, heights[i]);
                log::trace!("section #{} -> column {} at {:.2}", i, slot.column, slot.top);
                slots[i] = slot;
            }
            state.running_heights().to_vec()
        }
        PackingStrategy::ShortestColumn | PackingStrategy::GapAware => {
            let mut state = ColumnState::new(config.column_count, config.gap);
            for &i in order {
                let slot = match config.strategy {
                    PackingStrategy::GapAware => gap_aware::select_gap_aware(
                        &state,
                        spans[i],
                        heights[i],
                        config.gap_penalty_weight,
                    ),
                    _ => shortest_column::select_shortest(&state, spans[i]),
                };
                state.commit(slot.column, spans[i], slot.top, heights[i]);
                log::trace!("section #{} -> column {} at {:.2}", i, slot.column, slot.top);
                slots[i] = slot;
            }
            state.running_heights().to_vec()
        }
    };

    let total_height = running.iter().copied().fold(0.0, f32::max);
    let critical = critical_position(order, &slots, heights);
    PassOutcome {
        order: order.to_vec(),
        slots,
        running,
        total_height,
        critical,
    }
}

fn critical_position(order: &[usize], slots: &[Slot], heights: &[f32]) -> Option<usize> {
    let mut critical = None;
    let mut lowest = f32::NEG_INFINITY;
    for (position, &i) in order.iter().enumerate() {
        let bottom = slots[i].top + heights[i];
        if bottom >= lowest {
            lowest = bottom;
            critical = Some(position);
        }
    }
    critical
}
