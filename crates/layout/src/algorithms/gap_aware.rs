use super::column_state::{ColumnState, Slot};
use masonry_types::EPSILON;

/// Normalised height mismatch a placement would leave against the columns
/// immediately outside its span.
///
/// The mismatch of each neighbour is divided by the new running height so the
/// penalty stays roughly in `[0, 1]` whatever the units; the weight converts it
/// back to height units.
pub fn neighbour_penalty(state: &ColumnState, column: usize, span: usize, height: f32) -> f32 {
    let heights = state.running_heights();
    let next = state.candidate_top(column, span) + height + state.gap();
    let scale = next.max(1.0);

    let left = column.checked_sub(1).and_then(|c| heights.get(c));
    let right = heights.get(column + span);

    let (sum, count) = left
        .into_iter()
        .chain(right)
        .fold((0.0_f32, 0_u32), |(sum, n), &h| (sum + (next - h).abs() / scale, n + 1));

    if count == 0 { 0.0 } else { sum / count as f32 }
}

/// Shortest-column selection scored as `top + weight * neighbour_penalty`.
///
/// Ties go to the smallest column index.
pub fn select_gap_aware(state: &ColumnState, span: usize, height: f32, weight: f32) -> Slot {
    let span = span.clamp(1, state.column_count());
    let score = |column: usize| {
        let top = state.candidate_top(column, span);
        (top, top + weight * neighbour_penalty(state, column, span, height))
    };

    let (top, mut best_score) = score(0);
    let mut best = Slot { column: 0, top };
    for column in 1..=state.last_start(span) {
        let (top, s) = score(column);
        if s + EPSILON < best_score {
            best_score = s;
            best = Slot { column, top };
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::shortest_column::select_shortest;

    #[test]
    fn test_zero_weight_matches_shortest_column() {
        for heights in [
            vec![0.0, 0.0, 0.0],
            vec![120.0, 80.0, 300.0],
            vec![40.0, 40.0, 10.0, 90.0],
        ] {
            let state = ColumnState::from_heights(heights, 0.0);
            for span in 1..=state.column_count() {
                assert_eq!(
                    select_gap_aware(&state, span, 100.0, 0.0),
                    select_shortest(&state, span)
                );
            }
        }
    }

    #[test]
    fn test_choice_follows_running_heights() {
        let state = ColumnState::from_heights(vec![0.0, 200.0, 200.0], 0.0);
        assert_eq!(select_gap_aware(&state, 1, 200.0, 100.0).column, 0);

        let state = ColumnState::from_heights(vec![200.0, 200.0, 0.0], 0.0);
        assert_eq!(select_gap_aware(&state, 1, 200.0, 100.0).column, 2);
    }

    #[test]
    fn test_penalty_prefers_evening_out_neighbours() {
        // Columns 0 and 2 rest at the same height, but filling column 2 lines
        // it up with column 3 while column 0 stays far below column 1.
        let state = ColumnState::from_heights(vec![100.0, 500.0, 100.0, 300.0], 0.0);
        let shortest = select_shortest(&state, 1);
        assert_eq!(shortest.column, 0);

        let aware = select_gap_aware(&state, 1, 200.0, 100.0);
        assert_eq!(aware.column, 2);
        assert_eq!(aware.top, 100.0);
    }

    #[test]
    fn test_full_width_has_no_neighbours() {
        let state = ColumnState::from_heights(vec![10.0, 20.0], 0.0);
        assert_eq!(neighbour_penalty(&state, 0, 2, 50.0), 0.0);
    }
}
