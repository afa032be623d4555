use super::column_state::{ColumnState, Slot};
use masonry_types::EPSILON;

/// Picks the starting column whose window `[c, c + span)` rests lowest.
///
/// Ties go to the smallest column index.
pub fn select_shortest(state: &ColumnState, span: usize) -> Slot {
    let span = span.clamp(1, state.column_count());
    let mut best = Slot {
        column: 0,
        top: state.candidate_top(0, span),
    };
    for column in 1..=state.last_start(span) {
        let top = state.candidate_top(column, span);
        if top + EPSILON < best.top {
            best = Slot { column, top };
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_follows_running_heights() {
        let state = ColumnState::from_heights(vec![0.0, 0.0, 0.0], 0.0);
        assert_eq!(select_shortest(&state, 1).column, 0);

        let state = ColumnState::from_heights(vec![50.0, 0.0, 0.0], 0.0);
        assert_eq!(select_shortest(&state, 1).column, 1);

        let state = ColumnState::from_heights(vec![50.0, 30.0, 10.0], 0.0);
        assert_eq!(select_shortest(&state, 1), Slot { column: 2, top: 10.0 });
    }

    #[test]
    fn test_ties_go_to_smallest_column() {
        let state = ColumnState::from_heights(vec![20.0, 10.0, 10.0, 10.0], 0.0);
        assert_eq!(select_shortest(&state, 1).column, 1);
    }

    #[test]
    fn test_spanning_window() {
        let state = ColumnState::from_heights(vec![100.0, 0.0, 40.0, 30.0], 0.0);
        // Windows of two: [100, 40, 40]
        let slot = select_shortest(&state, 2);
        assert_eq!(slot, Slot { column: 1, top: 40.0 });
        // Full width rests on the tallest column.
        assert_eq!(select_shortest(&state, 4), Slot { column: 0, top: 100.0 });
    }

    #[test]
    fn test_oversized_span_clamped() {
        let state = ColumnState::from_heights(vec![5.0, 7.0], 0.0);
        assert_eq!(select_shortest(&state, 99), Slot { column: 0, top: 7.0 });
    }
}
