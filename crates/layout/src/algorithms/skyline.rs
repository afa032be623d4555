//! Skyline bookkeeping for the best-fit strategy.
//!
//! Instead of one running height per column the skyline keeps maximal runs of
//! equal height. Candidate positions are limited to segment edges, which is
//! enough to reach the lowest resting top for any span, and keeps selection
//! proportional to the number of distinct steps rather than the column count.

use super::column_state::Slot;
use masonry_types::EPSILON;

/// A run of adjacent columns at the same running height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: usize,
    pub width: usize,
    pub height: f32,
}

impl Segment {
    pub fn end(&self) -> usize {
        self.start + self.width
    }

    fn overlap(&self, start: usize, end: usize) -> usize {
        self.end().min(end).saturating_sub(self.start.max(start))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skyline {
    segments: Vec<Segment>,
    column_count: usize,
    gap: f32,
}

impl Skyline {
    pub fn new(column_count: usize, gap: f32) -> Self {
        let column_count = column_count.max(1);
        Self {
            segments: vec![Segment {
                start: 0,
                width: column_count,
                height: 0.0,
            }],
            column_count,
            gap,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Tallest segment under `[x, x + span)`.
    pub fn top_over(&self, x: usize, span: usize) -> f32 {
        let end = x + span;
        self.segments
            .iter()
            .filter(|s| s.overlap(x, end) > 0)
            .map(|s| s.height)
            .fold(0.0, f32::max)
    }

    /// Empty area a section resting at `top` over `[x, x + span)` would seal off
    /// beneath itself. This is the part of the added skyline area that depends
    /// on the position.
    pub fn trapped_area(&self, x: usize, span: usize, top: f32) -> f32 {
        let end = x + span;
        self.segments
            .iter()
            .map(|s| (top - s.height).max(0.0) * s.overlap(x, end) as f32)
            .sum()
    }

    /// Left-aligned and right-aligned positions at every segment edge.
    pub fn candidates(&self, span: usize) -> Vec<usize> {
        let mut xs: Vec<usize> = Vec::with_capacity(self.segments.len() * 2);
        for seg in &self.segments {
            if seg.start + span <= self.column_count {
                xs.push(seg.start);
            }
            if seg.end() >= span {
                xs.push(seg.end() - span);
            }
        }
        xs.sort_unstable();
        xs.dedup();
        xs
    }

    /// Lowest resting top first, then least added area, then leftmost.
    pub fn select(&self, span: usize) -> Slot {
        let span = span.clamp(1, self.column_count);
        let mut best: Option<(Slot, f32)> = None;
        for x in self.candidates(span) {
            let top = self.top_over(x, span);
            let area = self.trapped_area(x, span, top);
            let better = match best {
                None => true,
                Some((slot, best_area)) => {
                    top + EPSILON < slot.top
                        || ((top - slot.top).abs() <= EPSILON && area + EPSILON < best_area)
                }
            };
            if better {
                best = Some((Slot { column: x, top }, area));
            }
        }
        best.map(|(slot, _)| slot).unwrap_or(Slot {
            column: 0,
            top: self.top_over(0, span),
        })
    }

    /// Raises `[x, x + span)` to `top + height + gap` and merges equal neighbours.
    pub fn commit(&mut self, x: usize, span: usize, top: f32, height: f32) {
        let end = (x + span).min(self.column_count);
        let raised = Segment {
            start: x,
            width: end - x,
            height: top + height + self.gap,
        };

        let mut next: Vec<Segment> = Vec::with_capacity(self.segments.len() + 2);
        let mut inserted = false;
        for seg in &self.segments {
            if seg.end() <= x {
                next.push(*seg);
                continue;
            }
            if seg.start >= end {
                if !inserted {
                    next.push(raised);
                    inserted = true;
                }
                next.push(*seg);
                continue;
            }
            if seg.start < x {
                next.push(Segment {
                    start: seg.start,
                    width: x - seg.start,
                    height: seg.height,
                });
            }
            if seg.end() > end {
                if !inserted {
                    next.push(raised);
                    inserted = true;
                }
                next.push(Segment {
                    start: end,
                    width: seg.end() - end,
                    height: seg.height,
                });
            }
        }
        if !inserted {
            next.push(raised);
        }

        // Merge on contact. Exact equality keeps every column's height exact.
        let mut merged: Vec<Segment> = Vec::with_capacity(next.len());
        for seg in next {
            match merged.last_mut() {
                Some(last) if last.end() == seg.start && last.height == seg.height => {
                    last.width += seg.width;
                }
                _ => merged.push(seg),
            }
        }
        self.segments = merged;
    }

    /// Per-column running heights.
    pub fn running_heights(&self) -> Vec<f32> {
        let mut heights = Vec::with_capacity(self.column_count);
        for seg in &self.segments {
            heights.extend(std::iter::repeat_n(seg.height, seg.width));
        }
        heights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_splits_and_merges() {
        let mut sky = Skyline::new(4, 0.0);
        sky.commit(1, 2, 0.0, 50.0);
        assert_eq!(sky.running_heights(), vec![0.0, 50.0, 50.0, 0.0]);
        assert_eq!(sky.segments().len(), 3);

        sky.commit(0, 1, 0.0, 50.0);
        sky.commit(3, 1, 0.0, 50.0);
        assert_eq!(sky.segments(), &[Segment { start: 0, width: 4, height: 50.0 }]);
    }

    #[test]
    fn test_candidates_at_segment_edges() {
        let mut sky = Skyline::new(6, 0.0);
        sky.commit(2, 2, 0.0, 10.0);
        // Segments: [0,2) [2,4) [4,6)
        assert_eq!(sky.candidates(1), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(sky.candidates(3), vec![0, 1, 2, 3]);
        assert_eq!(sky.candidates(6), vec![0]);
    }

    #[test]
    fn test_select_lowest_then_least_trapped_area() {
        let mut sky = Skyline::new(4, 0.0);
        sky.commit(0, 1, 0.0, 30.0);
        sky.commit(2, 1, 0.0, 30.0);
        // Heights [30, 0, 30, 0]: any 2-wide window rests at 30.
        // [2,4) and [0,2) both trap 30 units; leftmost wins.
        let slot = sky.select(2);
        assert_eq!(slot, Slot { column: 0, top: 30.0 });

        let mut sky = Skyline::new(3, 0.0);
        sky.commit(0, 1, 0.0, 40.0);
        sky.commit(1, 1, 0.0, 40.0);
        sky.commit(2, 1, 0.0, 10.0);
        sky.commit(2, 1, 10.0, 30.0);
        // Heights [40, 40, 40] merge into one segment.
        assert_eq!(sky.segments().len(), 1);
    }

    #[test]
    fn test_choice_follows_running_heights() {
        let mut sky = Skyline::new(3, 0.0);
        assert_eq!(sky.select(1).column, 0);
        sky.commit(0, 1, 0.0, 100.0);
        assert_eq!(sky.select(1).column, 1);
        sky.commit(1, 1, 0.0, 100.0);
        assert_eq!(sky.select(1).column, 2);
    }

    #[test]
    fn test_area_breaks_ties_between_equal_tops() {
        let mut sky = Skyline::new(5, 0.0);
        sky.commit(0, 1, 0.0, 50.0);
        sky.commit(1, 1, 0.0, 10.0);
        sky.commit(3, 1, 0.0, 50.0);
        sky.commit(4, 1, 0.0, 48.0);
        // Heights [50, 10, 0, 50, 48]: the window over [1,3) rests lowest.
        let slot = sky.select(2);
        assert_eq!(slot, Slot { column: 1, top: 10.0 });

        sky.commit(1, 2, 10.0, 40.0);
        sky.commit(4, 1, 48.0, 2.0);
        sky.commit(0, 1, 50.0, 20.0);
        // Heights [70, 50, 50, 50, 50]: [1,3) and [3,5) both rest at 50 with
        // nothing trapped; [0,2) would trap 20 below a top of 70.
        let slot = sky.select(2);
        assert_eq!(slot, Slot { column: 1, top: 50.0 });

        let mut sky = Skyline::new(5, 0.0);
        sky.commit(0, 1, 0.0, 70.0);
        sky.commit(1, 1, 0.0, 50.0);
        sky.commit(2, 1, 0.0, 40.0);
        sky.commit(3, 2, 0.0, 50.0);
        // Heights [70, 50, 40, 50, 50]: [1,3), [2,4) and [3,5) all rest at 50
        // but only [3,5) traps nothing.
        let slot = sky.select(2);
        assert_eq!(slot, Slot { column: 3, top: 50.0 });
    }

    #[test]
    fn test_gap_is_added_to_running_height() {
        let mut sky = Skyline::new(2, 12.0);
        sky.commit(0, 2, 0.0, 100.0);
        assert_eq!(sky.running_heights(), vec![112.0, 112.0]);
    }
}
