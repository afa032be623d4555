use masonry_types::EPSILON;

/// Chosen resting position of one section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub column: usize,
    pub top: f32,
}

/// Running height per column during one packing pass.
///
/// Scoped to a single pass; every pass starts from a fresh state.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnState {
    running: Vec<f32>,
    gap: f32,
}

impl ColumnState {
    /// `column_count` is assumed validated (>= 1).
    pub fn new(column_count: usize, gap: f32) -> Self {
        Self {
            running: vec![0.0; column_count.max(1)],
            gap,
        }
    }

    pub fn from_heights(running: Vec<f32>, gap: f32) -> Self {
        let running = if running.is_empty() { vec![0.0] } else { running };
        Self { running, gap }
    }

    pub fn column_count(&self) -> usize {
        self.running.len()
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }

    pub fn running_heights(&self) -> &[f32] {
        &self.running
    }

    /// Tallest running height across `[column, column + span)`: where a
    /// section placed there would rest.
    pub fn candidate_top(&self, column: usize, span: usize) -> f32 {
        let end = (column + span).min(self.running.len());
        self.running[column.min(end)..end]
            .iter()
            .copied()
            .fold(0.0, f32::max)
    }

    /// Last valid starting column for a section of `span` columns.
    pub fn last_start(&self, span: usize) -> usize {
        self.running.len().saturating_sub(span.max(1))
    }

    /// Raises `[column, column + span)` to `top + height + gap`.
    pub fn commit(&mut self, column: usize, span: usize, top: f32, height: f32) {
        let next = top + height + self.gap;
        let end = (column + span).min(self.running.len());
        for h in &mut self.running[column.min(end)..end] {
            *h = next;
        }
    }

    /// Bottom of the last section in each column, without the trailing gap.
    pub fn content_heights(&self) -> Vec<f32> {
        content_heights(&self.running, self.gap)
    }
}

/// Strips the trailing gap from running heights. Empty columns stay at zero.
pub fn content_heights(running: &[f32], gap: f32) -> Vec<f32> {
    running
        .iter()
        .map(|&h| if h > EPSILON { (h - gap).max(0.0) } else { 0.0 })
        .collect()
}
