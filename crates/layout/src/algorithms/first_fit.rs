//! Level-oriented first fit for the FFDH strategy.
//!
//! Sections are assigned to shelves (rows of the column grid) left to right:
//! each goes onto the first shelf with enough free columns, or opens a new
//! one. The shelf only decides the column; the vertical offset still comes
//! from the running height of those columns, so sections stack directly under
//! their predecessors instead of waiting for the tallest item of the shelf.

/// Free-column bookkeeping for open shelves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shelves {
    column_count: usize,
    used: Vec<usize>,
}

impl Shelves {
    pub fn new(column_count: usize) -> Self {
        Self {
            column_count: column_count.max(1),
            used: Vec::new(),
        }
    }

    /// Starting column for a section of `span` columns.
    pub fn assign(&mut self, span: usize) -> usize {
        let span = span.clamp(1, self.column_count);
        if let Some(used) = self
            .used
            .iter_mut()
            .find(|used| **used + span <= self.column_count)
        {
            let column = *used;
            *used += span;
            return column;
        }
        self.used.push(span);
        0
    }
}
