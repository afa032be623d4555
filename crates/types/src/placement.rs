use crate::ids::SectionId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Tolerance for floating point comparisons of vertical offsets.
pub const EPSILON: f32 = 0.01;

/// Output unit of a packing pass. Never mutated after the pass produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedSection {
    pub id: SectionId,
    /// Starting column index.
    pub column: usize,
    /// Columns occupied, already clamped to the column count.
    pub span: usize,
    pub top: f32,
    /// Height used to compute the placement (estimated or observed).
    pub height: f32,
    /// Position of this section in the placement sequence of its pass.
    pub order: usize,
}

impl PlacedSection {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn columns(&self) -> Range<usize> {
        self.column..self.column + self.span
    }

    pub fn shares_column(&self, other: &PlacedSection) -> bool {
        self.column < other.column + other.span && other.column < self.column + self.span
    }

    /// Whether two placements collide, treating `gap` as required clearance
    /// between vertically stacked sections in a shared column.
    pub fn overlaps(&self, other: &PlacedSection, gap: f32) -> bool {
        self.shares_column(other)
            && self.top + EPSILON < other.bottom() + gap
            && other.top + EPSILON < self.bottom() + gap
    }

    /// Area in column-units times height.
    pub fn area(&self) -> f32 {
        self.height * self.span as f32
    }
}

/// Rating bucket derived from utilization and gap count.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityRating {
    pub const fn label(self) -> &'static str {
        match self {
            QualityRating::Excellent => "excellent",
            QualityRating::Good => "good",
            QualityRating::Fair => "fair",
            QualityRating::Poor => "poor",
        }
    }
}

impl fmt::Display for QualityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Diagnostic metrics of a completed layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    /// Covered area over bounding area, in percent (0-100).
    pub utilization: f32,
    /// Columns whose trailing empty space exceeds the gap threshold.
    pub gap_count: usize,
    /// Population variance of the final column heights.
    pub height_variance: f32,
    pub rating: QualityRating,
}

impl QualityReport {
    /// Report of a layout with no area at all: nothing is wasted.
    pub fn empty() -> Self {
        Self {
            utilization: 100.0,
            gap_count: 0,
            height_variance: 0.0,
            rating: QualityRating::Excellent,
        }
    }
}

impl Default for QualityReport {
    fn default() -> Self {
        Self::empty()
    }
}

/// Complete output of one packing pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    /// One entry per input section, in input order.
    pub placements: Vec<PlacedSection>,
    /// Bottom of the lowest section; excludes the trailing gap. See
    /// [`LayoutResult::running_height`] for the extent including it.
    pub total_height: f32,
    pub column_count: usize,
    /// Content bottom of each column (running height minus the trailing gap).
    pub column_heights: Vec<f32>,
    pub gap: f32,
    pub quality: QualityReport,
}

impl LayoutResult {
    pub fn empty(column_count: usize, gap: f32) -> Self {
        Self {
            placements: Vec::new(),
            total_height: 0.0,
            column_count,
            column_heights: vec![0.0; column_count],
            gap,
            quality: QualityReport::empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn get(&self, id: &SectionId) -> Option<&PlacedSection> {
        self.placements.iter().find(|p| &p.id == id)
    }

    /// Tallest running height of the packing pass: `total_height` plus the
    /// trailing gap, or zero for an empty layout.
    pub fn running_height(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.total_height + self.gap
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &SectionId> {
        self.placements.iter().map(|p| &p.id)
    }

    /// Every pair of placements that collide. Empty for a valid layout.
    pub fn overlapping_pairs(&self) -> Vec<(SectionId, SectionId)> {
        let mut pairs = Vec::new();
        for (i, a) in self.placements.iter().enumerate() {
            for b in &self.placements[i + 1..] {
                if a.overlaps(b, self.gap) {
                    pairs.push((a.id.clone(), b.id.clone()));
                }
            }
        }
        pairs
    }
}
