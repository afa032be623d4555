//! Utilization and gap metrics of a completed layout.
//!
//! Pure functions of a [`LayoutResult`]; used for runtime diagnostics and as a
//! test oracle. A poor rating is a signal, never an error.

use masonry_types::{LayoutResult, QualityRating, QualityReport};

/// Cut-offs for the gap metric and the rating buckets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityThresholds {
    /// Trailing empty space above which a column counts as a gap.
    pub gap_threshold: f32,
    pub excellent_utilization: f32,
    pub good_utilization: f32,
    pub good_max_gaps: usize,
    pub fair_utilization: f32,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            gap_threshold: 40.0,
            excellent_utilization: 85.0,
            good_utilization: 75.0,
            good_max_gaps: 2,
            fair_utilization: 65.0,
        }
    }
}

impl QualityThresholds {
    pub fn rate(&self, utilization: f32, gap_count: usize) -> QualityRating {
        if utilization >= self.excellent_utilization && gap_count == 0 {
            QualityRating::Excellent
        } else if utilization >= self.good_utilization && gap_count <= self.good_max_gaps {
            QualityRating::Good
        } else if utilization >= self.fair_utilization {
            QualityRating::Fair
        } else {
            QualityRating::Poor
        }
    }
}

/// Scores `result` with the default thresholds.
pub fn validate(result: &LayoutResult, column_count: usize) -> QualityReport {
    validate_with(result, column_count, &QualityThresholds::default())
}

pub fn validate_with(
    result: &LayoutResult,
    column_count: usize,
    thresholds: &QualityThresholds,
) -> QualityReport {
    let total_height = result.total_height;
    if column_count == 0 || total_height <= 0.0 || !total_height.is_finite() {
        return QualityReport::empty();
    }

    let covered: f32 = result
        .placements
        .iter()
        .map(|p| p.height * p.span.min(column_count) as f32)
        .sum();
    let utilization = (covered / (column_count as f32 * total_height) * 100.0).clamp(0.0, 100.0);

    let bottoms = column_bottoms(result, column_count);
    let gap_count = bottoms
        .iter()
        .filter(|&&bottom| total_height - bottom > thresholds.gap_threshold)
        .count();

    QualityReport {
        utilization,
        gap_count,
        height_variance: population_variance(&bottoms),
        rating: thresholds.rate(utilization, gap_count),
    }
}

/// Bottom of the lowest section in each column; zero for empty columns.
pub fn column_bottoms(result: &LayoutResult, column_count: usize) -> Vec<f32> {
    let mut bottoms = vec![0.0_f32; column_count];
    for placement in &result.placements {
        for column in placement.columns() {
            if let Some(bottom) = bottoms.get_mut(column) {
                *bottom = bottom.max(placement.bottom());
            }
        }
    }
    bottoms
}

pub fn population_variance(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    variance as f32
}
