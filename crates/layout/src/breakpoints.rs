use crate::LayoutError;

/// One row of the breakpoint table: at `min_width` and wider, use `columns`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub min_width: f32,
    pub columns: usize,
}

/// Maps a container width to a column count.
///
/// Tiers are kept sorted ascending by `min_width`. Widths below the smallest
/// threshold resolve to a single column.
///
/// | Default tier | Min width | Columns |
/// |--------------|-----------|---------|
/// | (implicit)   | 0         | 1       |
/// | tablet       | 600       | 2       |
/// | desktop      | 960       | 3       |
/// | wide         | 1280      | 4       |
#[derive(Debug, Clone, PartialEq)]
pub struct Breakpoints {
    tiers: Vec<Breakpoint>,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            tiers: vec![
                Breakpoint { min_width: 600.0, columns: 2 },
                Breakpoint { min_width: 960.0, columns: 3 },
                Breakpoint { min_width: 1280.0, columns: 4 },
            ],
        }
    }
}

impl Breakpoints {
    /// Builds a table from `(min_width, columns)` pairs in any order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBreakpoint` for a negative or non-finite width, a zero
    /// column count, or two tiers with the same width.
    pub fn new<I>(tiers: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = (f32, usize)>,
    {
        let mut tiers: Vec<Breakpoint> = tiers
            .into_iter()
            .map(|(min_width, columns)| Breakpoint { min_width, columns })
            .collect();

        for tier in &tiers {
            if !tier.min_width.is_finite() || tier.min_width < 0.0 {
                return Err(LayoutError::InvalidBreakpoint(format!(
                    "width {} must be finite and non-negative",
                    tier.min_width
                )));
            }
            if tier.columns == 0 {
                return Err(LayoutError::InvalidBreakpoint(format!(
                    "width {} maps to zero columns",
                    tier.min_width
                )));
            }
        }

        tiers.sort_by(|a, b| a.min_width.total_cmp(&b.min_width));
        if let Some(pair) = tiers.windows(2).find(|w| w[0].min_width == w[1].min_width) {
            return Err(LayoutError::InvalidBreakpoint(format!(
                "duplicate threshold {}",
                pair[0].min_width
            )));
        }

        Ok(Self { tiers })
    }

    /// A table that always resolves to `columns` (at least one).
    pub fn fixed(columns: usize) -> Self {
        Self {
            tiers: vec![Breakpoint {
                min_width: 0.0,
                columns: columns.max(1),
            }],
        }
    }

    pub fn tiers(&self) -> &[Breakpoint] {
        &self.tiers
    }

    /// Column count for the greatest threshold `<= container_width`.
    pub fn resolve(&self, container_width: f32) -> usize {
        if container_width.is_nan() {
            return 1;
        }
        self.tiers
            .iter()
            .rev()
            .find(|tier| tier.min_width <= container_width)
            .map(|tier| tier.columns)
            .unwrap_or(1)
    }

    pub fn max_columns(&self) -> usize {
        self.tiers.iter().map(|t| t.columns).max().unwrap_or(1)
    }
}
