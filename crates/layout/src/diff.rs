//! Identity-keyed comparison of two layouts.
//!
//! Lets a rendering layer touch only the sections whose placement changed.

use masonry_types::{EPSILON, LayoutResult, PlacedSection, SectionId};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutDiff {
    /// In `next` but not in `previous`, in `next` order.
    pub added: Vec<SectionId>,
    /// In `previous` but not in `next`, in `previous` order.
    pub removed: Vec<SectionId>,
    /// In both, with a different column, span, top or height.
    pub moved: Vec<SectionId>,
    pub unchanged: Vec<SectionId>,
}

impl LayoutDiff {
    pub fn between(previous: &LayoutResult, next: &LayoutResult) -> Self {
        let before: HashMap<&SectionId, &PlacedSection> =
            previous.placements.iter().map(|p| (&p.id, p)).collect();

        let mut diff = LayoutDiff::default();
        for placement in &next.placements {
            match before.get(&placement.id) {
                None => diff.added.push(placement.id.clone()),
                Some(old) if same_position(old, placement) => {
                    diff.unchanged.push(placement.id.clone())
                }
                Some(_) => diff.moved.push(placement.id.clone()),
            }
        }

        let after: HashMap<&SectionId, ()> =
            next.placements.iter().map(|p| (&p.id, ())).collect();
        diff.removed = previous
            .placements
            .iter()
            .filter(|p| !after.contains_key(&p.id))
            .map(|p| p.id.clone())
            .collect();
        diff
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.moved.is_empty()
    }

    /// Number of sections the renderer has to touch.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.moved.len()
    }
}

fn same_position(a: &PlacedSection, b: &PlacedSection) -> bool {
    a.column == b.column
        && a.span == b.span
        && (a.top - b.top).abs() < EPSILON
        && (a.height - b.height).abs() < EPSILON
}
