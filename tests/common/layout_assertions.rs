use masonry::{LayoutResult, SectionDescriptor};

/// Panics with the offending pairs if any two placements overlap.
pub fn assert_no_overlap(result: &LayoutResult) {
    let pairs = result.overlapping_pairs();
    assert!(
        pairs.is_empty(),
        "overlapping placements (gap {}): {:?}",
        result.gap,
        pairs
    );
}

/// Every placement lies inside the grid bounds.
pub fn assert_within_grid(result: &LayoutResult) {
    for p in &result.placements {
        assert!(p.span >= 1, "{} has zero span", p.id);
        assert!(
            p.column + p.span <= result.column_count,
            "{} spills past column {}",
            p.id,
            result.column_count
        );
        assert!(p.top >= 0.0, "{} starts above the grid", p.id);
        assert!(
            p.bottom() <= result.total_height + 0.01,
            "{} ends below the total height",
            p.id
        );
    }
}

/// Output ids are exactly the input ids, in input order.
pub fn assert_same_ids(result: &LayoutResult, sections: &[SectionDescriptor]) {
    let placed: Vec<&str> = result.ids().map(|id| id.as_str()).collect();
    let given: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(placed, given);
}
