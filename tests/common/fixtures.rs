use masonry::{ContentMetrics, SectionDescriptor, SectionKind};

/// Single-column section with a known (observed) height.
pub fn measured(id: &str, height: f32) -> SectionDescriptor {
    SectionDescriptor::new(id, SectionKind::Info)
        .with_span(1)
        .with_observed_height(height)
}

/// Measured sections named `s0`, `s1`, ... in input order.
pub fn measured_sections(heights: &[f32]) -> Vec<SectionDescriptor> {
    heights
        .iter()
        .enumerate()
        .map(|(i, &h)| measured(&format!("s{}", i), h))
        .collect()
}

/// Unmeasured sections cycling through every kind, with varied content.
pub fn dashboard(n: usize) -> Vec<SectionDescriptor> {
    (0..n)
        .map(|i| {
            let kind = SectionKind::ALL[i % SectionKind::ALL.len()];
            SectionDescriptor::new(format!("{}-{}", kind.label(), i), kind).with_content(
                ContentMetrics::new((i % 5) as u32, (i % 3) as u32, (i * 37 % 400) as u32),
            )
        })
        .collect()
}

/// Heights a fake renderer reports for `sections`, derived from the index.
pub fn rendered_heights(sections: &[SectionDescriptor]) -> Vec<(String, f32)> {
    sections
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.to_string(), 120.0 + (i * 53 % 240) as f32))
        .collect()
}
