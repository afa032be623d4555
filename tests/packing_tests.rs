mod common;

use common::TestResult;
use common::fixtures::{dashboard, measured, measured_sections};
use common::layout_assertions::{assert_no_overlap, assert_same_ids, assert_within_grid};
use masonry::{
    Breakpoints, EstimatorConfig, HeightCache, HeightEstimator, LayoutDiff, LayoutError,
    PackingConfig, PackingStrategy, Packer, QualityRating, SectionDescriptor, SectionId,
    SectionKind, pack,
};
use std::sync::Arc;

fn column_of(result: &masonry::LayoutResult, id: &str) -> Option<usize> {
    result.get(&SectionId::new(id)).map(|p| p.column)
}

#[test]
fn test_empty_input_yields_empty_layout() -> TestResult {
    common::init_logger();
    let config = PackingConfig::new(3)
        .with_gap(8.0)
        .with_strategy(PackingStrategy::ShortestColumn);
    let result = pack(&[], &config)?;
    assert!(result.placements.is_empty());
    assert_eq!(result.total_height, 0.0);
    Ok(())
}

#[test]
fn test_zero_columns_is_a_configuration_error() {
    let err = pack(&measured_sections(&[100.0]), &PackingConfig::new(0)).unwrap_err();
    assert_eq!(err, LayoutError::InvalidColumnCount(0));
    assert!(err.to_string().contains("at least 1"));
}

#[test]
fn test_four_equal_sections_fill_two_columns() -> TestResult {
    let config = PackingConfig::new(2).with_gap(0.0);
    let result = pack(&measured_sections(&[100.0; 4]), &config)?;
    assert_eq!(result.total_height, 200.0);
    assert_eq!(result.quality.utilization, 100.0);
    assert_eq!(result.quality.gap_count, 0);
    assert_eq!(result.quality.rating, QualityRating::Excellent);
    Ok(())
}

#[test]
fn test_balanced_first_fit_decreasing_height() -> TestResult {
    let config = PackingConfig::new(2)
        .with_gap(0.0)
        .with_strategy(PackingStrategy::FirstFitDecreasingHeight)
        .with_sort_by_height(true);
    let result = pack(&measured_sections(&[300.0, 280.0, 220.0, 180.0]), &config)?;

    assert_eq!(column_of(&result, "s0"), Some(0));
    assert_eq!(column_of(&result, "s2"), Some(0));
    assert_eq!(column_of(&result, "s1"), Some(1));
    assert_eq!(column_of(&result, "s3"), Some(1));
    assert_eq!(result.column_heights, vec![520.0, 460.0]);
    assert_eq!(result.total_height, 520.0);
    Ok(())
}

#[test]
fn test_span_of_99_is_clamped_to_three() -> TestResult {
    let sections = vec![
        measured("a", 100.0),
        SectionDescriptor::new("hero", SectionKind::Overview)
            .with_span(99)
            .with_observed_height(200.0),
        measured("b", 100.0),
    ];
    let result = pack(&sections, &PackingConfig::new(3))?;
    let hero = result.get(&SectionId::new("hero")).ok_or("hero missing")?;
    assert_eq!(hero.span, 3);
    assert_eq!(hero.column, 0);
    // Rests below `a`, which occupies column 0.
    assert_eq!(hero.top, 116.0);
    assert_no_overlap(&result);
    Ok(())
}

#[test]
fn test_wide_kinds_span_two_columns_by_default() -> TestResult {
    let sections = vec![
        SectionDescriptor::new("chart", SectionKind::Chart).with_observed_height(300.0),
        SectionDescriptor::new("contact", SectionKind::Contact).with_observed_height(150.0),
    ];
    let result = pack(&sections, &PackingConfig::new(4))?;
    assert_eq!(result.get(&SectionId::new("chart")).map(|p| p.span), Some(2));
    assert_eq!(result.get(&SectionId::new("contact")).map(|p| p.span), Some(1));
    assert_eq!(column_of(&result, "contact"), Some(2));
    Ok(())
}

#[test]
fn test_identical_inputs_serialise_identically() -> TestResult {
    let sections = dashboard(30);
    for strategy in [
        PackingStrategy::ShortestColumn,
        PackingStrategy::FirstFitDecreasingHeight,
        PackingStrategy::SkylineBestFit,
        PackingStrategy::GapAware,
    ] {
        let config = PackingConfig::new(4)
            .with_strategy(strategy)
            .with_optimization_passes(2);
        let a = serde_json::to_string(&pack(&sections, &config)?)?;
        let b = serde_json::to_string(&pack(&sections, &config)?)?;
        assert_eq!(a, b, "{} is not deterministic", strategy.label());
    }
    Ok(())
}

#[test]
fn test_dashboard_is_valid_for_every_strategy() -> TestResult {
    common::init_logger();
    let sections = dashboard(40);
    for columns in 1..=5 {
        for strategy in [
            PackingStrategy::ShortestColumn,
            PackingStrategy::FirstFitDecreasingHeight,
            PackingStrategy::SkylineBestFit,
            PackingStrategy::GapAware,
        ] {
            let config = PackingConfig::new(columns).with_strategy(strategy);
            let result = pack(&sections, &config)?;
            assert_same_ids(&result, &sections);
            assert_no_overlap(&result);
            assert_within_grid(&result);
        }
    }
    Ok(())
}

#[test]
fn test_appended_section_keeps_existing_ids() -> TestResult {
    let config = PackingConfig::new(3).with_sort_by_height(true);
    let first = measured_sections(&[220.0, 140.0, 310.0, 180.0, 260.0]);
    let mut second = first.clone();
    second.push(measured("late", 400.0));

    let a = pack(&first, &config)?;
    let b = pack(&second, &config)?;
    for placed in &a.placements {
        assert!(b.get(&placed.id).is_some(), "{} lost", placed.id);
    }

    let diff = LayoutDiff::between(&a, &b);
    assert_eq!(diff.added, vec![SectionId::new("late")]);
    assert!(diff.removed.is_empty());
    assert_eq!(diff.moved.len() + diff.unchanged.len(), first.len());
    Ok(())
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let sections = vec![measured("same", 100.0), measured("same", 120.0)];
    let err = pack(&sections, &PackingConfig::new(2)).unwrap_err();
    assert_eq!(err, LayoutError::DuplicateSectionId("same".to_string()));
}

#[test]
fn test_gap_aware_choice_differs_from_shortest_column() -> TestResult {
    let sections = measured_sections(&[100.0, 500.0, 100.0, 300.0, 150.0]);

    let shortest = pack(&sections, &PackingConfig::new(4).with_gap(0.0))?;
    let aware = pack(
        &sections,
        &PackingConfig::new(4)
            .with_gap(0.0)
            .with_strategy(PackingStrategy::GapAware),
    )?;

    // Shortest column: running [100, 500, 100, 300], last one takes column 0.
    assert_eq!(column_of(&shortest, "s4"), Some(0));
    // Gap-aware ends at [100, 500, 300, 100] and levels the last column
    // against its 300 neighbour.
    assert_eq!(column_of(&aware, "s2"), Some(3));
    assert_eq!(column_of(&aware, "s3"), Some(2));
    assert_eq!(column_of(&aware, "s4"), Some(3));
    assert_no_overlap(&aware);
    Ok(())
}

#[test]
fn test_learned_kind_ratio_shifts_new_estimates() -> TestResult {
    let cache = Arc::new(HeightCache::new());
    let estimator = HeightEstimator::new(EstimatorConfig::default(), Arc::clone(&cache));
    let packer = Packer::new(estimator.clone());

    let seen = SectionDescriptor::new("seen", SectionKind::Chart);
    estimator.record(&seen, 450.0);

    let unseen = vec![SectionDescriptor::new("unseen", SectionKind::Chart).with_span(1)];
    let result = packer.pack(&unseen, &PackingConfig::new(1))?;
    assert_eq!(result.placements[0].height, 450.0);

    // A surface with its own cache learned nothing.
    let isolated = pack(&unseen, &PackingConfig::new(1))?;
    assert_eq!(isolated.placements[0].height, 300.0);
    Ok(())
}

#[test]
fn test_breakpoints_drive_column_count() -> TestResult {
    let breakpoints = Breakpoints::new([(480.0, 2), (900.0, 3), (1400.0, 5)])?;
    assert_eq!(breakpoints.resolve(320.0), 1);
    assert_eq!(breakpoints.resolve(480.0), 2);
    assert_eq!(breakpoints.resolve(1399.0), 3);
    assert_eq!(breakpoints.resolve(2000.0), 5);

    let config = PackingConfig::default().with_column_count(breakpoints.resolve(1000.0));
    let result = pack(&dashboard(9), &config)?;
    assert_eq!(result.column_count, 3);
    Ok(())
}

#[test]
fn test_optimisation_lowers_total_height() -> TestResult {
    let sections = measured_sections(&[100.0, 100.0, 200.0]);
    let plain = pack(&sections, &PackingConfig::new(2).with_gap(0.0))?;
    let tuned = pack(
        &sections,
        &PackingConfig::new(2).with_gap(0.0).with_optimization_passes(3),
    )?;
    assert_eq!(plain.total_height, 300.0);
    assert_eq!(tuned.total_height, 200.0);
    assert!(tuned.quality.height_variance <= plain.quality.height_variance);
    Ok(())
}
