use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};
use roadmap_gantt::layout::compositor::{ROW_HEIGHT, SEPARATOR_HEIGHT};
use roadmap_gantt::layout::range::year_start_ms;
use roadmap_gantt::layout::sections::section_key;
use roadmap_gantt::layout::{
    compute_layout, ChartOutcome, HighlightEvent, HighlightState, Phase, RoadmapInput, RoadmapLayout, RowGeometry,
    Visibility,
};
use roadmap_gantt::model::{
    Dependency, DependencyKind, Fetch, Milestone, Product, ProductSlice, ProductVersion, ProductVersionDependency,
    RoadmapSnapshot,
};
use uuid::Uuid;

fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn product(name: &str, versions: &[&str]) -> ProductSlice {
    let product = Product::new(name);
    let mut slice = ProductSlice::new(product.clone());
    slice.versions = Fetch::Ready(
        versions
            .iter()
            .enumerate()
            .map(|(order, label)| ProductVersion::new(product.id, *label, order as i32))
            .collect(),
    );
    slice
}

fn version_id(slice: &ProductSlice, index: usize) -> Uuid {
    slice.versions.ready_or_empty()[index].id
}

fn layout_of(snapshot: &RoadmapSnapshot) -> RoadmapLayout {
    let input = RoadmapInput::new(snapshot, snapshot.products.iter().collect());
    match compute_layout(&input, &Visibility::default()) {
        ChartOutcome::Ready(layout) => layout,
        other => panic!("expected a layout, got {:?}", other),
    }
}

/// P1 (V1, V2) and P2 (product-level only), with P1/V1 waiting on P2.
fn two_product_snapshot() -> RoadmapSnapshot {
    let mut p1 = product("P1", &["V1", "V2"]);
    let (v1, v2) = (version_id(&p1, 0), version_id(&p1, 1));
    p1.milestones = Fetch::Ready(vec![
        Milestone::new(p1.product.id, "M1", day(2024, 1, 10))
            .with_version(v1)
            .with_end(day(2024, 3, 1)),
        Milestone::new(p1.product.id, "M2", day(2024, 6, 1)).with_version(v2),
    ]);

    let mut p2 = product("P2", &[]);
    p2.milestones = Fetch::Ready(vec![
        Milestone::new(p2.product.id, "M3", day(2023, 11, 1)).with_end(day(2023, 12, 1))
    ]);

    let mut snapshot = RoadmapSnapshot::new("Scenario");
    snapshot.version_dependencies = Fetch::Ready(vec![ProductVersionDependency::new(
        v1,
        p2.product.id,
        None,
        "approved",
    )]);
    snapshot.products = vec![p1, p2];
    snapshot
}

#[test]
fn two_products_with_version_dependency() {
    let snapshot = two_product_snapshot();
    let layout = layout_of(&snapshot);
    let (p1, p2) = (&snapshot.products[0], &snapshot.products[1]);

    assert_eq!(layout.range.start_ms, year_start_ms(2023));
    assert_eq!(layout.range.start_year(), 2023);

    let keys: Vec<&str> = layout.rows.iter().map(|r| r.section.key.as_str()).collect();
    let expected = [
        format!("{}-header", p1.product.id),
        section_key(p1.product.id, Some(version_id(p1, 0))),
        section_key(p1.product.id, Some(version_id(p1, 1))),
        format!("{}-header", p2.product.id),
        section_key(p2.product.id, None),
    ];
    assert_eq!(keys, expected.iter().map(String::as_str).collect::<Vec<_>>());

    let serials: Vec<usize> = layout.rows.iter().map(|r| r.section.serial).collect();
    assert_eq!(serials, [1, 2, 3, 4, 5]);

    let v1_row = &layout.rows[1].section;
    assert!(v1_row.show_blue_asterisk && !v1_row.show_red_asterisk);
    assert_eq!(v1_row.related_serials, [5]);

    let p2_row = &layout.rows[4].section;
    assert!(p2_row.show_red_asterisk && !p2_row.show_blue_asterisk);
    assert_eq!(p2_row.related_serials, [2]);

    assert!(!layout.rows[2].section.has_marker());
    assert_eq!(layout.separator.map(|s| s.before_index), Some(4));
    assert!(layout.connectors.is_empty());
}

#[test]
fn separator_sits_once_before_first_dependent_row() {
    let geometry = RowGeometry::compose([false, true, false, true]);
    let separator = geometry.separator.expect("one dependent row at least");

    assert_eq!(separator.before_index, 1);
    assert_eq!(geometry.tops[3], separator.top + SEPARATOR_HEIGHT + 2.0 * ROW_HEIGHT);
    assert_eq!(geometry.tops[1], separator.top + SEPARATOR_HEIGHT);

    let plain = RowGeometry::compose([false, false, false]);
    assert!(plain.separator.is_none());
    assert_eq!(plain.content_height, 3.0 * ROW_HEIGHT);
}

#[test]
fn connectors_with_missing_endpoints_are_dropped() {
    let mut snapshot = two_product_snapshot();
    let ids: Vec<Uuid> = snapshot.products[0]
        .milestones
        .ready_or_empty()
        .iter()
        .map(|m| m.id)
        .collect();
    snapshot.dependencies = Fetch::Ready(vec![
        Dependency::new(ids[0], ids[1], DependencyKind::FinishToStart),
        Dependency::new(ids[0], Uuid::new_v4(), DependencyKind::StartToStart),
        Dependency::new(Uuid::new_v4(), ids[1], DependencyKind::FinishToFinish),
    ]);

    let layout = layout_of(&snapshot);
    assert_eq!(layout.connectors.len(), 1);
    assert_eq!(layout.connectors[0].source, ids[0]);
    assert_eq!(layout.connectors[0].target, ids[1]);
}

#[test]
fn repeated_passes_give_identical_order() {
    let snapshot = two_product_snapshot();
    let first = layout_of(&snapshot);
    let second = layout_of(&snapshot);
    let keys = |layout: &RoadmapLayout| -> Vec<String> { layout.rows.iter().map(|r| r.section.key.clone()).collect() };
    assert_eq!(keys(&first), keys(&second));
    assert_eq!(first, second);
}

#[test]
fn versions_without_milestones_have_no_row() {
    let mut slice = product("Lonely", &["1.0", "2.0"]);
    let v2 = version_id(&slice, 1);
    slice.milestones = Fetch::Ready(vec![Milestone::new(slice.product.id, "GA", day(2025, 2, 1)).with_version(v2)]);
    let empty_key = section_key(slice.product.id, Some(version_id(&slice, 0)));

    let mut snapshot = RoadmapSnapshot::new("Omission");
    snapshot.products = vec![slice];
    let layout = layout_of(&snapshot);

    assert!(layout.rows.iter().all(|r| r.section.key != empty_key));
    assert_eq!(layout.rows.len(), 2);
}

#[test]
fn cyclic_references_mark_both_ends_symmetrically() {
    let mut a = product("A", &["a1"]);
    let mut b = product("B", &["b1"]);
    let (a1, b1) = (version_id(&a, 0), version_id(&b, 0));
    a.milestones = Fetch::Ready(vec![
        Milestone::new(a.product.id, "A kickoff", day(2024, 1, 1)),
        Milestone::new(a.product.id, "A GA", day(2024, 5, 1)).with_version(a1),
    ]);
    b.milestones = Fetch::Ready(vec![
        Milestone::new(b.product.id, "B kickoff", day(2024, 2, 1)),
        Milestone::new(b.product.id, "B GA", day(2024, 8, 1)).with_version(b1),
    ]);

    let mut snapshot = RoadmapSnapshot::new("Cycle");
    snapshot.version_dependencies = Fetch::Ready(vec![
        ProductVersionDependency::new(a1, b.product.id, None, "approved"),
        ProductVersionDependency::new(b1, a.product.id, None, "approved"),
    ]);
    snapshot.products = vec![a, b];
    let layout = layout_of(&snapshot);

    let marked: Vec<_> = layout.rows.iter().filter(|r| r.section.has_marker()).collect();
    assert_eq!(marked.len(), 4);
    for row in &layout.rows {
        for serial in &row.section.related_serials {
            let other = layout.row_by_serial(*serial).expect("related serial is displayed");
            assert!(
                other.section.related_serials.contains(&row.section.serial),
                "{} lists {} but not the reverse",
                row.section.title,
                other.section.title
            );
        }
    }
}

#[test]
fn clicking_the_same_marker_twice_unpins() {
    let first: BTreeSet<usize> = [2, 5].into_iter().collect();
    let second: BTreeSet<usize> = [3].into_iter().collect();

    let state = HighlightState::default()
        .apply(HighlightEvent::SerialClick(first.clone()))
        .apply(HighlightEvent::SerialClick(first.clone()));
    assert_eq!(state.serial_phase(), Phase::Idle);
    assert_eq!(state, HighlightState::default());

    let state = HighlightState::default()
        .apply(HighlightEvent::SerialClick(first))
        .apply(HighlightEvent::SerialClick(second.clone()));
    assert_eq!(state.serial_phase(), Phase::Pinned);
    assert_eq!(state.pinned_serials, Some(second));
}

#[test]
fn pinned_year_dims_rows_without_overlap() {
    let snapshot = two_product_snapshot();
    let layout = layout_of(&snapshot);
    let state = HighlightState::default().apply(HighlightEvent::YearClick(2023));

    let dimmed: Vec<bool> = (0..layout.rows.len()).map(|i| layout.is_dimmed(i, &state)).collect();
    assert_eq!(dimmed, [true, true, true, true, false]);
    assert!(!layout.is_dimmed(0, &HighlightState::default()));
}

#[test]
fn pending_milestones_report_loading() {
    let mut snapshot = two_product_snapshot();
    snapshot.products[1].milestones = Fetch::Pending;
    let input = RoadmapInput::new(&snapshot, snapshot.products.iter().collect());
    assert_eq!(compute_layout(&input, &Visibility::default()), ChartOutcome::Loading);
}
