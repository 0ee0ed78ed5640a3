//! The roadmap layout engine: pure functions from a snapshot to rows,
//! positions and connectors.

pub mod aggregate;
pub mod compositor;
pub mod connectors;
pub mod highlight;
pub mod range;
pub mod sections;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

pub use aggregate::DependencyRelations;
pub use compositor::{RowGeometry, Separator};
pub use connectors::{Connector, ConnectorOverlay};
pub use highlight::{HighlightEvent, HighlightState, Phase};
pub use range::{Span, TimeRange, YearTick};
pub use sections::{Section, SectionKind, Visibility};

use crate::model::{Dependency, Milestone, ProductSlice, ProductVersionDependency, RoadmapSnapshot, Viewer};

/// Everything one layout pass reads.
#[derive(Debug, Clone)]
pub struct RoadmapInput<'a> {
    /// Products to display, already filtered, in display order.
    pub products: Vec<&'a ProductSlice>,
    /// Every loaded product; resolves version ownership for dependencies.
    pub all_products: &'a [ProductSlice],
    pub dependencies: &'a [Dependency],
    pub version_dependencies: &'a [ProductVersionDependency],
    pub viewer: Option<&'a Viewer>,
}

impl<'a> RoadmapInput<'a> {
    /// Input over `products`, a subset of `snapshot.products`. Pending
    /// dependency collections read as empty.
    pub fn new(snapshot: &'a RoadmapSnapshot, products: Vec<&'a ProductSlice>) -> Self {
        Self {
            products,
            all_products: &snapshot.products,
            dependencies: snapshot.dependencies.ready_or_empty(),
            version_dependencies: snapshot.version_dependencies.ready_or_empty(),
            viewer: snapshot.viewer.as_ref(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.products.iter().any(|slice| slice.milestones.is_pending())
    }
}

/// Where a milestone landed: its row and horizontal span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MilestonePosition {
    pub row: usize,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutRow {
    pub section: Section,
    pub top: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapLayout {
    pub range: TimeRange,
    pub year_ticks: Vec<YearTick>,
    pub rows: Vec<LayoutRow>,
    pub separator: Option<Separator>,
    pub content_height: f64,
    pub positions: HashMap<Uuid, MilestonePosition>,
    pub connectors: Vec<Connector>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    /// Some product's milestones have not arrived yet.
    Loading,
    /// Nothing to place on the time axis.
    Empty,
    Ready(RoadmapLayout),
}

impl ChartOutcome {
    pub fn layout(&self) -> Option<&RoadmapLayout> {
        match self {
            ChartOutcome::Ready(layout) => Some(layout),
            _ => None,
        }
    }
}

/// Run the whole pipeline: aggregate, build sections, number them,
/// normalize the range, place rows and route connectors.
pub fn compute_layout(input: &RoadmapInput<'_>, visibility: &Visibility) -> ChartOutcome {
    if input.is_loading() {
        return ChartOutcome::Loading;
    }

    let owners = aggregate::version_owners(input.all_products);
    let relations = DependencyRelations::aggregate(input.version_dependencies, &owners);

    let mut sections = sections::build_sections(&input.products, &relations, visibility, input.viewer);
    sections::assign_serials(&mut sections);
    relations.annotate_serials(&mut sections);

    let Some(range) = TimeRange::from_milestones(sections.iter().flat_map(|s| s.milestones.iter())) else {
        debug!(products = input.products.len(), "no displayed milestones");
        return ChartOutcome::Empty;
    };

    let geometry = RowGeometry::compose(sections.iter().map(Section::is_dependent));

    let positions: HashMap<Uuid, MilestonePosition> = sections
        .iter()
        .enumerate()
        .flat_map(|(row, section)| {
            section.milestones.iter().map(move |m| {
                (
                    m.id,
                    MilestonePosition {
                        row,
                        span: range.position(m),
                    },
                )
            })
        })
        .collect();

    let connectors = connectors::route_connectors(input.dependencies, &positions, &geometry);

    debug!(
        rows = sections.len(),
        milestones = positions.len(),
        connectors = connectors.len(),
        separator = geometry.separator.is_some(),
        "layout computed"
    );

    let rows = sections
        .into_iter()
        .zip(geometry.tops.iter().copied())
        .map(|(section, top)| LayoutRow { section, top })
        .collect();

    ChartOutcome::Ready(RoadmapLayout {
        year_ticks: range.year_ticks(),
        range,
        rows,
        separator: geometry.separator,
        content_height: geometry.content_height,
        positions,
        connectors,
    })
}

impl RoadmapLayout {
    pub fn overlay(&self) -> ConnectorOverlay<'_> {
        ConnectorOverlay {
            connectors: &self.connectors,
            content_height: self.content_height,
        }
    }

    pub fn milestone(&self, id: Uuid) -> Option<(&Section, &Milestone)> {
        let position = self.positions.get(&id)?;
        let section = &self.rows.get(position.row)?.section;
        let milestone = section.milestones.iter().find(|m| m.id == id)?;
        Some((section, milestone))
    }

    pub fn row_by_serial(&self, serial: usize) -> Option<&LayoutRow> {
        self.rows.iter().find(|row| row.section.serial == serial)
    }

    /// Rows are dimmed only while a year is pinned, when none of their
    /// milestones overlaps it.
    pub fn is_dimmed(&self, row: usize, highlight: &HighlightState) -> bool {
        match (highlight.pinned_year, self.rows.get(row)) {
            (Some(year), Some(row)) => !row.section.overlaps_year(year),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DependencyKind, Fetch, Product, ProductVersion};
    use chrono::{TimeZone, Utc};

    fn slice_with(name: &str, labels: &[(&str, i32, u32)]) -> ProductSlice {
        let product = Product::new(name);
        let mut slice = ProductSlice::new(product.clone());
        slice.milestones = Fetch::Ready(
            labels
                .iter()
                .map(|(label, year, month)| {
                    Milestone::new(product.id, *label, Utc.with_ymd_and_hms(*year, *month, 1, 0, 0, 0).unwrap())
                })
                .collect(),
        );
        slice
    }

    #[test]
    fn pending_milestones_make_the_chart_loading() {
        let mut snapshot = RoadmapSnapshot::new("t");
        let mut slice = slice_with("A", &[]);
        slice.milestones = Fetch::Pending;
        snapshot.products.push(slice);
        let input = RoadmapInput::new(&snapshot, snapshot.products.iter().collect());
        assert_eq!(compute_layout(&input, &Visibility::default()), ChartOutcome::Loading);
    }

    #[test]
    fn no_milestones_is_empty() {
        let mut snapshot = RoadmapSnapshot::new("t");
        snapshot.products.push(slice_with("A", &[]));
        let input = RoadmapInput::new(&snapshot, snapshot.products.iter().collect());
        assert_eq!(compute_layout(&input, &Visibility::default()), ChartOutcome::Empty);
    }

    #[test]
    fn connectors_join_displayed_milestones() {
        let mut snapshot = RoadmapSnapshot::new("t");
        snapshot.products.push(slice_with("A", &[("a1", 2024, 1), ("a2", 2024, 6)]));
        let ids: Vec<Uuid> = snapshot.products[0].milestones.ready_or_empty().iter().map(|m| m.id).collect();
        snapshot.dependencies = Fetch::Ready(vec![Dependency::new(ids[0], ids[1], DependencyKind::FinishToStart)]);

        let input = RoadmapInput::new(&snapshot, snapshot.products.iter().collect());
        let outcome = compute_layout(&input, &Visibility::default());
        let layout = outcome.layout().unwrap();
        assert_eq!(layout.connectors.len(), 1);
        assert_eq!(layout.rows.len(), 2);
        assert_eq!(layout.positions[&ids[0]].row, 1);
        let (section, milestone) = layout.milestone(ids[1]).unwrap();
        assert_eq!(section.title, "Product-level");
        assert_eq!(milestone.label, "a2");
    }

    #[test]
    fn collapsed_products_drop_out_of_the_range() {
        let mut snapshot = RoadmapSnapshot::new("t");
        snapshot.products.push(slice_with("Old", &[("legacy", 2019, 3)]));
        snapshot.products.push(slice_with("New", &[("ga", 2024, 3)]));
        let old = snapshot.products[0].product.id;

        let mut visibility = Visibility::default();
        visibility.toggle(old);
        let input = RoadmapInput::new(&snapshot, snapshot.products.iter().collect());
        let outcome = compute_layout(&input, &visibility);
        let layout = outcome.layout().unwrap();
        assert_eq!(layout.range.start_year(), 2024);
        assert_eq!(layout.rows.len(), 3);
    }

    #[test]
    fn pinned_year_dims_rows_without_overlap() {
        let mut snapshot = RoadmapSnapshot::new("t");
        let mut slice = slice_with("A", &[("early", 2023, 2)]);
        let version = ProductVersion::new(slice.product.id, "2.0", 0);
        let late = Milestone::new(slice.product.id, "late", Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap())
            .with_version(version.id);
        slice.versions = Fetch::Ready(vec![version]);
        if let Fetch::Ready(milestones) = &mut slice.milestones {
            milestones.push(late);
        }
        snapshot.products.push(slice);

        let input = RoadmapInput::new(&snapshot, snapshot.products.iter().collect());
        let outcome = compute_layout(&input, &Visibility::default());
        let layout = outcome.layout().unwrap();

        let hovered = HighlightState::default().apply(HighlightEvent::YearHover(2023));
        assert!(!layout.is_dimmed(2, &hovered));

        let pinned = HighlightState::default().apply(HighlightEvent::YearClick(2023));
        assert!(layout.is_dimmed(0, &pinned));
        assert!(!layout.is_dimmed(1, &pinned));
        assert!(layout.is_dimmed(2, &pinned));
        assert_eq!(layout.row_by_serial(3).map(|r| r.section.title.as_str()), Some("Version 2.0"));
    }
}
