//! Orthogonal connector routing between dependent milestones.
//!
//! x coordinates are percentages of the time axis, y coordinates are pixels
//! from the top of the row content. The overlay is stretched over the bar
//! area, so it starts after the serial and label columns.

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::compositor::RowGeometry;
use super::MilestonePosition;
use crate::model::{Dependency, DependencyKind};

pub const SERIAL_COLUMN_WIDTH: f64 = 40.0;
pub const LABEL_COLUMN_WIDTH: f64 = 200.0;
/// Horizontal offset of the connector overlay from the chart's left edge.
pub const OVERLAY_OFFSET: f64 = SERIAL_COLUMN_WIDTH + LABEL_COLUMN_WIDTH;

pub const STROKE_COLOR_HEX: &str = "#94A3B8";
pub const STROKE_WIDTH: f64 = 1.5;
/// Dash then gap, in overlay units.
pub const STROKE_DASH: [f64; 2] = [4.0, 2.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A routed dependency: horizontal out of the source, vertical in the
/// mid channel, horizontal into the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub dependency_id: Uuid,
    pub kind: DependencyKind,
    pub source: Uuid,
    pub target: Uuid,
    pub points: [Point; 4],
}

impl Connector {
    /// `M sx sy L mx sy L mx ty L tx ty`
    pub fn svg_path(&self) -> String {
        let mut path = String::new();
        for (i, p) in self.points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            if i > 0 {
                path.push(' ');
            }
            let _ = write!(path, "{cmd} {} {}", p.x, p.y);
        }
        path
    }
}

/// Route every dependency whose endpoints both have a position. Others are
/// dropped.
pub fn route_connectors(
    dependencies: &[Dependency],
    positions: &HashMap<Uuid, MilestonePosition>,
    rows: &RowGeometry,
) -> Vec<Connector> {
    dependencies
        .iter()
        .filter_map(|dep| {
            let (Some(source), Some(target)) = (
                positions.get(&dep.source_milestone_id),
                positions.get(&dep.target_milestone_id),
            ) else {
                debug!(dependency = %dep.id, "connector endpoint not displayed, skipping");
                return None;
            };
            let (Some(sy), Some(ty)) = (rows.mid(source.row), rows.mid(target.row)) else {
                debug!(dependency = %dep.id, "connector row out of range, skipping");
                return None;
            };
            let sx = source.span.right_pct;
            let tx = target.span.left_pct;
            let mx = (sx + tx) / 2.0;
            Some(Connector {
                dependency_id: dep.id,
                kind: dep.kind,
                source: dep.source_milestone_id,
                target: dep.target_milestone_id,
                points: [
                    Point::new(sx, sy),
                    Point::new(mx, sy),
                    Point::new(mx, ty),
                    Point::new(tx, ty),
                ],
            })
        })
        .collect()
}

/// The SVG overlay drawn above the bars.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorOverlay<'a> {
    pub connectors: &'a [Connector],
    pub content_height: f64,
}

impl ConnectorOverlay<'_> {
    pub fn view_box(&self) -> String {
        format!("0 0 100 {}", self.content_height)
    }

    /// Nested `<svg>` element at [`OVERLAY_OFFSET`], `top` pixels down,
    /// stretching the percent view box over `width` pixels of bar area.
    pub fn to_svg(&self, top: f64, width: f64) -> String {
        let mut svg = format!(
            r#"<svg class="connectors" x="{}" y="{}" width="{}" height="{}" viewBox="{}" preserveAspectRatio="none" overflow="visible">"#,
            OVERLAY_OFFSET,
            top,
            width,
            self.content_height,
            self.view_box(),
        );
        for connector in self.connectors {
            let _ = write!(
                svg,
                r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-dasharray="{} {}" vector-effect="non-scaling-stroke" data-kind="{}"/>"#,
                connector.svg_path(),
                STROKE_COLOR_HEX,
                STROKE_WIDTH,
                STROKE_DASH[0],
                STROKE_DASH[1],
                connector.kind.short_label(),
            );
        }
        svg.push_str("</svg>");
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::range::Span;

    fn position(row: usize, left: f64, right: f64) -> MilestonePosition {
        MilestonePosition {
            row,
            span: Span {
                left_pct: left,
                right_pct: right,
                open_ended: false,
            },
        }
    }

    #[test]
    fn routes_through_mid_channel() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let positions = HashMap::from([(a, position(0, 10.0, 30.0)), (b, position(2, 50.0, 70.0))]);
        let rows = RowGeometry::compose([false, false, false]);
        let dep = Dependency::new(a, b, DependencyKind::FinishToStart);

        let connectors = route_connectors(&[dep], &positions, &rows);
        assert_eq!(connectors.len(), 1);
        assert_eq!(connectors[0].svg_path(), "M 30 18 L 40 18 L 40 90 L 50 90");
    }

    #[test]
    fn kind_does_not_change_the_route() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let positions = HashMap::from([(a, position(0, 10.0, 30.0)), (b, position(1, 5.0, 8.0))]);
        let rows = RowGeometry::compose([false, false]);
        let fs = route_connectors(&[Dependency::new(a, b, DependencyKind::FinishToStart)], &positions, &rows);
        let ff = route_connectors(&[Dependency::new(a, b, DependencyKind::FinishToFinish)], &positions, &rows);
        assert_eq!(fs[0].points, ff[0].points);
    }

    #[test]
    fn missing_endpoint_is_dropped() {
        let a = Uuid::new_v4();
        let positions = HashMap::from([(a, position(0, 0.0, 10.0))]);
        let rows = RowGeometry::compose([false]);
        let deps = [
            Dependency::new(a, Uuid::new_v4(), DependencyKind::StartToStart),
            Dependency::new(Uuid::new_v4(), a, DependencyKind::FinishToStart),
        ];
        assert!(route_connectors(&deps, &positions, &rows).is_empty());
    }

    #[test]
    fn overlay_uses_percent_view_box_and_dashed_stroke() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let positions = HashMap::from([(a, position(0, 0.0, 20.0)), (b, position(1, 40.0, 60.0))]);
        let rows = RowGeometry::compose([false, true]);
        let connectors = route_connectors(
            &[Dependency::new(a, b, DependencyKind::FinishToStart)],
            &positions,
            &rows,
        );
        let overlay = ConnectorOverlay {
            connectors: &connectors,
            content_height: rows.content_height,
        };
        let svg = overlay.to_svg(28.0, 960.0);
        assert!(svg.contains(r#"viewBox="0 0 100 104""#));
        assert!(svg.contains(r#"stroke-dasharray="4 2""#));
        assert!(svg.contains("#94A3B8"));
        assert!(svg.contains(r#"x="240" y="28" width="960" height="104""#));
        assert!(svg.contains(r#"data-kind="FS""#));
        assert!(svg.contains("M 20 18 L 30 18 L 30 86 L 40 86"));
    }
}
