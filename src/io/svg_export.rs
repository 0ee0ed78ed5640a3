use std::fmt::Write as _;
use std::path::Path;

use tracing::info;

use super::SnapshotError;
use crate::layout::compositor::{BAR_HEIGHT, ROW_GAP, ROW_HEIGHT, SEPARATOR_HEIGHT, SEPARATOR_LABEL};
use crate::layout::connectors::{OVERLAY_OFFSET, SERIAL_COLUMN_WIDTH};
use crate::layout::{HighlightState, RoadmapLayout};
use crate::model::milestone::hex_color;
use crate::ui::theme;

const AXIS_HEIGHT: f64 = 28.0;
const OPEN_MARKER_BORDER_HEX: &str = "#CBD5E1";

/// Options for a standalone SVG rendering of the chart.
#[derive(Debug, Clone)]
pub struct SvgOptions {
    pub title: String,
    /// Width of the bar area in pixels.
    pub chart_width: f64,
    pub min_bar_width_pct: f64,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            chart_width: 960.0,
            min_bar_width_pct: 2.0,
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the layout as a light-themed SVG document. Rows dimmed by a pinned
/// year in `highlight` are drawn faded.
pub fn render_svg(layout: &RoadmapLayout, highlight: &HighlightState, options: &SvgOptions) -> String {
    let width = OVERLAY_OFFSET + options.chart_width;
    let height = AXIS_HEIGHT + layout.content_height;
    let x_of = |pct: f64| OVERLAY_OFFSET + pct / 100.0 * options.chart_width;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif" font-size="12">"#
    );
    if !options.title.is_empty() {
        let _ = write!(svg, "<title>{}</title>", escape(&options.title));
    }
    let _ = write!(svg, r##"<rect width="{width}" height="{height}" fill="#FFFFFF"/>"##);

    // Year axis
    for tick in &layout.year_ticks {
        let x = x_of(tick.pct);
        let _ = write!(
            svg,
            r##"<line x1="{x}" y1="0" x2="{x}" y2="{height}" stroke="#E2E8F0"/><text x="{}" y="18" fill="#475569">{}</text>"##,
            x + 4.0,
            tick.year
        );
    }

    if let Some(separator) = layout.separator {
        let y = AXIS_HEIGHT + separator.top;
        let _ = write!(
            svg,
            r##"<rect x="0" y="{y}" width="{width}" height="{SEPARATOR_HEIGHT}" fill="#F1F5F9"/><text x="8" y="{}" fill="#64748B" font-weight="bold">{}</text>"##,
            y + SEPARATOR_HEIGHT / 2.0 + 4.0,
            escape(SEPARATOR_LABEL)
        );
    }

    for (index, row) in layout.rows.iter().enumerate() {
        let section = &row.section;
        let y = AXIS_HEIGHT + row.top;
        let opacity = if layout.is_dimmed(index, highlight) { 0.3 } else { 1.0 };
        let _ = write!(svg, r#"<g opacity="{opacity}">"#);

        if !section.is_header() {
            let accent = hex_color::to_hex(theme::section_accent(index));
            let _ = write!(
                svg,
                r#"<rect x="0" y="{y}" width="{width}" height="{ROW_HEIGHT}" fill="{accent}" fill-opacity="0.08"/><rect x="0" y="{y}" width="4" height="{ROW_HEIGHT}" fill="{accent}"/>"#
            );
        }

        let text_y = y + ROW_HEIGHT / 2.0 + 4.0;
        let _ = write!(
            svg,
            r##"<text x="{}" y="{text_y}" fill="#94A3B8" text-anchor="end">{}</text>"##,
            SERIAL_COLUMN_WIDTH - 8.0,
            section.serial
        );

        let label_x = SERIAL_COLUMN_WIDTH + 8.0 + f64::from(section.indent) * 16.0;
        let weight = if section.is_header() { "bold" } else { "normal" };
        let mut label = escape(&section.title);
        if let Some(superscript) = section.superscript() {
            let _ = write!(
                label,
                r#" <tspan class="xref" fill="{}" font-size="9" baseline-shift="super">{superscript}</tspan>"#,
                hex_color::to_hex(theme::marker_color(section))
            );
        }
        let _ = write!(
            svg,
            r##"<text x="{label_x}" y="{text_y}" fill="#1E293B" font-weight="{weight}">{label}</text>"##
        );

        for milestone in &section.milestones {
            let Some(position) = layout.positions.get(&milestone.id) else {
                continue;
            };
            let span = position.span;
            let bar_x = x_of(span.left_pct);
            let bar_w = span.display_width_pct(options.min_bar_width_pct) / 100.0 * options.chart_width;
            let bar_y = y + ROW_GAP / 2.0;
            if span.open_ended {
                let _ = write!(
                    svg,
                    r#"<rect x="{bar_x}" y="{bar_y}" width="{bar_w}" height="{BAR_HEIGHT}" rx="4" fill="none" stroke="{OPEN_MARKER_BORDER_HEX}"/>"#
                );
            } else {
                let _ = write!(
                    svg,
                    r#"<rect x="{bar_x}" y="{bar_y}" width="{bar_w}" height="{BAR_HEIGHT}" rx="4" fill="{}"/>"#,
                    milestone.color_hex()
                );
            }
            let fill = if span.open_ended { "#334155" } else { "#FFFFFF" };
            let _ = write!(
                svg,
                r#"<text x="{}" y="{text_y}" fill="{fill}">{}</text>"#,
                bar_x + 6.0,
                escape(&milestone.label)
            );
        }
        svg.push_str("</g>");
    }

    svg.push_str(&layout.overlay().to_svg(AXIS_HEIGHT, options.chart_width));

    svg.push_str("</svg>");
    svg
}

/// Render and write the chart to `path`.
pub fn export_svg(
    layout: &RoadmapLayout,
    highlight: &HighlightState,
    options: &SvgOptions,
    path: &Path,
) -> Result<(), SnapshotError> {
    let svg = render_svg(layout, highlight, options);
    std::fs::write(path, svg).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = layout.rows.len(), "chart exported as SVG");
    Ok(())
}
