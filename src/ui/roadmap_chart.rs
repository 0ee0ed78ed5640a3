use std::collections::BTreeSet;

use egui::{Align2, Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use egui_phosphor::regular as icons;
use uuid::Uuid;

use crate::layout::compositor::{BAR_HEIGHT, ROW_GAP, ROW_HEIGHT, SEPARATOR_HEIGHT, SEPARATOR_LABEL};
use crate::layout::connectors::{LABEL_COLUMN_WIDTH, SERIAL_COLUMN_WIDTH, STROKE_DASH, STROKE_WIDTH};
use crate::layout::{HighlightEvent, HighlightState, LayoutRow, Phase, RoadmapLayout, Section, Visibility};
use crate::ui::theme;

const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const SERIAL_W: f32 = SERIAL_COLUMN_WIDTH as f32;
const LABEL_W: f32 = LABEL_COLUMN_WIDTH as f32;
const ROW_H: f32 = ROW_HEIGHT as f32;
const MIN_CHART_WIDTH: f32 = 600.0;

/// What the user did in the chart this frame.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    pub events: Vec<HighlightEvent>,
    pub toggle_product: Option<Uuid>,
    pub edit_product: Option<Uuid>,
}

/// Maps layout coordinates (percent / content px) to screen space.
#[derive(Clone, Copy)]
struct Frame {
    origin: Pos2,
    bars_left: f32,
    bars_width: f32,
}

impl Frame {
    fn x(&self, pct: f64) -> f32 {
        self.bars_left + pct as f32 / 100.0 * self.bars_width
    }

    fn y(&self, content_y: f64) -> f32 {
        self.origin.y + HEADER_HEIGHT + content_y as f32
    }
}

/// Render the roadmap chart (central panel).
pub fn show_roadmap_chart(
    layout: &RoadmapLayout,
    highlight: &HighlightState,
    visibility: &Visibility,
    min_bar_width_pct: f64,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let available = ui.available_size();
    let bars_width = (available.x - SERIAL_W - LABEL_W - 16.0).max(MIN_CHART_WIDTH);
    let chart_height = HEADER_HEIGHT + layout.content_height as f32 + 24.0;

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(SERIAL_W + LABEL_W + bars_width, chart_height.max(available.y)),
                Sense::hover(),
            );
            let origin = response.rect.min;
            let frame = Frame {
                origin,
                bars_left: origin.x + SERIAL_W + LABEL_W,
                bars_width,
            };

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

            draw_year_header(ui, &painter, layout, highlight, frame, response.rect, &mut interaction);

            if let Some(separator) = layout.separator {
                let top = frame.y(separator.top);
                let band = Rect::from_min_size(
                    Pos2::new(origin.x, top),
                    Vec2::new(response.rect.width(), SEPARATOR_HEIGHT as f32),
                );
                painter.rect_filled(band, 0.0, theme::BG_SEPARATOR);
                painter.text(
                    Pos2::new(origin.x + 8.0, band.center().y),
                    Align2::LEFT_CENTER,
                    SEPARATOR_LABEL,
                    theme::font_header(),
                    theme::TEXT_SECONDARY,
                );
            }

            let mut hovered_serials: Option<BTreeSet<usize>> = None;
            for (index, row) in layout.rows.iter().enumerate() {
                let dim = layout.is_dimmed(index, highlight);
                let outcome = draw_row(ui, &painter, layout, row, index, dim, highlight, visibility, frame, min_bar_width_pct);
                if outcome.hovered_serials.is_some() {
                    hovered_serials = outcome.hovered_serials;
                }
                interaction.events.extend(outcome.events);
                interaction.toggle_product = interaction.toggle_product.or(outcome.toggle_product);
                interaction.edit_product = interaction.edit_product.or(outcome.edit_product);
            }

            // Emit hover transitions only when they change.
            match hovered_serials {
                Some(serials) if serials != highlight.hovered_serials => {
                    interaction.events.push(HighlightEvent::SerialHover(serials));
                }
                None if !highlight.hovered_serials.is_empty() => {
                    interaction.events.push(HighlightEvent::SerialLeave);
                }
                _ => {}
            }

            let clip = Rect::from_min_max(
                Pos2::new(frame.bars_left, frame.y(0.0)),
                response.rect.max,
            );
            let clipped = painter.with_clip_rect(clip);
            for connector in &layout.connectors {
                let points: Vec<Pos2> = connector
                    .points
                    .iter()
                    .map(|p| Pos2::new(frame.x(p.x), frame.y(p.y)))
                    .collect();
                clipped.extend(egui::Shape::dashed_line(
                    &points,
                    Stroke::new(STROKE_WIDTH as f32, theme::CONNECTOR),
                    STROKE_DASH[0] as f32,
                    STROKE_DASH[1] as f32,
                ));
            }
        });

    interaction
}

fn draw_year_header(
    ui: &mut Ui,
    painter: &egui::Painter,
    layout: &RoadmapLayout,
    highlight: &HighlightState,
    frame: Frame,
    canvas: Rect,
    interaction: &mut ChartInteraction,
) {
    let header = Rect::from_min_size(frame.origin, Vec2::new(canvas.width(), HEADER_HEIGHT));
    painter.rect_filled(header, 0.0, theme::BG_HEADER);
    painter.line_segment(
        [
            Pos2::new(canvas.left(), header.bottom()),
            Pos2::new(canvas.right(), header.bottom()),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
    painter.text(
        Pos2::new(frame.origin.x + SERIAL_W / 2.0, header.center().y),
        Align2::CENTER_CENTER,
        "#",
        theme::font_sub(),
        theme::TEXT_DIM,
    );
    painter.text(
        Pos2::new(frame.origin.x + SERIAL_W + 8.0, header.center().y),
        Align2::LEFT_CENTER,
        "Product / version",
        theme::font_sub(),
        theme::TEXT_DIM,
    );

    let mut hovered_year = None;
    for tick in &layout.year_ticks {
        let x = frame.x(tick.pct);
        painter.line_segment(
            [Pos2::new(x, header.top()), Pos2::new(x, canvas.bottom())],
            Stroke::new(1.0, theme::GRID_LINE),
        );

        let label_rect = Rect::from_min_size(Pos2::new(x, header.top()), Vec2::new(48.0, HEADER_HEIGHT));
        let response = ui.interact(
            label_rect,
            ui.make_persistent_id(("year-tick", tick.year)),
            Sense::click(),
        );
        let color = match (highlight.pinned_year, highlight.highlighted_year()) {
            (Some(pinned), _) if pinned == tick.year => theme::YEAR_PINNED,
            (_, Some(active)) if active == tick.year => theme::TEXT_PRIMARY,
            _ => theme::TEXT_SECONDARY,
        };
        painter.text(
            Pos2::new(x + 6.0, header.center().y),
            Align2::LEFT_CENTER,
            tick.year.to_string(),
            theme::font_header(),
            color,
        );

        if response.hovered() {
            hovered_year = Some(tick.year);
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        if response.clicked() {
            interaction.events.push(HighlightEvent::YearClick(tick.year));
        }
    }

    match hovered_year {
        Some(year) if highlight.hovered_year != Some(year) && highlight.year_phase() != Phase::Pinned => {
            interaction.events.push(HighlightEvent::YearHover(year));
        }
        None if highlight.hovered_year.is_some() => interaction.events.push(HighlightEvent::YearLeave),
        _ => {}
    }
}

#[derive(Default)]
struct RowOutcome {
    events: Vec<HighlightEvent>,
    hovered_serials: Option<BTreeSet<usize>>,
    toggle_product: Option<Uuid>,
    edit_product: Option<Uuid>,
}

#[allow(clippy::too_many_arguments)]
fn draw_row(
    ui: &mut Ui,
    painter: &egui::Painter,
    layout: &RoadmapLayout,
    row: &LayoutRow,
    index: usize,
    dim: bool,
    highlight: &HighlightState,
    visibility: &Visibility,
    frame: Frame,
    min_bar_width_pct: f64,
) -> RowOutcome {
    let mut outcome = RowOutcome::default();
    let section = &row.section;
    let top = frame.y(row.top);
    let row_rect = Rect::from_min_size(
        Pos2::new(frame.origin.x, top),
        Vec2::new(frame.bars_left - frame.origin.x + frame.bars_width, ROW_H),
    );
    let mid_y = row_rect.center().y;

    if section.is_header() {
        painter.rect_filled(row_rect, 0.0, theme::dimmed(theme::BG_PANEL, dim));
    } else {
        painter.rect_filled(row_rect, 0.0, theme::dimmed(theme::section_tint(index), dim));
        let accent = Rect::from_min_size(
            Pos2::new(frame.origin.x + SERIAL_W, top),
            Vec2::new(theme::ACCENT_BORDER_WIDTH, ROW_H),
        );
        painter.rect_filled(accent, 0.0, theme::dimmed(theme::section_accent(index), dim));
    }
    if !dim && ui.rect_contains_pointer(row_rect) {
        painter.rect_filled(row_rect, 0.0, theme::BG_ROW_HOVER);
    }
    painter.line_segment(
        [row_rect.left_bottom(), row_rect.right_bottom()],
        Stroke::new(0.5, theme::BORDER_SUBTLE),
    );

    // Serial column
    let serial_highlighted = highlight.is_serial_highlighted(section.serial);
    if serial_highlighted {
        let badge = Rect::from_center_size(
            Pos2::new(frame.origin.x + SERIAL_W / 2.0, mid_y),
            Vec2::new(26.0, 18.0),
        );
        painter.rect_filled(badge, Rounding::same(9.0), theme::BG_SELECTED);
    }
    painter.text(
        Pos2::new(frame.origin.x + SERIAL_W / 2.0, mid_y),
        Align2::CENTER_CENTER,
        section.serial.to_string(),
        theme::font_small(),
        theme::dimmed(
            if serial_highlighted { theme::TEXT_PRIMARY } else { theme::TEXT_DIM },
            dim,
        ),
    );

    // Label column
    let mut x = frame.origin.x + SERIAL_W + 10.0 + f32::from(section.indent) * 14.0;
    if section.is_header() && !dim {
        let collapsed = visibility.is_collapsed(section.product_id);
        let caret = if collapsed { icons::CARET_RIGHT } else { icons::CARET_DOWN };
        let caret_rect = painter.text(
            Pos2::new(x, mid_y),
            Align2::LEFT_CENTER,
            caret,
            theme::font_header(),
            theme::TEXT_SECONDARY,
        );
        let response = ui.interact(
            caret_rect.expand(4.0),
            ui.make_persistent_id(("collapse", section.product_id)),
            Sense::click(),
        );
        if response.clicked() {
            outcome.toggle_product = Some(section.product_id);
        }
        x = caret_rect.right() + 6.0;
    }

    let font = if section.is_header() { theme::font_header() } else { theme::font_sub() };
    let label_rect = painter.text(
        Pos2::new(x, mid_y),
        Align2::LEFT_CENTER,
        &section.title,
        font,
        theme::dimmed(theme::TEXT_PRIMARY, dim),
    );
    x = label_rect.right() + 4.0;

    if let Some(superscript) = section.superscript() {
        let marker_rect = painter.text(
            Pos2::new(x, mid_y - 4.0),
            Align2::LEFT_CENTER,
            superscript,
            theme::font_small(),
            theme::dimmed(theme::marker_color(section), dim),
        );
        x = marker_rect.right() + 2.0;
        if !dim {
            marker_clicks(ui, section, marker_rect.expand(3.0), &mut outcome);
        }
    }

    if section.can_edit_name && !dim {
        let pencil = painter.text(
            Pos2::new(x + 4.0, mid_y),
            Align2::LEFT_CENTER,
            icons::PENCIL_SIMPLE,
            theme::font_sub(),
            theme::TEXT_DIM,
        );
        let response = ui.interact(
            pencil.expand(3.0),
            ui.make_persistent_id(("edit-product", section.product_id)),
            Sense::click(),
        );
        if response.clicked() {
            outcome.edit_product = Some(section.product_id);
        }
        response.on_hover_text("Edit product");
    }

    // Bars
    let clip = Rect::from_min_max(
        Pos2::new(frame.bars_left, top),
        Pos2::new(frame.bars_left + frame.bars_width, top + ROW_H),
    );
    let bars = painter.with_clip_rect(clip);
    for milestone in &section.milestones {
        let Some(position) = layout.positions.get(&milestone.id) else {
            continue;
        };
        let span = position.span;
        let left = frame.x(span.left_pct);
        let width = (span.display_width_pct(min_bar_width_pct) as f32 / 100.0 * frame.bars_width)
            .max(theme::MIN_BAR_WIDTH_PX);
        let bar_rect = Rect::from_min_size(
            Pos2::new(left, top + ROW_GAP as f32 / 2.0),
            Vec2::new(width, BAR_HEIGHT as f32),
        );
        let selected = highlight.selected_milestone == Some(milestone.id);
        let rounding = Rounding::same(theme::BAR_ROUNDING);

        let text_color = if span.open_ended {
            bars.rect_stroke(bar_rect, rounding, Stroke::new(1.0, theme::dimmed(theme::OPEN_MARKER_BORDER, dim)));
            theme::dimmed(theme::TEXT_SECONDARY, dim)
        } else {
            bars.rect_filled(bar_rect, rounding, theme::dimmed(milestone.color, dim));
            theme::dimmed(theme::TEXT_ON_BAR, dim)
        };
        if selected {
            bars.rect_stroke(bar_rect.expand(1.5), rounding, Stroke::new(2.0, Color32::WHITE));
        }
        bars.with_clip_rect(bar_rect.intersect(clip)).text(
            Pos2::new(bar_rect.left() + 6.0, bar_rect.center().y),
            Align2::LEFT_CENTER,
            &milestone.label,
            theme::font_bar(),
            text_color,
        );

        if dim {
            continue;
        }
        let response = ui.interact(
            bar_rect.intersect(clip),
            ui.make_persistent_id(("milestone", milestone.id)),
            Sense::click(),
        );
        if response.clicked() {
            outcome.events.push(HighlightEvent::MilestoneClick(milestone.id));
        }
        if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            let end = milestone
                .end_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "—".to_string());
            response.on_hover_text(format!(
                "{}\n{} → {}",
                milestone.label,
                milestone.start_date.format("%Y-%m-%d"),
                end
            ));
        }
    }

    outcome
}

/// Hover and click on a row's superscript.
fn marker_clicks(ui: &mut Ui, section: &Section, area: Rect, outcome: &mut RowOutcome) {
    let response = ui.interact(area, ui.make_persistent_id(("markers", &section.key)), Sense::click());
    let related: BTreeSet<usize> = section.related_serials.iter().copied().collect();
    if response.hovered() {
        outcome.hovered_serials = Some(related.clone());
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    if response.clicked() {
        outcome.events.push(HighlightEvent::SerialClick(related));
    }
    response.on_hover_text(related_hint(section.related_serials.as_slice()));
}

fn related_hint(serials: &[usize]) -> String {
    if serials.is_empty() {
        return "No related rows on screen".to_string();
    }
    let list: Vec<String> = serials.iter().map(|s| format!("#{s}")).collect();
    format!("Related rows: {}", list.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn related_hint_lists_serials() {
        assert_eq!(related_hint(&[2, 5]), "Related rows: #2, #5");
        assert_eq!(related_hint(&[]), "No related rows on screen");
    }
}
