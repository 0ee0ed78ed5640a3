use egui::{Color32, FontId, Rounding, Stroke, Visuals};

use crate::layout::Section;

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(24, 24, 32);
pub const BG_PANEL: Color32 = Color32::from_rgb(30, 30, 40);
pub const BG_HEADER: Color32 = Color32::from_rgb(34, 37, 48);
pub const BG_ROW_HOVER: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 14);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(80, 140, 220, 45);
pub const BG_SEPARATOR: Color32 = Color32::from_rgb(40, 36, 46);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(50, 52, 64);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 232, 240);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(155, 160, 178);
pub const TEXT_DIM: Color32 = Color32::from_rgb(100, 105, 120);
pub const TEXT_ON_BAR: Color32 = Color32::from_rgb(255, 255, 255);

pub const ACCENT: Color32 = Color32::from_rgb(80, 140, 220);
pub const GRID_LINE: Color32 = Color32::from_rgb(44, 46, 58);
pub const YEAR_PINNED: Color32 = Color32::from_rgb(251, 191, 36);

/// Red marker: something depends on this row.
pub const MARKER_DEPENDENT: Color32 = Color32::from_rgb(239, 68, 68);
/// Blue marker: this row depends on something.
pub const MARKER_DEPENDENCY: Color32 = Color32::from_rgb(59, 130, 246);

/// Superscript color: red when anything depends on the row, else blue.
pub fn marker_color(section: &Section) -> Color32 {
    if section.is_dependent() {
        MARKER_DEPENDENT
    } else {
        MARKER_DEPENDENCY
    }
}

pub const CONNECTOR: Color32 = Color32::from_rgb(0x94, 0xA3, 0xB8);
pub const OPEN_MARKER_BORDER: Color32 = Color32::from_rgb(0xCB, 0xD5, 0xE1);

/// Opacity multiplier for rows outside the pinned year.
pub const DIM_FACTOR: f32 = 0.3;

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const HEADER_HEIGHT: f32 = 36.0;
pub const BAR_ROUNDING: f32 = 5.0;
pub const ACCENT_BORDER_WIDTH: f32 = 4.0;
/// Floor for bar width in points, on top of the percentage floor.
pub const MIN_BAR_WIDTH_PX: f32 = 90.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

// ── Section tints ────────────────────────────────────────────────────────────

/// Accent per row index, cycling. Index 0 is the product-level accent.
pub const SECTION_ACCENTS: &[Color32] = &[
    Color32::from_rgb(0x81, 0x8C, 0xF8), // indigo
    Color32::from_rgb(0x60, 0xA5, 0xFA), // blue
    Color32::from_rgb(0x34, 0xD3, 0x99), // emerald
    Color32::from_rgb(0xFB, 0xBF, 0x24), // amber
    Color32::from_rgb(0xA7, 0x8B, 0xFA), // violet
    Color32::from_rgb(0xFB, 0x71, 0x85), // rose
    Color32::from_rgb(0x38, 0xBD, 0xF8), // sky
    Color32::from_rgb(0x2D, 0xD4, 0xBF), // teal
    Color32::from_rgb(0xFB, 0x92, 0x3C), // orange
    Color32::from_rgb(0xE8, 0x79, 0xF9), // fuchsia
];

pub fn section_accent(index: usize) -> Color32 {
    SECTION_ACCENTS[index % SECTION_ACCENTS.len()]
}

/// Faint row background derived from the accent.
pub fn section_tint(index: usize) -> Color32 {
    section_accent(index).gamma_multiply(0.08)
}

pub fn dimmed(color: Color32, dim: bool) -> Color32 {
    if dim {
        color.gamma_multiply(DIM_FACTOR)
    } else {
        color
    }
}

// ── Apply custom visuals ─────────────────────────────────────────────────────

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();

    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = Color32::from_rgb(20, 20, 28);

    visuals.widgets.noninteractive.bg_fill = BG_PANEL;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.noninteractive.rounding = Rounding::same(4.0);

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(42, 44, 56);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.inactive.rounding = Rounding::same(4.0);

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(52, 54, 68);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.hovered.rounding = Rounding::same(4.0);

    visuals.widgets.active.bg_fill = Color32::from_rgb(60, 62, 76);
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.active.fg_stroke = Stroke::new(2.0, Color32::WHITE);
    visuals.widgets.active.rounding = Rounding::same(4.0);

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.striped = false;
    visuals.faint_bg_color = BG_PANEL;

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    ctx.set_style(style);
}
