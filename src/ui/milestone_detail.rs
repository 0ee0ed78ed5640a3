use egui::{Context, RichText, Window};
use egui_phosphor::regular as icons;
use uuid::Uuid;

use crate::layout::Section;
use crate::model::Milestone;
use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailAction {
    None,
    Close,
    ViewProduct(Uuid),
}

/// Display text for an optional end date.
pub fn end_label(milestone: &Milestone) -> String {
    milestone
        .end_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "—".to_string())
}

/// Render the read-only milestone detail window.
pub fn show_milestone_detail(
    milestone: &Milestone,
    section: &Section,
    product_name: &str,
    ctx: &Context,
) -> DetailAction {
    let mut action = DetailAction::None;
    let mut open = true;

    Window::new(RichText::new(&milestone.label).strong().size(14.0))
        .id(egui::Id::new("milestone_detail"))
        .open(&mut open)
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::RIGHT_TOP, [-16.0, 64.0])
        .show(ctx, |ui| {
            egui::Grid::new("milestone_detail_grid")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Product").color(theme::TEXT_SECONDARY));
                    ui.label(product_name);
                    ui.end_row();

                    ui.label(RichText::new("Row").color(theme::TEXT_SECONDARY));
                    ui.label(format!("#{} {}", section.serial, section.title));
                    ui.end_row();

                    ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                    ui.label(milestone.start_date.format("%Y-%m-%d").to_string());
                    ui.end_row();

                    ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                    ui.label(end_label(milestone));
                    ui.end_row();

                    ui.label(RichText::new("Type").color(theme::TEXT_SECONDARY));
                    let kind = if milestone.kind.is_empty() { "—" } else { milestone.kind.as_str() };
                    ui.label(kind);
                    ui.end_row();

                    ui.label(RichText::new("Color").color(theme::TEXT_SECONDARY));
                    ui.horizontal(|ui| {
                        let (dot, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                        ui.painter().circle_filled(dot.center(), 5.0, milestone.color);
                        ui.label(RichText::new(milestone.color_hex()).monospace().size(11.0));
                    });
                    ui.end_row();
                });

            ui.add_space(6.0);
            ui.separator();
            ui.horizontal(|ui| {
                if ui
                    .button(format!("View product {}", icons::ARROW_SQUARE_OUT))
                    .clicked()
                {
                    action = DetailAction::ViewProduct(milestone.product_id);
                }
                if ui.button("Close").clicked() {
                    action = DetailAction::Close;
                }
            });
        });

    if !open || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        action = DetailAction::Close;
    }
    action
}
