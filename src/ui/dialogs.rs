use crate::app::RoadmapApp;
use crate::ui::theme;
use egui::{Context, RichText, Window};

/// Minimal snapshot shown in the format help.
pub const SNAPSHOT_EXAMPLE: &str = r##"{
  "name": "Platform 2025",
  "products": [{
    "product": { "id": "0b6f2c1e-5d4a-4c1b-9a7e-1f2d3c4b5a60", "name": "Billing", "lifecycle_status": "active" },
    "versions": [{ "id": "7d1e9f20-3b8c-4e6a-8f5d-2c1b0a9e8d71", "product_id": "0b6f2c1e-5d4a-4c1b-9a7e-1f2d3c4b5a60",
                   "version": "2.0", "order": 0 }],
    "milestones": [{ "id": "c3a4b5d6-e7f8-4a9b-8c0d-1e2f3a4b5c62", "product_id": "0b6f2c1e-5d4a-4c1b-9a7e-1f2d3c4b5a60",
                     "product_version_id": "7d1e9f20-3b8c-4e6a-8f5d-2c1b0a9e8d71",
                     "label": "GA", "start_date": "2025-03-01", "type": "ga", "color": "#22C55E" }]
  }],
  "dependencies": [],
  "version_dependencies": []
}"##;

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut RoadmapApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([320.0, 170.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Roadmap Gantt").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Product roadmap timeline with");
                ui.label("version dependency markers.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}

/// Render the "Snapshot Format" help dialog.
pub fn show_snapshot_help_dialog(app: &mut RoadmapApp, ctx: &Context) {
    let mut should_close = false;

    Window::new(RichText::new("Snapshot Format").strong().size(14.0))
        .resizable(true)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_size([560.0, 480.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(4.0);

                // ── Top level ────────────────────────────────────────────
                ui.label(RichText::new("Top-level fields").strong());
                ui.add_space(2.0);
                egui::Grid::new("snapshot_fields")
                    .num_columns(2)
                    .striped(true)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Field").underline());
                        ui.label(RichText::new("Contents").underline());
                        ui.end_row();

                        for (field, contents) in [
                            ("name", "Roadmap title"),
                            ("viewer", "{ id, role: admin | member } or null"),
                            ("products", "List of { product, versions, milestones }"),
                            ("dependencies", "Milestone links { source_milestone_id, target_milestone_id, type: FS | SS | FF }"),
                            (
                                "version_dependencies",
                                "{ source_product_version_id, target_product_id, target_product_version_id?, required_status }",
                            ),
                        ] {
                            ui.label(RichText::new(field).monospace());
                            ui.label(contents);
                            ui.end_row();
                        }
                    });
                ui.add_space(8.0);

                // ── Notes ────────────────────────────────────────────────
                ui.label(RichText::new("Notes").strong());
                ui.add_space(2.0);
                let notes = [
                    "• A collection set to null is still loading; a product with null milestones shows the chart as loading.",
                    "• Dates are RFC 3339 timestamps or plain YYYY-MM-DD (midnight UTC). An invalid date rejects the file.",
                    "• Milestones without end_date are drawn as open markers.",
                    "• Milestone colors are #RRGGBB; an empty string uses the default indigo.",
                ];
                for note in &notes {
                    ui.label(RichText::new(*note).small());
                }
                ui.add_space(10.0);

                ui.label(RichText::new("Minimal Example").strong());
                ui.add_space(2.0);
                let example = SNAPSHOT_EXAMPLE;
                egui::Frame::dark_canvas(ui.style()).show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut example.to_string())
                            .font(egui::TextStyle::Monospace)
                            .desired_width(f32::INFINITY)
                            .interactive(false),
                    );
                });
                ui.add_space(8.0);
            });

            ui.separator();
            ui.add_space(4.0);
            if ui.add_sized([80.0, 28.0], egui::Button::new("Close")).clicked() {
                should_close = true;
            }
            ui.add_space(2.0);
        });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_snapshot_help = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RoadmapSnapshot;

    #[test]
    fn help_example_is_a_loadable_snapshot() {
        let snapshot: RoadmapSnapshot = serde_json::from_str(SNAPSHOT_EXAMPLE).unwrap();
        assert_eq!(snapshot.name, "Platform 2025");
        assert_eq!(snapshot.milestone_count(), 1);
        let milestone = &snapshot.products[0].milestones.ready_or_empty()[0];
        assert_eq!(milestone.color_hex(), "#22C55E");
        assert!(milestone.product_version_id.is_some());
    }
}
