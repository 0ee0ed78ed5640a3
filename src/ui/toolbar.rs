use crate::app::RoadmapApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut RoadmapApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_header()), |ui| {
            if ui.button("  Open Snapshot...").clicked() {
                app.open_snapshot();
                ui.close_menu();
            }
            if ui
                .add_enabled(app.file_path.is_some(), egui::Button::new("  Reload          F5"))
                .clicked()
            {
                app.reload_snapshot();
                ui.close_menu();
            }
            if ui.button("  Save Snapshot As...").clicked() {
                app.save_snapshot_as();
                ui.close_menu();
            }
            if ui.button("  Load Sample Roadmap").clicked() {
                app.load_sample();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Export Rows (CSV)...").clicked() {
                app.export_csv();
                ui.close_menu();
            }
            if ui.button("  Export Chart (SVG)...").clicked() {
                app.export_svg();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_header()), |ui| {
            if ui.button("  Collapse All").clicked() {
                app.set_all_collapsed(true);
                ui.close_menu();
            }
            if ui.button("  Expand All").clicked() {
                app.set_all_collapsed(false);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Clear Highlights    Esc").clicked() {
                app.highlight.clear();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_header()), |ui| {
            if ui.button("Snapshot Format").clicked() {
                app.show_snapshot_help = true;
                ui.close_menu();
            }
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        // Right-aligned roadmap name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let source = match &app.file_path {
                Some(path) => path.display().to_string(),
                None => "built-in sample".to_string(),
            };
            ui.label(
                RichText::new(format!("{} · {}", app.snapshot.name, source))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
