use chrono::NaiveDate;
use egui::{Color32, RichText, Ui};
use uuid::Uuid;

use crate::model::{LifecycleStatus, ProductFilter, ProductSlice};
use crate::ui::theme;

/// Actions that the filter panel can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    None,
    Changed,
    SetAllCollapsed(bool),
}

/// Distinct product owners, sorted by display name.
pub fn owner_options(products: &[ProductSlice]) -> Vec<(Uuid, String)> {
    let mut owners: Vec<(Uuid, String)> = Vec::new();
    for slice in products {
        let Some(id) = slice.product.owner_id else {
            continue;
        };
        if owners.iter().any(|(known, _)| *known == id) {
            continue;
        }
        let name = slice
            .product
            .owner_name
            .clone()
            .unwrap_or_else(|| id.to_string());
        owners.push((id, name));
    }
    owners.sort_by(|a, b| a.1.to_lowercase().cmp(&b.1.to_lowercase()));
    owners
}

fn date_bound(ui: &mut Ui, label: &str, value: &mut Option<NaiveDate>, fallback: NaiveDate, salt: &str) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        let mut enabled = value.is_some();
        if ui.checkbox(&mut enabled, RichText::new(label).color(theme::TEXT_SECONDARY)).changed() {
            *value = enabled.then_some(value.unwrap_or(fallback));
            changed = true;
        }
        if let Some(date) = value.as_mut() {
            let before = *date;
            ui.add(egui_extras::DatePickerButton::new(date).id_salt(salt));
            changed |= *date != before;
        }
    });
    changed
}

/// Render the left-side filter panel.
pub fn show_filter_panel(
    filter: &mut ProductFilter,
    products: &[ProductSlice],
    shown: usize,
    ui: &mut Ui,
) -> FilterAction {
    let mut action = FilterAction::None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Products")
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({} of {})", shown, products.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(6.0);

    let name = ui.add_sized(
        [ui.available_width(), 24.0],
        egui::TextEdit::singleline(&mut filter.name_query).hint_text("Filter by product name..."),
    );
    if name.changed() {
        action = FilterAction::Changed;
    }
    ui.add_space(4.0);

    egui::Grid::new("filter_grid")
        .num_columns(2)
        .spacing([10.0, 6.0])
        .show(ui, |ui| {
            ui.label(RichText::new("Lifecycle").color(theme::TEXT_SECONDARY));
            let current = filter.lifecycle.map_or("Any", LifecycleStatus::label);
            egui::ComboBox::from_id_salt("filter_lifecycle")
                .selected_text(current)
                .show_ui(ui, |ui| {
                    if ui.selectable_value(&mut filter.lifecycle, None, "Any").changed() {
                        action = FilterAction::Changed;
                    }
                    for status in LifecycleStatus::ALL {
                        if ui
                            .selectable_value(&mut filter.lifecycle, Some(status), status.label())
                            .changed()
                        {
                            action = FilterAction::Changed;
                        }
                    }
                });
            ui.end_row();

            ui.label(RichText::new("Owner").color(theme::TEXT_SECONDARY));
            let owners = owner_options(products);
            let current = filter
                .owner
                .and_then(|id| owners.iter().find(|(known, _)| *known == id))
                .map_or("Any".to_string(), |(_, name)| name.clone());
            egui::ComboBox::from_id_salt("filter_owner")
                .selected_text(current)
                .show_ui(ui, |ui| {
                    if ui.selectable_value(&mut filter.owner, None, "Any").changed() {
                        action = FilterAction::Changed;
                    }
                    for (id, name) in &owners {
                        if ui.selectable_value(&mut filter.owner, Some(*id), name).changed() {
                            action = FilterAction::Changed;
                        }
                    }
                });
            ui.end_row();
        });

    ui.add_space(4.0);
    let today = chrono::Utc::now().date_naive();
    if date_bound(ui, "From", &mut filter.date_from, today, "filter_from") {
        action = FilterAction::Changed;
    }
    if date_bound(ui, "To", &mut filter.date_to, today, "filter_to") {
        action = FilterAction::Changed;
    }

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        let clear = egui::Button::new(RichText::new("Clear filters").color(Color32::WHITE).size(12.0))
            .fill(theme::ACCENT)
            .rounding(egui::Rounding::same(5.0));
        if ui.add_enabled(filter.is_active(), clear).clicked() {
            filter.clear();
            action = FilterAction::Changed;
        }
    });

    ui.add_space(6.0);
    ui.separator();
    ui.add_space(2.0);

    ui.horizontal(|ui| {
        if ui.button("Collapse all").clicked() {
            action = FilterAction::SetAllCollapsed(true);
        }
        if ui.button("Expand all").clicked() {
            action = FilterAction::SetAllCollapsed(false);
        }
    });

    ui.add_space(6.0);
    ui.label(RichText::new("LEGEND").size(9.0).color(theme::TEXT_DIM).strong());
    ui.horizontal(|ui| {
        ui.label(RichText::new("*").color(theme::MARKER_DEPENDENCY).strong());
        ui.label(RichText::new("depends on another product/version").size(11.0));
    });
    ui.horizontal(|ui| {
        ui.label(RichText::new("*").color(theme::MARKER_DEPENDENT).strong());
        ui.label(RichText::new("required by another product").size(11.0));
    });
    ui.label(
        RichText::new("Hover or click a marker to highlight related rows. Click a year to dim rows outside it.")
            .size(10.5)
            .color(theme::TEXT_DIM),
    );

    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Product;

    #[test]
    fn owner_options_are_distinct_and_sorted() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let mk = |name: &str, owner: Option<(Uuid, &str)>| {
            let mut product = Product::new(name);
            product.owner_id = owner.map(|(id, _)| id);
            product.owner_name = owner.map(|(_, n)| n.to_string());
            ProductSlice::new(product)
        };
        let products = vec![
            mk("A", Some((bob, "bob"))),
            mk("B", Some((alice, "Alice"))),
            mk("C", Some((bob, "bob"))),
            mk("D", None),
        ];
        let owners = owner_options(&products);
        assert_eq!(owners, vec![(alice, "Alice".to_string()), (bob, "bob".to_string())]);
    }
}
