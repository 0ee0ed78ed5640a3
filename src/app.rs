use std::path::PathBuf;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use egui::Color32;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AppSettings;
use crate::io::svg_export::SvgOptions;
use crate::layout::{compute_layout, ChartOutcome, HighlightEvent, HighlightState, RoadmapInput, Visibility};
use crate::model::{
    Dependency, DependencyKind, Fetch, LifecycleStatus, Milestone, Product, ProductFilter, ProductSlice,
    ProductVersion, ProductVersionDependency, RoadmapSnapshot, Role, Viewer,
};
use crate::ui;
use crate::ui::milestone_detail::DetailAction;

/// Memoised layout, recomputed when the data generation, visibility or
/// filter changes.
#[derive(Debug)]
pub struct LayoutCache {
    key: Option<(u64, Visibility, ProductFilter)>,
    outcome: ChartOutcome,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self {
            key: None,
            outcome: ChartOutcome::Empty,
        }
    }
}

impl LayoutCache {
    pub fn is_fresh(&self, generation: u64, visibility: &Visibility, filter: &ProductFilter) -> bool {
        self.key
            .as_ref()
            .is_some_and(|(g, v, f)| *g == generation && v == visibility && f == filter)
    }

    /// Recompute if stale. Returns true when a new layout was computed.
    pub fn refresh(
        &mut self,
        generation: u64,
        snapshot: &RoadmapSnapshot,
        visibility: &Visibility,
        filter: &ProductFilter,
    ) -> bool {
        if self.is_fresh(generation, visibility, filter) {
            return false;
        }
        let input = RoadmapInput::new(snapshot, filter.apply(&snapshot.products));
        self.outcome = compute_layout(&input, visibility);
        self.key = Some((generation, visibility.clone(), filter.clone()));
        true
    }

    pub fn outcome(&self) -> &ChartOutcome {
        &self.outcome
    }
}

/// Main application state.
pub struct RoadmapApp {
    pub snapshot: RoadmapSnapshot,
    pub file_path: Option<PathBuf>,
    /// Bumped whenever `snapshot` is replaced.
    pub generation: u64,
    pub settings: AppSettings,

    pub filter: ProductFilter,
    pub visibility: Visibility,
    pub highlight: HighlightState,
    pub cache: LayoutCache,

    // Dialog state
    pub show_about: bool,
    pub show_snapshot_help: bool,

    // Status message
    pub status_message: String,
}

impl RoadmapApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: AppSettings) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let mut app = Self::with_settings(settings);
        if let Some(path) = app.settings.last_snapshot.clone() {
            app.load_from(path);
        }
        app
    }

    /// App state without a window, starting from the sample roadmap.
    pub fn with_settings(settings: AppSettings) -> Self {
        Self {
            snapshot: sample_roadmap(),
            file_path: None,
            generation: 0,
            visibility: Visibility::collapsed(settings.collapse_all_by_default),
            settings,
            filter: ProductFilter::default(),
            highlight: HighlightState::default(),
            cache: LayoutCache::default(),
            show_about: false,
            show_snapshot_help: false,
            status_message: "Ready".to_string(),
        }
    }

    pub fn refresh_layout(&mut self) {
        self.cache
            .refresh(self.generation, &self.snapshot, &self.visibility, &self.filter);
    }

    fn replace_snapshot(&mut self, snapshot: RoadmapSnapshot, path: Option<PathBuf>) {
        self.snapshot = snapshot;
        self.file_path = path;
        self.generation += 1;
        self.highlight.clear();
        self.visibility = Visibility::collapsed(self.settings.collapse_all_by_default);
    }

    // --- File operations ---

    pub fn open_snapshot(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Roadmap snapshot", &["json"])
            .pick_file()
        {
            self.load_from(path);
        }
    }

    pub fn reload_snapshot(&mut self) {
        if let Some(path) = self.file_path.clone() {
            self.load_from(path);
        }
    }

    pub fn load_from(&mut self, path: PathBuf) {
        match crate::io::load_snapshot(&path) {
            Ok(snapshot) => {
                self.status_message = format!(
                    "Loaded '{}' ({} products, {} milestones)",
                    snapshot.name,
                    snapshot.products.len(),
                    snapshot.milestone_count()
                );
                self.replace_snapshot(snapshot, Some(path.clone()));
                if self.settings.last_snapshot.as_ref() != Some(&path) {
                    self.settings.last_snapshot = Some(path);
                    self.persist_settings();
                }
            }
            Err(e) => {
                warn!(error = %e, "snapshot load failed");
                self.status_message = format!("Error loading: {}", e);
            }
        }
    }

    pub fn save_snapshot_as(&mut self) {
        let default_name = format!("{}.json", self.snapshot.name);
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Roadmap snapshot", &["json"])
            .set_file_name(&default_name)
            .save_file()
        {
            match crate::io::save_snapshot(&self.snapshot, &path) {
                Ok(()) => {
                    self.status_message = format!("Saved to {}", path.display());
                    self.file_path = Some(path);
                }
                Err(e) => {
                    warn!(error = %e, "snapshot save failed");
                    self.status_message = format!("Error saving: {}", e);
                }
            }
        }
    }

    pub fn load_sample(&mut self) {
        self.replace_snapshot(sample_roadmap(), None);
        self.status_message = "Sample roadmap loaded".to_string();
    }

    fn persist_settings(&mut self) {
        if let Err(e) = self.settings.save() {
            warn!(error = %e, "settings not saved");
        }
    }

    pub fn export_csv(&mut self) {
        self.refresh_layout();
        let Some(layout) = self.cache.outcome().layout() else {
            self.status_message = "Nothing to export: the chart is empty".to_string();
            return;
        };

        let default_name = format!("{}.csv", self.snapshot.name);
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(&default_name)
            .save_file()
        {
            match crate::io::export_rows_csv(layout, &path) {
                Ok(count) => {
                    info!(path = %path.display(), count, "rows exported");
                    self.status_message = format!("Exported {} lines to CSV", count);
                }
                Err(e) => {
                    warn!(error = %e, "CSV export failed");
                    self.status_message = format!("CSV export failed: {}", e);
                }
            }
        }
    }

    pub fn export_svg(&mut self) {
        self.refresh_layout();
        let Some(layout) = self.cache.outcome().layout() else {
            self.status_message = "Nothing to export: the chart is empty".to_string();
            return;
        };

        let default_name = format!("{}.svg", self.snapshot.name);
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG Image", &["svg"])
            .set_file_name(&default_name)
            .save_file()
        {
            let options = SvgOptions {
                title: self.snapshot.name.clone(),
                min_bar_width_pct: self.settings.min_bar_width_pct,
                ..Default::default()
            };
            match crate::io::export_svg(layout, &self.highlight, &options, &path) {
                Ok(()) => self.status_message = format!("Chart exported to {}", path.display()),
                Err(e) => {
                    warn!(error = %e, "SVG export failed");
                    self.status_message = format!("SVG export failed: {}", e);
                }
            }
        }
    }

    // --- Chart operations ---

    pub fn set_all_collapsed(&mut self, collapsed: bool) {
        self.visibility.set_all(collapsed);
    }

    pub fn toggle_product(&mut self, product_id: Uuid) {
        self.visibility.toggle(product_id);
    }

    pub fn open_product(&mut self, product_id: Uuid) {
        let url = self.settings.product_url(product_id);
        match open::that(&url) {
            Ok(()) => self.status_message = format!("Opened {}", url),
            Err(e) => {
                warn!(error = %e, url = %url, "could not open browser");
                self.status_message = format!("Could not open {}: {}", url, e);
            }
        }
    }

    fn chart_summary(&self) -> String {
        match self.cache.outcome() {
            ChartOutcome::Loading => "Loading…".to_string(),
            ChartOutcome::Empty => format!("Products: {}", self.snapshot.products.len()),
            ChartOutcome::Ready(layout) => format!(
                "Rows: {}  ·  Milestones: {}  ·  Links: {}",
                layout.rows.len(),
                layout.positions.len(),
                layout.connectors.len()
            ),
        }
    }
}

impl eframe::App for RoadmapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        // Handle keyboard shortcuts outside closures to avoid borrow issues
        if ctx.input(|i| i.key_pressed(egui::Key::F5)) {
            self.reload_snapshot();
        }
        if self.highlight.selected_milestone.is_none() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.highlight.clear();
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Left panel: filters
        let shown = self.filter.apply(&self.snapshot.products).len();
        let mut filter_action = ui::filter_panel::FilterAction::None;
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .min_width(220.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(10.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                filter_action =
                    ui::filter_panel::show_filter_panel(&mut self.filter, &self.snapshot.products, shown, ui);
            });
        match filter_action {
            ui::filter_panel::FilterAction::Changed => {
                self.highlight.handle(HighlightEvent::CloseMilestone);
            }
            ui::filter_panel::FilterAction::SetAllCollapsed(collapsed) => self.set_all_collapsed(collapsed),
            ui::filter_panel::FilterAction::None => {}
        }

        self.refresh_layout();

        // Bottom panel: status bar
        let summary = self.chart_summary();
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_sub())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(egui::RichText::new(summary).size(10.5).color(ui::theme::TEXT_DIM));
                    });
                });
            });

        // Central panel: roadmap chart
        let mut chart_interaction = ui::roadmap_chart::ChartInteraction::default();
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| match self.cache.outcome() {
            ChartOutcome::Loading => {
                ui.centered_and_justified(|ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading roadmap…");
                    });
                });
            }
            ChartOutcome::Empty => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new("No milestones to display")
                            .color(ui::theme::TEXT_DIM)
                            .size(14.0),
                    );
                });
            }
            ChartOutcome::Ready(layout) => {
                chart_interaction = ui::roadmap_chart::show_roadmap_chart(
                    layout,
                    &self.highlight,
                    &self.visibility,
                    self.settings.min_bar_width_pct,
                    ui,
                );
            }
        });

        for event in chart_interaction.events {
            self.highlight.handle(event);
        }
        if let Some(product_id) = chart_interaction.toggle_product {
            self.toggle_product(product_id);
        }
        if let Some(product_id) = chart_interaction.edit_product {
            self.open_product(product_id);
        }

        // Milestone detail
        let mut detail_action = DetailAction::None;
        if let (Some(id), Some(layout)) = (self.highlight.selected_milestone, self.cache.outcome().layout()) {
            if let Some((section, milestone)) = layout.milestone(id) {
                let product_name = self
                    .snapshot
                    .product(milestone.product_id)
                    .map_or("", |slice| slice.product.name.as_str());
                detail_action =
                    ui::milestone_detail::show_milestone_detail(milestone, section, product_name, ctx);
            }
        }
        match detail_action {
            DetailAction::Close => self.highlight.handle(HighlightEvent::CloseMilestone),
            DetailAction::ViewProduct(product_id) => self.open_product(product_id),
            DetailAction::None => {}
        }

        // Dialogs
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
        if self.show_snapshot_help {
            ui::dialogs::show_snapshot_help_dialog(self, ctx);
        }
    }
}

// ── Sample data ──────────────────────────────────────────────────────────────

fn day(year: i32, month: u32, d: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, d)
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
        .unwrap_or_else(Utc::now)
}

/// A small roadmap spanning this year and the next.
pub fn sample_roadmap() -> RoadmapSnapshot {
    let year = Utc::now().year();
    let mut snapshot = RoadmapSnapshot::new("Sample Roadmap");
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    snapshot.viewer = Some(Viewer {
        id: alice,
        role: Role::Member,
    });

    // ── Identity Platform ───────────────────────────────────────
    let mut identity = Product::new("Identity Platform");
    identity.owner_id = Some(alice);
    identity.owner_name = Some("Alice Moreau".into());
    let id_v1 = ProductVersion::new(identity.id, "1.0", 0);
    let id_v2 = ProductVersion::new(identity.id, "2.0", 1);
    let discovery = Milestone::new(identity.id, "Discovery", day(year, 1, 15))
        .with_end(day(year, 3, 1))
        .with_kind("planning");
    let v1_beta = Milestone::new(identity.id, "Beta", day(year, 3, 1))
        .with_version(id_v1.id)
        .with_end(day(year, 4, 15))
        .with_kind("beta")
        .with_color(Color32::from_rgb(0x3B, 0x82, 0xF6));
    let v1_ga = Milestone::new(identity.id, "GA", day(year, 5, 1))
        .with_version(id_v1.id)
        .with_kind("ga")
        .with_color(Color32::from_rgb(0x22, 0xC5, 0x5E));
    let v2_alpha = Milestone::new(identity.id, "Alpha", day(year, 9, 1))
        .with_version(id_v2.id)
        .with_end(day(year, 10, 15))
        .with_kind("alpha")
        .with_color(Color32::from_rgb(0xA8, 0x55, 0xF7));
    let v2_ga = Milestone::new(identity.id, "GA", day(year + 1, 1, 15))
        .with_version(id_v2.id)
        .with_end(day(year + 1, 3, 1))
        .with_kind("ga")
        .with_color(Color32::from_rgb(0x22, 0xC5, 0x5E));

    // ── Billing Service ─────────────────────────────────────────
    let mut billing = Product::new("Billing Service");
    billing.owner_id = Some(bob);
    billing.owner_name = Some("Bob Lindqvist".into());
    let bill_v3 = ProductVersion::new(billing.id, "3.1", 0);
    let pricing = Milestone::new(billing.id, "Pricing review", day(year, 2, 1))
        .with_end(day(year, 2, 20))
        .with_kind("planning");
    let migration = Milestone::new(billing.id, "Migration", day(year, 4, 1))
        .with_version(bill_v3.id)
        .with_end(day(year, 7, 1))
        .with_kind("beta")
        .with_color(Color32::from_rgb(0xF5, 0x9E, 0x0B));
    let launch = Milestone::new(billing.id, "Launch", day(year, 7, 15))
        .with_version(bill_v3.id)
        .with_kind("ga");

    // ── Reporting Suite ─────────────────────────────────────────
    let mut reporting = Product::new("Reporting Suite");
    reporting.owner_id = Some(alice);
    reporting.owner_name = Some("Alice Moreau".into());
    reporting.lifecycle_status = LifecycleStatus::NotActive;
    let rep_v09 = ProductVersion::new(reporting.id, "0.9", 0);
    let sunset = Milestone::new(reporting.id, "Sunset plan", day(year, 6, 1))
        .with_end(day(year, 12, 1))
        .with_kind("support")
        .with_color(Color32::from_rgb(0x64, 0x74, 0x8B));

    snapshot.dependencies = Fetch::Ready(vec![
        Dependency::new(v1_ga.id, migration.id, DependencyKind::FinishToStart),
        Dependency::new(v2_alpha.id, v2_ga.id, DependencyKind::StartToStart),
    ]);
    snapshot.version_dependencies = Fetch::Ready(vec![
        ProductVersionDependency::new(bill_v3.id, identity.id, Some(id_v2.id), "ga"),
        ProductVersionDependency::new(id_v1.id, billing.id, None, "active"),
    ]);

    snapshot.products = vec![
        ProductSlice {
            product: identity,
            versions: Fetch::Ready(vec![id_v1, id_v2]),
            milestones: Fetch::Ready(vec![discovery, v1_beta, v1_ga, v2_alpha, v2_ga]),
        },
        ProductSlice {
            product: billing,
            versions: Fetch::Ready(vec![bill_v3]),
            milestones: Fetch::Ready(vec![pricing, migration, launch]),
        },
        ProductSlice {
            product: reporting,
            versions: Fetch::Ready(vec![rep_v09]),
            milestones: Fetch::Ready(vec![sunset]),
        },
    ];
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_roadmap_lays_out_with_markers_and_links() {
        let snapshot = sample_roadmap();
        let input = RoadmapInput::new(&snapshot, snapshot.products.iter().collect());
        let outcome = compute_layout(&input, &Visibility::default());
        let layout = outcome.layout().expect("sample has milestones");

        let titles: Vec<&str> = layout.rows.iter().map(|r| r.section.title.as_str()).collect();
        assert_eq!(
            titles,
            [
                "Identity Platform",
                "Product-level",
                "Version 1.0",
                "Version 2.0",
                "Billing Service",
                "Product-level",
                "Version 3.1",
                "Reporting Suite",
                "Product-level",
            ]
        );
        assert_eq!(layout.connectors.len(), 2);
        assert_eq!(layout.separator.map(|s| s.before_index), Some(3));
        assert!(layout.rows[0].section.can_edit_name);
        assert!(!layout.rows[7].section.can_edit_name);
    }

    #[test]
    fn cache_recomputes_only_on_key_change() {
        let mut app = RoadmapApp::with_settings(AppSettings::default());
        app.refresh_layout();
        assert!(app.cache.is_fresh(app.generation, &app.visibility, &app.filter));
        assert!(!app
            .cache
            .refresh(app.generation, &app.snapshot, &app.visibility, &app.filter));

        app.filter.name_query = "billing".into();
        assert!(!app.cache.is_fresh(app.generation, &app.visibility, &app.filter));
        app.refresh_layout();
        let rows = app.cache.outcome().layout().map(|l| l.rows.len());
        assert_eq!(rows, Some(3));

        app.load_sample();
        assert!(!app.cache.is_fresh(app.generation, &app.visibility, &app.filter));
    }

    #[test]
    fn collapse_all_keeps_only_headers() {
        let mut app = RoadmapApp::with_settings(AppSettings::default());
        app.set_all_collapsed(true);
        app.refresh_layout();
        // Nothing left on the time axis once every group is hidden.
        assert_eq!(app.cache.outcome(), &ChartOutcome::Empty);

        let first = app.snapshot.products[0].product.id;
        app.toggle_product(first);
        app.refresh_layout();
        let rows = app.cache.outcome().layout().map(|l| l.rows.len());
        assert_eq!(rows, Some(6));
    }
}
