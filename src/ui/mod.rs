pub mod dialogs;
pub mod filter_panel;
pub mod milestone_detail;
pub mod roadmap_chart;
pub mod theme;
pub mod toolbar;
