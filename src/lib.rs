//! Product roadmap timeline: dependency-aware row layout over a
//! normalized time axis, with an egui front end.

pub mod app;
pub mod config;
pub mod io;
pub mod layout;
pub mod model;
pub mod ui;
