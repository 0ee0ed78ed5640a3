pub mod csv_export;
pub mod file;
pub mod svg_export;

use std::path::PathBuf;
use thiserror::Error;

pub use csv_export::export_rows_csv;
pub use file::{load_snapshot, save_snapshot};
pub use svg_export::{export_svg, render_svg};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a valid roadmap snapshot: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write CSV to {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
