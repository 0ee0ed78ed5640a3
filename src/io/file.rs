use std::path::Path;

use tracing::info;

use super::SnapshotError;
use crate::model::RoadmapSnapshot;

/// Save a roadmap snapshot to a JSON file.
pub fn save_snapshot(snapshot: &RoadmapSnapshot, path: &Path) -> Result<(), SnapshotError> {
    let json = serde_json::to_string_pretty(snapshot).map_err(|source| SnapshotError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), products = snapshot.products.len(), "snapshot saved");
    Ok(())
}

/// Load a roadmap snapshot from a JSON file. Malformed timestamps fail the
/// whole load.
pub fn load_snapshot(path: &Path) -> Result<RoadmapSnapshot, SnapshotError> {
    let json = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot: RoadmapSnapshot = serde_json::from_str(&json).map_err(|source| SnapshotError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        products = snapshot.products.len(),
        milestones = snapshot.milestone_count(),
        "snapshot loaded"
    );
    Ok(snapshot)
}
