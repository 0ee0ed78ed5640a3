use std::path::Path;

use super::SnapshotError;
use crate::layout::{LayoutRow, RoadmapLayout};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn markers(row: &LayoutRow) -> String {
    let section = &row.section;
    let mut out = String::new();
    if section.show_blue_asterisk {
        out.push_str("depends-on");
    }
    if section.show_red_asterisk {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str("required-by");
    }
    out
}

/// Export the row table to a semicolon-delimited CSV file.
///
/// Columns: Serial ; Section ; Markers ; Related ; Milestone ; Type ; Start ; End ; Color
/// One line per milestone; header rows get one line with the milestone
/// columns left empty. Returns the number of data lines written.
pub fn export_rows_csv(layout: &RoadmapLayout, path: &Path) -> Result<usize, SnapshotError> {
    let csv_err = |source| SnapshotError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .map_err(csv_err)?;

    wtr.write_record([
        "Serial", "Section", "Markers", "Related", "Milestone", "Type", "Start", "End", "Color",
    ])
    .map_err(csv_err)?;

    let mut written = 0;
    for row in &layout.rows {
        let section = &row.section;
        let serial = section.serial.to_string();
        let related = section
            .related_serials
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let markers = markers(row);

        if section.milestones.is_empty() {
            wtr.write_record([
                serial.as_str(),
                section.title.as_str(),
                markers.as_str(),
                related.as_str(),
                "",
                "",
                "",
                "",
                "",
            ])
            .map_err(csv_err)?;
            written += 1;
            continue;
        }

        for milestone in &section.milestones {
            let end = milestone
                .end_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default();
            wtr.write_record([
                serial.as_str(),
                section.title.as_str(),
                markers.as_str(),
                related.as_str(),
                milestone.label.as_str(),
                milestone.kind.as_str(),
                milestone.start_date.format(DATE_FORMAT).to_string().as_str(),
                end.as_str(),
                milestone.color_hex().as_str(),
            ])
            .map_err(csv_err)?;
            written += 1;
        }
    }

    wtr.flush().map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_layout, RoadmapInput, Visibility};
    use crate::model::{Fetch, Milestone, Product, ProductSlice, RoadmapSnapshot};
    use chrono::{TimeZone, Utc};

    #[test]
    fn writes_header_rows_and_milestone_rows() {
        let mut snapshot = RoadmapSnapshot::new("Export");
        let product = Product::new("Billing");
        let mut slice = ProductSlice::new(product.clone());
        slice.milestones = Fetch::Ready(vec![
            Milestone::new(product.id, "Beta", Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
                .with_kind("beta")
                .with_end(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            Milestone::new(product.id, "GA", Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()),
        ]);
        snapshot.products.push(slice);
        let input = RoadmapInput::new(&snapshot, snapshot.products.iter().collect());
        let outcome = compute_layout(&input, &Visibility::default());
        let layout = outcome.layout().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        assert_eq!(export_rows_csv(layout, &path).unwrap(), 3);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Serial;Section;Markers;Related;Milestone;Type;Start;End;Color");
        assert_eq!(lines[1], "1;Billing;;;;;;;");
        assert_eq!(lines[2], "2;Product-level;;;Beta;beta;2024-02-01;2024-03-01;#6366F1");
        assert_eq!(lines[3], "2;Product-level;;;GA;;2024-04-01;;#6366F1");
    }
}
