//! Vertical row placement with the dependent-products separator.

use serde::{Deserialize, Serialize};

pub const BAR_HEIGHT: f64 = 28.0;
pub const ROW_GAP: f64 = 8.0;
pub const ROW_HEIGHT: f64 = BAR_HEIGHT + ROW_GAP;
pub const SEPARATOR_HEIGHT: f64 = 32.0;
pub const SEPARATOR_LABEL: &str = "Dependent products & versions";

/// The separator row inserted before the first dependent section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Separator {
    /// Index of the first dependent section; the separator sits above it.
    pub before_index: usize,
    pub top: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowGeometry {
    pub tops: Vec<f64>,
    pub separator: Option<Separator>,
    pub content_height: f64,
}

impl RowGeometry {
    /// Place rows given each section's "is dependent" flag, in display order.
    pub fn compose<I>(dependent_flags: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let flags: Vec<bool> = dependent_flags.into_iter().collect();
        let first = flags.iter().position(|&dependent| dependent);

        let tops: Vec<f64> = (0..flags.len())
            .map(|i| match first {
                Some(first) if i >= first => {
                    first as f64 * ROW_HEIGHT + SEPARATOR_HEIGHT + (i - first) as f64 * ROW_HEIGHT
                }
                _ => i as f64 * ROW_HEIGHT,
            })
            .collect();

        let separator = first.map(|index| Separator {
            before_index: index,
            top: index as f64 * ROW_HEIGHT,
        });

        let content_height = match (first, tops.last()) {
            (Some(_), Some(last)) => last + ROW_HEIGHT,
            _ => flags.len() as f64 * ROW_HEIGHT,
        };

        Self {
            tops,
            separator,
            content_height,
        }
    }

    pub fn len(&self) -> usize {
        self.tops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tops.is_empty()
    }

    pub fn top(&self, row: usize) -> Option<f64> {
        self.tops.get(row).copied()
    }

    /// Vertical center of the row, where connectors attach.
    pub fn mid(&self, row: usize) -> Option<f64> {
        self.top(row).map(|top| top + ROW_HEIGHT / 2.0)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_dependent_rows_means_no_separator() {
        let geometry = RowGeometry::compose([false, false, false]);
        assert_eq!(geometry.tops, [0.0, 36.0, 72.0]);
        assert!(geometry.separator.is_none());
        assert_eq!(geometry.content_height, 108.0);
    }

    #[test]
    fn separator_precedes_first_dependent_row_only() {
        let geometry = RowGeometry::compose([false, true, false, true]);
        assert_eq!(geometry.tops, [0.0, 68.0, 104.0, 140.0]);
        assert_eq!(
            geometry.separator,
            Some(Separator {
                before_index: 1,
                top: 36.0
            })
        );
        assert_eq!(geometry.content_height, 176.0);
    }

    #[test]
    fn dependent_first_row_gets_separator_at_top() {
        let geometry = RowGeometry::compose([true]);
        assert_eq!(geometry.tops, [32.0]);
        assert_eq!(geometry.separator.map(|s| s.top), Some(0.0));
        assert_eq!(geometry.content_height, 68.0);
    }

    #[test]
    fn empty_layout_has_zero_height() {
        let geometry = RowGeometry::compose(std::iter::empty());
        assert!(geometry.is_empty());
        assert_eq!(geometry.content_height, 0.0);
    }

    #[test]
    fn mid_is_row_center() {
        let geometry = RowGeometry::compose([false, true]);
        assert_eq!(geometry.mid(0), Some(18.0));
        assert_eq!(geometry.mid(1), Some(86.0));
        assert_eq!(geometry.mid(5), None);
    }
}
