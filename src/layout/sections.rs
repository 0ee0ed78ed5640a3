//! Row construction: one header per product, then its product-level and
//! per-version groups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregate::DependencyRelations;
use crate::model::{Milestone, ProductSlice, Viewer};

/// Key suffix of the product-level group.
pub const PRODUCT_LEVEL_KEY: &str = "product";
pub const PRODUCT_LEVEL_TITLE: &str = "Product-level";

/// `{product}-{version}`, or `{product}-product` without a version.
pub fn section_key(product_id: Uuid, version_id: Option<Uuid>) -> String {
    match version_id {
        Some(version_id) => format!("{product_id}-{version_id}"),
        None => format!("{product_id}-{PRODUCT_LEVEL_KEY}"),
    }
}

pub fn header_key(product_id: Uuid) -> String {
    format!("{product_id}-header")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionKind {
    ProductHeader,
    ProductLevel,
    Version { version_id: Uuid },
}

/// One displayed row of the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub key: String,
    pub title: String,
    pub kind: SectionKind,
    /// 0 for product headers, 1 for groups.
    pub indent: u8,
    pub product_id: Uuid,
    pub milestones: Vec<Milestone>,
    pub can_edit_name: bool,
    /// Red marker: something depends on this group.
    pub show_red_asterisk: bool,
    /// Blue marker: this group depends on something.
    pub show_blue_asterisk: bool,
    /// 1-based position in display order.
    pub serial: usize,
    pub related_serials: Vec<usize>,
}

impl Section {
    pub fn is_header(&self) -> bool {
        self.kind == SectionKind::ProductHeader
    }

    pub fn is_dependent(&self) -> bool {
        self.show_red_asterisk
    }

    pub fn has_dependency(&self) -> bool {
        self.show_blue_asterisk
    }

    pub fn has_marker(&self) -> bool {
        self.show_red_asterisk || self.show_blue_asterisk
    }

    /// Cross-reference superscript: `*` then the related serials, e.g.
    /// `*2,5`. One per row even when both markers are set.
    pub fn superscript(&self) -> Option<String> {
        if !self.has_marker() {
            return None;
        }
        let serials: Vec<String> = self.related_serials.iter().map(usize::to_string).collect();
        Some(format!("*{}", serials.join(",")))
    }

    /// Whether any milestone in the row touches the calendar year.
    pub fn overlaps_year(&self, year: i32) -> bool {
        self.milestones.iter().any(|m| m.overlaps_year(year))
    }
}

/// Which products show their groups under the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Visibility {
    pub collapse_all: bool,
    /// Per-product collapsed flag overriding `collapse_all`.
    pub overrides: BTreeMap<Uuid, bool>,
}

impl Visibility {
    pub fn collapsed(collapse_all: bool) -> Self {
        Self {
            collapse_all,
            overrides: BTreeMap::new(),
        }
    }

    pub fn is_collapsed(&self, product_id: Uuid) -> bool {
        self.overrides
            .get(&product_id)
            .copied()
            .unwrap_or(self.collapse_all)
    }

    pub fn shows_groups(&self, product_id: Uuid) -> bool {
        !self.is_collapsed(product_id)
    }

    pub fn toggle(&mut self, product_id: Uuid) {
        let collapsed = self.is_collapsed(product_id);
        self.overrides.insert(product_id, !collapsed);
    }

    /// Collapse or expand everything, dropping per-product overrides.
    pub fn set_all(&mut self, collapsed: bool) {
        self.collapse_all = collapsed;
        self.overrides.clear();
    }
}

/// Build the rows for `products` in input order. Serials are left at zero
/// until [`assign_serials`] runs.
pub fn build_sections(
    products: &[&ProductSlice],
    relations: &DependencyRelations,
    visibility: &Visibility,
    viewer: Option<&Viewer>,
) -> Vec<Section> {
    let mut sections = Vec::new();

    for slice in products {
        let product = &slice.product;
        sections.push(Section {
            key: header_key(product.id),
            title: product.name.clone(),
            kind: SectionKind::ProductHeader,
            indent: 0,
            product_id: product.id,
            milestones: Vec::new(),
            can_edit_name: viewer.is_some_and(|v| v.can_edit_product(product)),
            show_red_asterisk: false,
            show_blue_asterisk: false,
            serial: 0,
            related_serials: Vec::new(),
        });

        if !visibility.shows_groups(product.id) {
            continue;
        }

        let milestones = slice.milestones.ready_or_empty();
        let group = |kind: SectionKind, version_id: Option<Uuid>, title: String| {
            let grouped: Vec<Milestone> = milestones
                .iter()
                .filter(|m| m.product_version_id == version_id)
                .cloned()
                .collect();
            if grouped.is_empty() {
                return None;
            }
            let key = section_key(product.id, version_id);
            Some(Section {
                show_red_asterisk: relations.is_dependent(&key),
                show_blue_asterisk: relations.has_dependency(&key),
                key,
                title,
                kind,
                indent: 1,
                product_id: product.id,
                milestones: grouped,
                can_edit_name: false,
                serial: 0,
                related_serials: Vec::new(),
            })
        };

        sections.extend(group(SectionKind::ProductLevel, None, PRODUCT_LEVEL_TITLE.to_string()));
        for version in slice.ordered_versions() {
            sections.extend(group(
                SectionKind::Version {
                    version_id: version.id,
                },
                Some(version.id),
                format!("Version {}", version.version),
            ));
        }
    }

    sections
}

/// Number sections 1.. in display order.
pub fn assign_serials(sections: &mut [Section]) {
    for (index, section) in sections.iter_mut().enumerate() {
        section.serial = index + 1;
    }
}
