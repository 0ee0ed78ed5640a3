//! Version-level dependency aggregation.
//!
//! Turns `ProductVersionDependency` records into two flat multimaps keyed by
//! section key, then cross-references display serials. Cycles are fine: the
//! maps are never traversed recursively.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;
use uuid::Uuid;

use super::sections::{section_key, Section};
use crate::model::{ProductSlice, ProductVersionDependency};

/// Blue/red relation sets for one layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyRelations {
    /// source key → target keys (blue marker on the source).
    has_dependency: BTreeMap<String, BTreeSet<String>>,
    /// target key → source keys (red marker on the target).
    is_dependent: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyRelations {
    /// Aggregate records. `version_owners` maps version id → product id; a
    /// record whose source version is unknown is skipped.
    pub fn aggregate<'a, I>(records: I, version_owners: &HashMap<Uuid, Uuid>) -> Self
    where
        I: IntoIterator<Item = &'a ProductVersionDependency>,
    {
        let mut relations = Self::default();
        for record in records {
            let Some(&source_product) = version_owners.get(&record.source_product_version_id) else {
                debug!(
                    dependency = %record.id,
                    version = %record.source_product_version_id,
                    "skipping version dependency with unknown source version"
                );
                continue;
            };
            let source = section_key(source_product, Some(record.source_product_version_id));
            let target = section_key(record.target_product_id, record.target_product_version_id);
            relations.insert(source, target);
        }
        relations
    }

    pub fn insert(&mut self, source: String, target: String) {
        self.has_dependency
            .entry(source.clone())
            .or_default()
            .insert(target.clone());
        self.is_dependent.entry(target).or_default().insert(source);
    }

    /// Blue: the section depends on something.
    pub fn has_dependency(&self, key: &str) -> bool {
        self.has_dependency.contains_key(key)
    }

    /// Red: something depends on the section.
    pub fn is_dependent(&self, key: &str) -> bool {
        self.is_dependent.contains_key(key)
    }

    pub fn targets_of<'s>(&'s self, key: &str) -> impl Iterator<Item = &'s str> + 's {
        self.has_dependency
            .get(key)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn sources_of<'s>(&'s self, key: &str) -> impl Iterator<Item = &'s str> + 's {
        self.is_dependent
            .get(key)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.has_dependency.is_empty()
    }

    /// Fill `related_serials` on every marked section: the sorted union of
    /// the serials of its blue targets and red sources. Serials must already
    /// be assigned. Keys without a displayed section contribute nothing.
    pub fn annotate_serials(&self, sections: &mut [Section]) {
        let serial_of: HashMap<String, usize> = sections
            .iter()
            .map(|section| (section.key.clone(), section.serial))
            .collect();

        for section in sections.iter_mut() {
            if !section.has_marker() {
                section.related_serials.clear();
                continue;
            }
            let related: BTreeSet<usize> = self
                .targets_of(&section.key)
                .chain(self.sources_of(&section.key))
                .filter_map(|key| serial_of.get(key).copied())
                .collect();
            section.related_serials = related.into_iter().collect();
        }
    }
}

/// Version id → owning product id, across every loaded product.
pub fn version_owners<'a, I>(products: I) -> HashMap<Uuid, Uuid>
where
    I: IntoIterator<Item = &'a ProductSlice>,
{
    products
        .into_iter()
        .flat_map(|slice| slice.versions.ready_or_empty())
        .map(|version| (version.id, version.product_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::sections::SectionKind;
    use crate::model::{Fetch, Product, ProductVersion};

    fn section(key: &str, serial: usize, red: bool, blue: bool) -> Section {
        Section {
            key: key.to_string(),
            title: key.to_string(),
            kind: SectionKind::ProductLevel,
            indent: 1,
            product_id: Uuid::nil(),
            milestones: Vec::new(),
            can_edit_name: false,
            show_red_asterisk: red,
            show_blue_asterisk: blue,
            serial,
            related_serials: Vec::new(),
        }
    }

    #[test]
    fn builds_both_multimaps_from_records() {
        let p1 = Uuid::new_v4();
        let p2 = Uuid::new_v4();
        let v1 = Uuid::new_v4();
        let v9 = Uuid::new_v4();
        let owners = HashMap::from([(v1, p1), (v9, p2)]);
        let records = vec![
            ProductVersionDependency::new(v1, p2, None, "approved"),
            ProductVersionDependency::new(v1, p2, Some(v9), "ga"),
        ];

        let relations = DependencyRelations::aggregate(&records, &owners);
        let source = format!("{}-{}", p1, v1);
        assert!(relations.has_dependency(&source));
        assert!(relations.is_dependent(&format!("{}-product", p2)));
        assert!(relations.is_dependent(&format!("{}-{}", p2, v9)));
        assert_eq!(relations.targets_of(&source).count(), 2);
        assert!(!relations.is_dependent(&source));
    }

    #[test]
    fn unknown_source_version_is_skipped() {
        let relations = DependencyRelations::aggregate(
            &[ProductVersionDependency::new(Uuid::new_v4(), Uuid::new_v4(), None, "x")],
            &HashMap::new(),
        );
        assert!(relations.is_empty());
    }

    #[test]
    fn cycles_mark_both_ends_with_both_colors() {
        let mut relations = DependencyRelations::default();
        relations.insert("a".into(), "b".into());
        relations.insert("b".into(), "a".into());
        for key in ["a", "b"] {
            assert!(relations.has_dependency(key));
            assert!(relations.is_dependent(key));
        }
    }

    #[test]
    fn combined_marker_lists_union_once() {
        let mut relations = DependencyRelations::default();
        relations.insert("x".into(), "y".into());
        relations.insert("y".into(), "x".into());
        relations.insert("x".into(), "z".into());
        relations.insert("x".into(), "gone".into());

        let mut sections = vec![
            section("x", 1, true, true),
            section("y", 2, true, true),
            section("z", 3, true, false),
            section("plain", 4, false, false),
        ];
        relations.annotate_serials(&mut sections);

        assert_eq!(sections[0].related_serials, vec![2, 3]);
        assert_eq!(sections[1].related_serials, vec![1]);
        assert_eq!(sections[2].related_serials, vec![1]);
        assert!(sections[3].related_serials.is_empty());
    }

    #[test]
    fn version_owners_skip_pending_lists() {
        let product = Product::new("Billing");
        let mut loaded = ProductSlice::new(product.clone());
        let version = ProductVersion::new(product.id, "1.0", 0);
        loaded.versions = Fetch::Ready(vec![version.clone()]);
        let mut pending = ProductSlice::new(Product::new("Later"));
        pending.versions = Fetch::Pending;

        let owners = version_owners([&loaded, &pending]);
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[&version.id], product.id);
    }
}
