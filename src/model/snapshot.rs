use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::dependency::{Dependency, ProductVersionDependency};
use super::milestone::Milestone;
use super::product::{Product, ProductVersion};
use super::viewer::Viewer;

/// A collection that may still be in flight from the API.
///
/// Serialized as the plain value, or `null` while pending.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<T> {
    Pending,
    Ready(T),
}

impl<T> Default for Fetch<T> {
    fn default() -> Self {
        Fetch::Pending
    }
}

impl<T> Fetch<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Fetch::Pending)
    }

    pub fn as_ref(&self) -> Fetch<&T> {
        match self {
            Fetch::Pending => Fetch::Pending,
            Fetch::Ready(value) => Fetch::Ready(value),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Fetch::Pending => None,
            Fetch::Ready(value) => Some(value),
        }
    }
}

impl<T> Fetch<Vec<T>> {
    /// Not-yet-loaded collections read as empty.
    pub fn ready_or_empty(&self) -> &[T] {
        match self {
            Fetch::Pending => &[],
            Fetch::Ready(items) => items,
        }
    }
}

impl<T> From<Option<T>> for Fetch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Fetch::Ready(value),
            None => Fetch::Pending,
        }
    }
}

impl<T: Serialize> Serialize for Fetch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.ready().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Fetch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Fetch::from)
    }
}

/// One product with the collections fetched for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSlice {
    pub product: Product,
    #[serde(default)]
    pub versions: Fetch<Vec<ProductVersion>>,
    #[serde(default)]
    pub milestones: Fetch<Vec<Milestone>>,
}

impl ProductSlice {
    pub fn new(product: Product) -> Self {
        Self {
            product,
            versions: Fetch::Ready(Vec::new()),
            milestones: Fetch::Ready(Vec::new()),
        }
    }

    /// Versions in version-list order (stable on ties).
    pub fn ordered_versions(&self) -> Vec<&ProductVersion> {
        let mut versions: Vec<&ProductVersion> = self.versions.ready_or_empty().iter().collect();
        versions.sort_by_key(|v| v.order);
        versions
    }
}

/// Everything the roadmap view reads from the API, as saved to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapSnapshot {
    pub name: String,
    #[serde(default)]
    pub viewer: Option<Viewer>,
    #[serde(default)]
    pub products: Vec<ProductSlice>,
    #[serde(default)]
    pub dependencies: Fetch<Vec<Dependency>>,
    #[serde(default)]
    pub version_dependencies: Fetch<Vec<ProductVersionDependency>>,
}

impl Default for RoadmapSnapshot {
    fn default() -> Self {
        Self {
            name: "Untitled Roadmap".to_string(),
            viewer: None,
            products: Vec::new(),
            dependencies: Fetch::Ready(Vec::new()),
            version_dependencies: Fetch::Ready(Vec::new()),
        }
    }
}

impl RoadmapSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn product(&self, id: Uuid) -> Option<&ProductSlice> {
        self.products.iter().find(|slice| slice.product.id == id)
    }

    pub fn milestone_count(&self) -> usize {
        self.products
            .iter()
            .map(|slice| slice.milestones.ready_or_empty().len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_missing_collections_are_pending() {
        let json = r#"{
            "name": "Q3",
            "products": [
                { "product": { "id": "6f1c2b7e-8f1e-4c55-9d1a-3c0f7f2c1a01", "name": "Billing" },
                  "versions": [],
                  "milestones": null }
            ]
        }"#;
        let snapshot: RoadmapSnapshot = serde_json::from_str(json).unwrap();
        let slice = &snapshot.products[0];
        assert_eq!(slice.versions, Fetch::Ready(Vec::new()));
        assert!(slice.milestones.is_pending());
        assert!(snapshot.dependencies.is_pending());
        assert!(snapshot.version_dependencies.ready_or_empty().is_empty());
    }

    #[test]
    fn ordered_versions_sorts_by_order_and_keeps_ties() {
        let product = Product::new("Billing");
        let mut slice = ProductSlice::new(product.clone());
        let v3 = ProductVersion::new(product.id, "3.0", 2);
        let v1 = ProductVersion::new(product.id, "1.0", 0);
        let v2a = ProductVersion::new(product.id, "2.0", 1);
        let v2b = ProductVersion::new(product.id, "2.1", 1);
        slice.versions = Fetch::Ready(vec![v3, v1, v2a, v2b]);

        let labels: Vec<&str> = slice.ordered_versions().iter().map(|v| v.version.as_str()).collect();
        assert_eq!(labels, ["1.0", "2.0", "2.1", "3.0"]);
    }
}
