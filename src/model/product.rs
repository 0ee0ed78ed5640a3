use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a product as reported by the roadmap API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    #[default]
    Active,
    NotActive,
    Suspend,
    EndOfRoadmap,
}

impl LifecycleStatus {
    pub const ALL: [LifecycleStatus; 4] = [
        LifecycleStatus::Active,
        LifecycleStatus::NotActive,
        LifecycleStatus::Suspend,
        LifecycleStatus::EndOfRoadmap,
    ];

    /// Human-readable badge text.
    pub fn label(self) -> &'static str {
        match self {
            LifecycleStatus::Active => "Active",
            LifecycleStatus::NotActive => "Not Active",
            LifecycleStatus::Suspend => "Suspended",
            LifecycleStatus::EndOfRoadmap => "End of roadmap",
        }
    }
}

/// A product on the roadmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub lifecycle_status: LifecycleStatus,
    #[serde(default)]
    pub owner_id: Option<Uuid>,
    /// Display name of the owner, when the API expanded it.
    #[serde(default)]
    pub owner_name: Option<String>,
}

impl Product {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            lifecycle_status: LifecycleStatus::Active,
            owner_id: None,
            owner_name: None,
        }
    }
}

/// A released or planned version of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVersion {
    pub id: Uuid,
    pub product_id: Uuid,
    pub version: String,
    /// Position in the product's version list. Ties keep input order.
    #[serde(default)]
    pub order: i32,
}

impl ProductVersion {
    pub fn new(product_id: Uuid, version: impl Into<String>, order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            version: version.into(),
            order,
        }
    }
}
