use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the type of dependency between two milestones.
///
/// Stored and displayed, but every kind is routed the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DependencyKind {
    #[default]
    #[serde(rename = "FS")]
    FinishToStart,
    #[serde(rename = "SS")]
    StartToStart,
    #[serde(rename = "FF")]
    FinishToFinish,
}

impl DependencyKind {
    pub fn short_label(self) -> &'static str {
        match self {
            DependencyKind::FinishToStart => "FS",
            DependencyKind::StartToStart => "SS",
            DependencyKind::FinishToFinish => "FF",
        }
    }
}

/// A dependency link between two milestones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: Uuid,
    pub source_milestone_id: Uuid,
    pub target_milestone_id: Uuid,
    #[serde(rename = "type", default)]
    pub kind: DependencyKind,
}

impl Dependency {
    pub fn new(source: Uuid, target: Uuid, kind: DependencyKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_milestone_id: source,
            target_milestone_id: target,
            kind,
        }
    }
}

/// A product version that waits on another product (or one of its versions)
/// reaching a required status, e.g. "2.0 needs Billing at Pricing Committee
/// Approval".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVersionDependency {
    pub id: Uuid,
    pub source_product_version_id: Uuid,
    pub target_product_id: Uuid,
    #[serde(default)]
    pub target_product_version_id: Option<Uuid>,
    #[serde(default)]
    pub required_status: String,
}

impl ProductVersionDependency {
    pub fn new(
        source_version: Uuid,
        target_product: Uuid,
        target_version: Option<Uuid>,
        required_status: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_product_version_id: source_version,
            target_product_id: target_product,
            target_product_version_id: target_version,
            required_status: required_status.into(),
        }
    }
}
