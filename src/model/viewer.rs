use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::{LifecycleStatus, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    #[serde(other)]
    Member,
}

/// The signed-in user, as resolved by the external auth layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewer {
    pub id: Uuid,
    #[serde(default)]
    pub role: Role,
}

impl Viewer {
    /// Admins edit anything; owners edit their own product while it is active.
    pub fn can_edit_product(&self, product: &Product) -> bool {
        if self.role == Role::Admin {
            return true;
        }
        product.lifecycle_status == LifecycleStatus::Active && product.owner_id == Some(self.id)
    }
}
