use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::LifecycleStatus;
use super::snapshot::{Fetch, ProductSlice};

/// Product-level filter applied before sections are built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name.
    pub name_query: String,
    pub lifecycle: Option<LifecycleStatus>,
    pub owner: Option<Uuid>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl ProductFilter {
    pub fn is_active(&self) -> bool {
        !self.name_query.trim().is_empty()
            || self.lifecycle.is_some()
            || self.owner.is_some()
            || self.has_date_window()
    }

    pub fn has_date_window(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, slice: &ProductSlice) -> bool {
        let product = &slice.product;
        let query = self.name_query.trim().to_lowercase();
        if !query.is_empty() && !product.name.to_lowercase().contains(&query) {
            return false;
        }
        if self.lifecycle.is_some_and(|status| status != product.lifecycle_status) {
            return false;
        }
        if self.owner.is_some() && self.owner != product.owner_id {
            return false;
        }
        if self.has_date_window() {
            // Milestones still loading cannot rule the product out yet.
            return match &slice.milestones {
                Fetch::Pending => true,
                Fetch::Ready(milestones) => milestones
                    .iter()
                    .any(|m| m.overlaps_days(self.date_from, self.date_to)),
            };
        }
        true
    }

    /// Keep the matching products, in input order.
    pub fn apply<'a>(&self, products: &'a [ProductSlice]) -> Vec<&'a ProductSlice> {
        products.iter().filter(|slice| self.matches(slice)).collect()
    }
}
