pub mod dependency;
pub mod filter;
pub mod milestone;
pub mod product;
pub mod snapshot;
pub mod viewer;

pub use dependency::{Dependency, DependencyKind, ProductVersionDependency};
pub use filter::ProductFilter;
pub use milestone::{FieldError, Milestone};
pub use product::{LifecycleStatus, Product, ProductVersion};
pub use snapshot::{Fetch, ProductSlice, RoadmapSnapshot};
pub use viewer::{Role, Viewer};
