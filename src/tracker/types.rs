use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::ElementSet;

/// An object the user asked to follow.
#[derive(Debug, Clone)]
pub struct TrackedObject {
    pub id: String,
    pub display_name: String,
    pub elements: ElementSet,
}

impl TrackedObject {
    pub fn summary(&self) -> TrackedSummary {
        TrackedSummary {
            id: self.id.clone(),
            name: self.display_name.clone(),
        }
    }
}

/// Identifier and display name, for listings and add results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TrackedSummary {
    pub id: String,
    pub name: String,
}
