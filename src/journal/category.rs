use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Denormalized copy of a category, taken when a pattern is created or
/// edited.
///
/// Patterns and generated expenses store this snapshot instead of a live
/// reference, so renaming or restyling the category elsewhere never
/// rewrites existing history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorySnapshot {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub color: String,
}

impl CategorySnapshot {
    pub fn new(name: impl Into<String>, icon: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
        }
    }
}
