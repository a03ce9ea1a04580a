//! Category: a grouping under a space or under another category
//!
//! The relation tag follows the parent: `#SC#` below a space, `#CC#` below
//! a category. A category linked to a second parent through `link_to` gets
//! one relation per parent, each with the tag of that parent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use canopy_core::EntityRelation;

use crate::keys::{is_category, new_key, CATEGORY_CATEGORY, CATEGORY_PREFIX, SPACE_CATEGORY};

/// A category, child of a space or of another category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// `C#<uuid>`
    pub key: String,
    /// Key of the parent space or category
    pub parent_key: String,
    /// Display name, embedded in the relation key
    pub name: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// New category under `parent_key` with a fresh key
    pub fn new(parent_key: impl Into<String>, name: impl Into<String>) -> Self {
        Category {
            key: new_key(CATEGORY_PREFIX),
            parent_key: parent_key.into(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    /// Relation tag used below `parent_key`
    pub fn tag_for(parent_key: &str) -> &'static str {
        if is_category(parent_key) {
            CATEGORY_CATEGORY
        } else {
            SPACE_CATEGORY
        }
    }
}

record_entity!(Category, "category");

impl EntityRelation for Category {
    fn parent_key(&self) -> String {
        self.parent_key.clone()
    }

    fn rel_name(&self) -> String {
        self.name.clone()
    }

    fn link_name(&self) -> String {
        Self::tag_for(&self.parent_key).to_string()
    }

    fn empty(&self) -> Self {
        Category::default()
    }
}
