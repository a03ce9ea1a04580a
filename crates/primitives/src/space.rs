//! Space: a named area inside an instance

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use canopy_core::EntityRelation;

use crate::keys::{new_key, INSTANCE_SPACE, SPACE_PREFIX};

/// A space, child of an instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Space {
    /// `S#<uuid>`
    pub key: String,
    /// Key of the owning instance
    pub instance_key: String,
    /// Display name, embedded in the relation key
    pub name: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Space {
    /// New space under `instance_key` with a fresh key
    pub fn new(instance_key: impl Into<String>, name: impl Into<String>) -> Self {
        Space {
            key: new_key(SPACE_PREFIX),
            instance_key: instance_key.into(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

record_entity!(Space, "space");

impl EntityRelation for Space {
    fn parent_key(&self) -> String {
        self.instance_key.clone()
    }

    fn rel_name(&self) -> String {
        self.name.clone()
    }

    fn link_name(&self) -> String {
        INSTANCE_SPACE.to_string()
    }

    fn empty(&self) -> Self {
        Space::default()
    }
}
