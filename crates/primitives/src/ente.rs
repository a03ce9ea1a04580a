//! Ente: a typed thing living in a space

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use canopy_core::EntityRelation;

use crate::keys::{new_key, ENTE_PREFIX, SPACE_ENTE};

/// An ente, child of a space
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ente {
    /// `E#<uuid>`
    pub key: String,
    /// Key of the owning space
    pub space_key: String,
    /// Display name, embedded in the relation key
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Ente {
    /// New ente under `space_key` with a fresh key
    pub fn new(space_key: impl Into<String>, name: impl Into<String>) -> Self {
        Ente {
            key: new_key(ENTE_PREFIX),
            space_key: space_key.into(),
            name: name.into(),
            description: String::new(),
            created_at: Utc::now(),
        }
    }
}

record_entity!(Ente, "ente");

impl EntityRelation for Ente {
    fn parent_key(&self) -> String {
        self.space_key.clone()
    }

    fn rel_name(&self) -> String {
        self.name.clone()
    }

    fn link_name(&self) -> String {
        SPACE_ENTE.to_string()
    }

    fn empty(&self) -> Self {
        Ente::default()
    }
}
