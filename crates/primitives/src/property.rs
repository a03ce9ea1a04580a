//! Property: a typed attribute of an ente

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use canopy_core::EntityRelation;

use crate::keys::{new_key, ENTE_PROPERTY, PROPERTY_PREFIX};

/// Value type of a property
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    /// UTF-8 text
    #[default]
    Text,
    /// Signed integer
    Integer,
    /// Floating point number
    Float,
    /// true / false
    Boolean,
    /// Point in time
    Timestamp,
}

/// A property, child of an ente
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// `P#<uuid>`
    pub key: String,
    /// Key of the owning ente
    pub ente_key: String,
    /// Display name, embedded in the relation key
    pub name: String,
    /// Value type
    pub value_type: PropertyType,
    /// Whether a value is mandatory
    #[serde(default)]
    pub required: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Property {
    /// New property under `ente_key` with a fresh key
    pub fn new(ente_key: impl Into<String>, name: impl Into<String>, value_type: PropertyType) -> Self {
        Property {
            key: new_key(PROPERTY_PREFIX),
            ente_key: ente_key.into(),
            name: name.into(),
            value_type,
            required: false,
            created_at: Utc::now(),
        }
    }
}

record_entity!(Property, "property");

impl EntityRelation for Property {
    fn parent_key(&self) -> String {
        self.ente_key.clone()
    }

    fn rel_name(&self) -> String {
        self.name.clone()
    }

    fn link_name(&self) -> String {
        ENTE_PROPERTY.to_string()
    }

    fn empty(&self) -> Self {
        Property::default()
    }
}
