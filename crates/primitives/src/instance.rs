//! Instance: the tenant root of the hierarchy
//!
//! An instance has no parent and no relation record of its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::keys::{new_key, INSTANCE_PREFIX};

/// A tenant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// `I#<uuid>`
    pub key: String,
    /// Display name
    pub name: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Instance {
    /// New instance with a fresh key
    pub fn new(name: impl Into<String>) -> Self {
        Instance {
            key: new_key(INSTANCE_PREFIX),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

record_entity!(Instance, "instance");
