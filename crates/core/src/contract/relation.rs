//! Parent→child edge record
//!
//! ## Key layout
//!
//! ```text
//! parent_key ++ link_tag ++ name ++ child_key
//! ```
//!
//! This ordering is a storage contract: a prefix scan over
//! `parent_key ++ link_tag` lists every child of one relation kind, ordered by
//! name. Changing it breaks existing data.

use serde::{Deserialize, Serialize};

use crate::codec::{self, Record};
use crate::contract::entity::Entity;
use crate::error::CodecError;

/// One parent→child edge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRecord {
    /// Key of the parent entity
    pub parent_key: String,
    /// Relation kind tag
    pub link_tag: String,
    /// Child display name at the time the edge was written
    pub name: String,
    /// Key of the child entity
    pub child_key: String,
}

impl RelationRecord {
    /// Create a relation record
    pub fn new(
        parent_key: impl Into<String>,
        link_tag: impl Into<String>,
        name: impl Into<String>,
        child_key: impl Into<String>,
    ) -> Self {
        RelationRecord {
            parent_key: parent_key.into(),
            link_tag: link_tag.into(),
            name: name.into(),
            child_key: child_key.into(),
        }
    }

    /// Prefix shared by every edge of kind `link_tag` under `parent_key`
    pub fn children_prefix(parent_key: &str, link_tag: &str) -> String {
        format!("{parent_key}{link_tag}")
    }
}

impl Record for RelationRecord {
    const KIND: &'static str = "relation";
    const SCHEMA_VERSION: u8 = 1;
}

impl Entity for RelationRecord {
    fn key(&self) -> String {
        format!(
            "{}{}{}{}",
            self.parent_key, self.link_tag, self.name, self.child_key
        )
    }

    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode_record(self)
    }

    fn decode_from(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        *self = codec::decode_record(bytes)?;
        Ok(())
    }
}
