//! Doubly-linked relation index
//!
//! A relation key is composed forward (`parent ++ tag ++ name ++ child`) and
//! cannot be inverted cheaply, so every edge also gets a `DLRel` row keyed by
//! the child:
//!
//! ```text
//! child_id ++ "#R#" ++ parent_id  ->  { child_id, parent_id, rel_type, pointer }
//! ```
//!
//! `pointer` always holds the key of the live relation record. When the
//! relation is replaced the pointer is rewritten in place, never duplicated.

use serde::{Deserialize, Serialize};

use crate::codec::{self, Record};
use crate::contract::entity::Entity;
use crate::error::CodecError;

/// Separator between child and parent in a DLRel key
pub const DLR_SEPARATOR: &str = "#R#";

/// Reverse index row from a child to its relation record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DLRel {
    /// Key of the child entity
    pub child_id: String,
    /// Key of the parent entity
    pub parent_id: String,
    /// Relation kind tag (the child's `link_name`)
    pub rel_type: String,
    /// Key of the current relation record
    pub pointer: String,
}

impl DLRel {
    /// Create a DLRel row
    pub fn new(
        child_id: impl Into<String>,
        parent_id: impl Into<String>,
        rel_type: impl Into<String>,
        pointer: impl Into<String>,
    ) -> Self {
        DLRel {
            child_id: child_id.into(),
            parent_id: parent_id.into(),
            rel_type: rel_type.into(),
            pointer: pointer.into(),
        }
    }

    /// Key of the row linking `child_id` to `parent_id`
    pub fn key_for(child_id: &str, parent_id: &str) -> String {
        format!("{child_id}{DLR_SEPARATOR}{parent_id}")
    }

    /// Prefix shared by every row of `child_id`
    pub fn child_prefix(child_id: &str) -> String {
        format!("{child_id}{DLR_SEPARATOR}")
    }
}

impl Record for DLRel {
    const KIND: &'static str = "dlrel";
    const SCHEMA_VERSION: u8 = 1;
}

impl Entity for DLRel {
    fn key(&self) -> String {
        Self::key_for(&self.child_id, &self.parent_id)
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
