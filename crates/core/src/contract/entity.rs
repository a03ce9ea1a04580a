//! `Entity` and `EntityRelation` traits

use std::fmt;

use crate::contract::dlrel::DLRel;
use crate::contract::relation::RelationRecord;
use crate::error::CodecError;

/// Anything persisted under a unique string key
///
/// Keys are unique within the store: no two live entities share a key.
/// The payload is opaque to the store; each type owns its encoding (usually
/// through [`crate::codec::encode_record`]).
pub trait Entity: fmt::Debug + Send + Sync {
    /// Storage key
    fn key(&self) -> String;

    /// Kind name used in error context
    fn kind(&self) -> &'static str;

    /// Diagnostic label
    fn label(&self) -> String {
        format!("{}({})", self.kind(), self.key())
    }

    /// Serialize into an opaque blob
    fn encode(&self) -> Result<Vec<u8>, CodecError>;

    /// Replace `self` with the value decoded from `bytes`
    fn decode_from(&mut self, bytes: &[u8]) -> Result<(), CodecError>;
}

/// An entity that participates in a parent/child hierarchy
///
/// The default [`link`](EntityRelation::link) and
/// [`relink`](EntityRelation::relink) build a [`RelationRecord`] keyed
/// `parent ++ link_name ++ rel_name ++ key`.
pub trait EntityRelation: Entity {
    /// Key of the containing entity
    fn parent_key(&self) -> String;

    /// Mutable display name embedded in the relation key
    fn rel_name(&self) -> String;

    /// Stable tag naming the kind of relation
    fn link_name(&self) -> String;

    /// Zero value of the same type, used to decode the stored copy
    fn empty(&self) -> Self
    where
        Self: Sized;

    /// Relation record built from the current field values
    fn link(&self) -> Box<dyn Entity> {
        Box::new(RelationRecord::new(
            self.parent_key(),
            self.link_name(),
            self.rel_name(),
            self.key(),
        ))
    }

    /// Relation record rebuilt from a stored parent/type pair and the current name
    fn relink(&self, dlr: &DLRel) -> Box<dyn Entity> {
        Box::new(RelationRecord::new(
            dlr.parent_id.clone(),
            dlr.rel_type.clone(),
            self.rel_name(),
            self.key(),
        ))
    }
}
