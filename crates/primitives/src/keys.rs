//! Key prefixes and relation tags
//!
//! Every entity key is `<prefix><uuid v4>`. Relation tags sit between the
//! parent key and the child name in relation keys, so listing the children
//! of one kind is a prefix scan over `parent ++ tag`.

use canopy_core::Entity;
use uuid::Uuid;

/// Instance key prefix
pub const INSTANCE_PREFIX: &str = "I#";
/// Space key prefix
pub const SPACE_PREFIX: &str = "S#";
/// Ente key prefix
pub const ENTE_PREFIX: &str = "E#";
/// Category key prefix
pub const CATEGORY_PREFIX: &str = "C#";
/// Property key prefix
pub const PROPERTY_PREFIX: &str = "P#";

/// Instance → space
pub const INSTANCE_SPACE: &str = "#IS#";
/// Space → ente
pub const SPACE_ENTE: &str = "#SE#";
/// Space → category
pub const SPACE_CATEGORY: &str = "#SC#";
/// Category → sub-category
pub const CATEGORY_CATEGORY: &str = "#CC#";
/// Ente → property
pub const ENTE_PROPERTY: &str = "#EP#";

/// Fresh key with the given prefix
pub fn new_key(prefix: &str) -> String {
    format!("{}{}", prefix, Uuid::new_v4())
}

/// Entities that can be addressed by key alone
pub trait Keyed: Entity + Sized {
    /// Zero value carrying `key`, ready to be loaded
    fn with_key(key: &str) -> Self;
}

/// True if `key` names a category
pub fn is_category(key: &str) -> bool {
    key.starts_with(CATEGORY_PREFIX)
}
