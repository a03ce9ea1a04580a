//! Domain entities for Canopy
//!
//! The platform hierarchy, each level a plain record persisted through the
//! relation-aware CRUD engine:
//!
//! ```text
//! Instance
//!   └── Space               (#IS#)
//!         ├── Ente          (#SE#)
//!         │     └── Property (#EP#)
//!         └── Category      (#SC#)
//!               └── Category (#CC#)
//! ```
//!
//! [`Catalog`] is a stateless facade over a `CrudOperation` that creates,
//! renames and lists these entities.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Implement `Record`, `Entity` and `Keyed` for a serde struct with a `key` field
macro_rules! record_entity {
    ($ty:ty, $kind:literal) => {
        impl canopy_core::Record for $ty {
            const KIND: &'static str = $kind;
            const SCHEMA_VERSION: u8 = 1;
        }

        impl canopy_core::Entity for $ty {
            fn key(&self) -> String {
                self.key.clone()
            }

            fn kind(&self) -> &'static str {
                <Self as canopy_core::Record>::KIND
            }

            fn encode(&self) -> Result<Vec<u8>, canopy_core::CodecError> {
                canopy_core::codec::encode_record(self)
            }

            fn decode_from(&mut self, bytes: &[u8]) -> Result<(), canopy_core::CodecError> {
                *self = canopy_core::codec::decode_record(bytes)?;
                Ok(())
            }
        }

        impl crate::keys::Keyed for $ty {
            fn with_key(key: &str) -> Self {
                Self {
                    key: key.to_string(),
                    ..Default::default()
                }
            }
        }
    };
}

pub mod catalog;
pub mod category;
pub mod ente;
pub mod instance;
pub mod keys;
pub mod property;
pub mod space;

pub use catalog::Catalog;
pub use category::Category;
pub use ente::Ente;
pub use instance::Instance;
pub use keys::Keyed;
pub use property::{Property, PropertyType};
pub use space::Space;
