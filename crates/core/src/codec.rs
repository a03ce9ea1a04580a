//! Versioned entity envelope
//!
//! Every persisted entity is an opaque blob with this layout:
//!
//! ```text
//! +-------+---------+----------+------------+---------------------+
//! | magic | version | kind len | kind bytes | MessagePack payload |
//! | 0xCA  |   u8    |    u8    |   utf-8    |   (named fields)    |
//! +-------+---------+----------+------------+---------------------+
//! ```
//!
//! The kind lets a reader refuse a blob written for another type; the schema
//! version lets a type evolve its fields (payloads are encoded with field
//! names, so added `#[serde(default)]` fields decode from older blobs).

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecError;

/// First byte of every envelope
pub const ENVELOPE_MAGIC: u8 = 0xCA;

/// A serde type with a stable kind name and schema version
pub trait Record: Serialize + DeserializeOwned {
    /// Kind name written into the envelope
    const KIND: &'static str;
    /// Current schema version; older versions must still decode
    const SCHEMA_VERSION: u8;
}

/// Encode `value` into an envelope
pub fn encode<T: Serialize>(kind: &str, version: u8, value: &T) -> Result<Vec<u8>, CodecError> {
    let kind_len = u8::try_from(kind.len())
        .map_err(|_| CodecError::Encode(format!("kind name too long: {}", kind.len())))?;
    let payload = rmp_serde::to_vec_named(value).map_err(|e| CodecError::Encode(e.to_string()))?;

    let mut out = Vec::with_capacity(3 + kind.len() + payload.len());
    out.push(ENVELOPE_MAGIC);
    out.push(version);
    out.push(kind_len);
    out.extend_from_slice(kind.as_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decode an envelope written for `kind` with a version up to `max_version`
pub fn decode<T: DeserializeOwned>(kind: &str, max_version: u8, bytes: &[u8]) -> Result<T, CodecError> {
    let (found_kind, version, payload) = split(bytes)?;
    if found_kind != kind {
        return Err(CodecError::KindMismatch {
            expected: kind.to_string(),
            found: found_kind.to_string(),
        });
    }
    if version > max_version {
        return Err(CodecError::UnsupportedVersion {
            kind: kind.to_string(),
            found: version,
            max: max_version,
        });
    }
    rmp_serde::from_slice(payload).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Read the kind and schema version of an envelope without decoding it
pub fn peek(bytes: &[u8]) -> Result<(&str, u8), CodecError> {
    let (kind, version, _) = split(bytes)?;
    Ok((kind, version))
}

/// Encode a [`Record`]
pub fn encode_record<T: Record>(value: &T) -> Result<Vec<u8>, CodecError> {
    encode(T::KIND, T::SCHEMA_VERSION, value)
}

/// Decode a [`Record`]
pub fn decode_record<T: Record>(bytes: &[u8]) -> Result<T, CodecError> {
    decode(T::KIND, T::SCHEMA_VERSION, bytes)
}

fn split(bytes: &[u8]) -> Result<(&str, u8, &[u8]), CodecError> {
    match bytes {
        [ENVELOPE_MAGIC, version, kind_len, rest @ ..] => {
            let kind_len = usize::from(*kind_len);
            if rest.len() < kind_len {
                return Err(CodecError::Decode("truncated kind".to_string()));
            }
            let (kind, payload) = rest.split_at(kind_len);
            let kind = std::str::from_utf8(kind)
                .map_err(|e| CodecError::Decode(format!("kind is not utf-8: {e}")))?;
            Ok((kind, *version, payload))
        }
        [_, ..] => Err(CodecError::Decode("bad envelope magic".to_string())),
        [] => Err(CodecError::Decode("empty payload".to_string())),
    }
}
