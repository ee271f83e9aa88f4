//! # Identifier Codec
//!
//! Converts between the external 24-character hex form of a record
//! identifier and its internal 12-byte representation.
//!
//! Layout of the internal value:
//!
//! ```text
//! | 4 bytes        | 5 bytes              | 3 bytes          |
//! | unix seconds   | per-process random   | wrapping counter |
//! ```
//!
//! The leading timestamp makes identifiers trend upward with creation
//! order; the random and counter parts keep two mints in the same second
//! distinct.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::errors::IdError;

/// Number of bytes in the internal representation
pub const ID_LEN: usize = 12;

/// Number of characters in the external representation
pub const HEX_LEN: usize = ID_LEN * 2;

const COUNTER_MASK: u32 = 0x00FF_FFFF;

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

/// Store-assigned record identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; ID_LEN]);

impl ObjectId {
    /// Mint a fresh identifier.
    pub fn new() -> Self {
        Self::with_timestamp(Utc::now().timestamp() as u32)
    }

    fn with_timestamp(secs: u32) -> Self {
        let process = PROCESS_UNIQUE.get_or_init(rand::random::<[u8; 5]>);
        let counter = COUNTER
            .get_or_init(|| AtomicU32::new(rand::random::<u32>() & COUNTER_MASK))
            .fetch_add(1, Ordering::Relaxed)
            & COUNTER_MASK;

        let mut bytes = [0u8; ID_LEN];
        bytes[0..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(process);
        bytes[9..12].copy_from_slice(&counter.to_be_bytes()[1..4]);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; ID_LEN] {
        self.0
    }

    /// Encode to the external form (24 lowercase hex characters)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode the external form.
    ///
    /// Fails with [`IdError::InvalidIdentifier`] for anything that is not
    /// exactly 24 hex characters. Upper and lower case digits are accepted.
    pub fn parse_str(s: &str) -> Result<Self, IdError> {
        if s.len() != HEX_LEN {
            return Err(IdError::InvalidIdentifier(format!(
                "expected {} hex characters, got {}",
                HEX_LEN,
                s.len()
            )));
        }

        let mut bytes = [0u8; ID_LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|_| IdError::InvalidIdentifier("not a hex string".to_string()))?;
        Ok(Self(bytes))
    }

    /// Creation time embedded in the identifier (second precision)
    pub fn timestamp(&self) -> DateTime<Utc> {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        Utc.timestamp_opt(i64::from(secs), 0)
            .single()
            .unwrap_or_default()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hex_round_trip() {
        for input in [
            "5f1b2c3d4e5f60718293a4b5",
            "000000000000000000000000",
            "ffffffffffffffffffffffff",
        ] {
            let id = ObjectId::parse_str(input).unwrap();
            assert_eq!(id.to_hex(), input);
        }
    }

    #[test]
    fn test_uppercase_hex_accepted() {
        let id = ObjectId::parse_str("5F1B2C3D4E5F60718293A4B5").unwrap();
        assert_eq!(id.to_hex(), "5f1b2c3d4e5f60718293a4b5");
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(ObjectId::parse_str("").is_err());
        assert!(ObjectId::parse_str("5f1b2c3d").is_err());
        assert!(ObjectId::parse_str("5f1b2c3d4e5f60718293a4b5aa").is_err());
    }

    #[test]
    fn test_non_hex_rejected() {
        let result = ObjectId::parse_str("zz1b2c3d4e5f60718293a4b5");
        assert!(matches!(result, Err(IdError::InvalidIdentifier(_))));
        // 24 bytes but multi-byte characters
        assert!(ObjectId::parse_str("é1b2c3d4e5f60718293a4b5").is_err());
    }

    #[test]
    fn test_minted_ids_are_unique() {
        let ids: HashSet<ObjectId> = (0..10_000).map(|_| ObjectId::new()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_ids_trend_with_creation_time() {
        let earlier = ObjectId::with_timestamp(1_600_000_000);
        let later = ObjectId::with_timestamp(1_700_000_000);
        assert!(earlier < later);
        assert_eq!(earlier.timestamp().timestamp(), 1_600_000_000);
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let id = ObjectId::parse_str("5f1b2c3d4e5f60718293a4b5").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"5f1b2c3d4e5f60718293a4b5\"");

        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ObjectId>("\"nope\"").is_err());
    }
}
