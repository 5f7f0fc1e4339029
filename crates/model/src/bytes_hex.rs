//! Serialization of `Vec<u8>` to and from `0x` prefixed hex strings.
//!
//! Binary fields only ever cross the serialization boundary in this encoding;
//! inside the core they stay raw bytes.

use {
    serde::{Deserialize, Deserializer, Serializer, de},
    std::borrow::Cow,
};

pub fn serialize<S, B>(bytes: B, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    B: AsRef<[u8]>,
{
    serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded = Cow::<str>::deserialize(deserializer)?;
    let stripped = encoded
        .strip_prefix("0x")
        .ok_or_else(|| de::Error::custom(format!("missing `0x` prefix in `{encoded}`")))?;
    hex::decode(stripped).map_err(de::Error::custom)
}
