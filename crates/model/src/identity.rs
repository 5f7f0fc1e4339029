//! Opaque client identities.

use {
    crate::bytes_hex,
    serde::{Deserialize, Deserializer, Serialize, Serializer},
    std::fmt,
};

/// The stable identity of a client as issued by the external identity
/// collaborator, for example the DER encoding of its certificate.
///
/// The mechanism never looks inside the token: seller and bidder checks are
/// exact byte equality, and the commitment scheme hashes the raw bytes as is.
#[derive(Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Identity(Vec<u8>);

impl Identity {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity(0x{})", hex::encode(&self.0))
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bytes_hex::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bytes_hex::deserialize(deserializer).map(Identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_exact() {
        assert_eq!(Identity::new([1, 2, 3]), Identity::new(vec![1, 2, 3]));
        assert_ne!(Identity::new([1, 2, 3]), Identity::new([1, 2]));
    }

    #[test]
    fn debug_prints_hex() {
        assert_eq!(
            format!("{:?}", Identity::new([0xde, 0xad])),
            "Identity(0xdead)"
        );
    }
}
