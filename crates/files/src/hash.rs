use crate::FilesError;
use sha2::{Digest, Sha256};

/// Lowercase hexadecimal SHA-256 digest.
///
/// Once constructed the value is guaranteed to be exactly 64 characters of `0-9a-f`,
/// which makes it safe to use as a path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sha256Hash(String);

impl Sha256Hash {
    /// Builds a hash from the raw 32-byte digest.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Digest of `content`; the hash [`crate::BlobStore::put`] will store it under.
    pub fn of(content: &[u8]) -> Self {
        let digest: [u8; 32] = Sha256::digest(content).into();
        Self::from_bytes(&digest)
    }

    /// Parses a hash string, rejecting anything that is not canonical lowercase hex.
    pub fn parse(input: &str) -> Result<Self, FilesError> {
        let canonical = input.len() == 64
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if !canonical {
            return Err(FilesError::InvalidHash(input.to_string()));
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Sha256Hash {
    type Error = FilesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Sha256Hash> for String {
    fn from(value: Sha256Hash) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_canonical_hex() {
        let hex = "abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890";
        assert_eq!(Sha256Hash::parse(hex).unwrap().as_str(), hex);
    }

    #[test]
    fn of_matches_known_digest() {
        assert_eq!(
            Sha256Hash::of(b"abc").as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn parse_rejects_traversal_and_uppercase() {
        assert!(Sha256Hash::parse("../../etc/passwd").is_err());
        assert!(Sha256Hash::parse(
            "ABCDEF1234567890ABCDEF1234567890ABCDEF1234567890ABCDEF1234567890"
        )
        .is_err());
        assert!(Sha256Hash::parse("abc").is_err());
    }
}
