use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 digest of a payload, used to detect duplicate submissions.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub(crate) fn of(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }
}

// Only a prefix, so logs never carry a full content digest.
impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint(")?;
        for byte in &self.0[..4] {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, "..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_bytes_same_fingerprint() {
        assert_eq!(Fingerprint::of(b"hello"), Fingerprint::of(b"hello"));
        assert_ne!(Fingerprint::of(b"hello"), Fingerprint::of(b"hello "));
    }

    #[test]
    fn test_known_digest() {
        // sha256("hello")
        let fp = Fingerprint::of(b"hello");
        assert_eq!(format!("{:?}", fp), "Fingerprint(2cf24dba..)");
    }
}
