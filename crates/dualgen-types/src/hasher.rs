use crate::digest::ContentDigest;
use crate::error::TypeError;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g. `"dualgen-file-v1"`) that is
/// prepended to every hash computation, so a file and a bundle with identical
/// bytes never share a digest.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for generated file contents.
    pub const FILE: Self = Self {
        domain: "dualgen-file-v1",
    };
    /// Hasher for aggregate bundle digests.
    pub const BUNDLE: Self = Self {
        domain: "dualgen-bundle-v1",
    };
    /// Hasher for canonical configuration documents.
    pub const CONFIG: Self = Self {
        domain: "dualgen-config-v1",
    };

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> ContentDigest {
        let mut hasher = self.start();
        hasher.update(data);
        ContentDigest::from_hash(*hasher.finalize().as_bytes())
    }

    /// Hash a sequence of byte parts, each length-prefixed so that
    /// `["ab", "c"]` and `["a", "bc"]` never collide.
    pub fn hash_parts<'a, I>(&self, parts: I) -> ContentDigest
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut hasher = self.start();
        for part in parts {
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        ContentDigest::from_hash(*hasher.finalize().as_bytes())
    }

    /// Hash a serializable value as JSON with domain separation.
    ///
    /// `serde_json` maps are ordered by key, so any value that goes through
    /// `serde_json::Value` first hashes independently of field order.
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> Result<ContentDigest, TypeError> {
        let data =
            serde_json::to_vec(value).map_err(|e| TypeError::Serialization(e.to_string()))?;
        Ok(self.hash(&data))
    }

    /// Verify that data produces the expected digest.
    pub fn verify(&self, data: &[u8], expected: &ContentDigest) -> bool {
        self.hash(data) == *expected
    }

    fn start(&self) -> blake3::Hasher {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let data = b"export type FrequencyBand = 'low';";
        assert_eq!(ContentHasher::FILE.hash(data), ContentHasher::FILE.hash(data));
    }

    #[test]
    fn different_domains_produce_different_hashes() {
        let data = b"same content";
        let file = ContentHasher::FILE.hash(data);
        let bundle = ContentHasher::BUNDLE.hash(data);
        let config = ContentHasher::CONFIG.hash(data);
        assert_ne!(file, bundle);
        assert_ne!(file, config);
        assert_ne!(bundle, config);
    }

    #[test]
    fn parts_are_length_prefixed() {
        let a = ContentHasher::BUNDLE.hash_parts([b"ab".as_slice(), b"c".as_slice()]);
        let b = ContentHasher::BUNDLE.hash_parts([b"a".as_slice(), b"bc".as_slice()]);
        assert_ne!(a, b);
    }

    #[test]
    fn verify_detects_tampering() {
        let id = ContentHasher::FILE.hash(b"original");
        assert!(ContentHasher::FILE.verify(b"original", &id));
        assert!(!ContentHasher::FILE.verify(b"tampered", &id));
    }

    #[test]
    fn hash_json_ignores_insertion_order() {
        let mut first = serde_json::Map::new();
        first.insert("b".into(), 2.into());
        first.insert("a".into(), 1.into());
        let mut second = serde_json::Map::new();
        second.insert("a".into(), 1.into());
        second.insert("b".into(), 2.into());

        let h1 = ContentHasher::CONFIG.hash_json(&first).unwrap();
        let h2 = ContentHasher::CONFIG.hash_json(&second).unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn domain_tag_prefixes_input() {
        let mut plain = blake3::Hasher::new();
        plain.update(b"dualgen-file-v1:data");
        let expected = ContentDigest::from_hash(*plain.finalize().as_bytes());
        assert_eq!(ContentHasher::FILE.hash(b"data"), expected);
    }
}
