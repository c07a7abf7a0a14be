use super::error::{SigResult, SignatureError};
use super::store::SignatureStore;
use super::types::{ContentHash, Signature};

/// Content-addressed identity of raw signature bytes (blake3 hex).
pub fn content_hash(raw: &[u8]) -> ContentHash {
    blake3::hash(raw).to_hex().to_string()
}

impl SignatureStore {
    /// Decide whether `raw` is already stored.
    ///
    /// Identity is the content hash alone: title, filename and every other
    /// piece of metadata are ignored.
    pub async fn resolve(&self, raw: &[u8]) -> SigResult<(Option<Signature>, ContentHash)> {
        if raw.is_empty() {
            return Err(SignatureError::InvalidInput("Data length <= 0".into()));
        }
        let hash = content_hash(raw);
        let existing = self.find_by_hash(&hash).await?;
        Ok((existing, hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signatures::testing::temp_store;
    use chrono::Utc;

    #[test]
    fn test_hash_is_stable_and_byte_sensitive() {
        assert_eq!(content_hash(b"rule a {}"), content_hash(b"rule a {}"));
        assert_ne!(content_hash(b"rule a {}"), content_hash(b"rule a {} "));
        assert_eq!(content_hash(b"x").len(), 64);
    }

    #[tokio::test]
    async fn test_resolve_rejects_empty() {
        let (_dir, store) = temp_store().await;
        let err = store.resolve(b"").await.unwrap_err();
        assert!(matches!(err, SignatureError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_resolve_ignores_title() {
        let (_dir, store) = temp_store().await;
        let data = "alert tcp any any -> any 80";
        let mut sig = Signature::new(content_hash(data.as_bytes()), data, "first", None, "Snort", Utc::now());
        store.save(&mut sig).await.unwrap();

        let (existing, hash) = store.resolve(data.as_bytes()).await.unwrap();
        assert_eq!(hash, sig.content_hash);
        assert_eq!(existing.unwrap().id, sig.id);

        let (missing, _) = store.resolve(b"something else").await.unwrap();
        assert!(missing.is_none());
    }
}
