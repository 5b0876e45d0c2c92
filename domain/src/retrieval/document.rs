//! Document entity and its content-derived identity key.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Content-derived identity of a [`Document`].
///
/// SHA-256 over the normalized body followed by every metadata entry in key
/// order. Each field is length-prefixed so that `("ab", "c")` and `("a", "bc")`
/// never collide. Two documents with the same body and metadata share a key
/// even when they come back as distinct objects from different queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentKey(String);

impl DocumentKey {
    /// Compute the key for a body and its metadata.
    pub fn compute(body: &str, metadata: &BTreeMap<String, String>) -> Self {
        let mut hasher = Sha256::new();
        let body = normalize_body(body);
        write_field(&mut hasher, body.as_bytes());
        for (key, value) in metadata {
            write_field(&mut hasher, key.as_bytes());
            write_field(&mut hasher, value.as_bytes());
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// Hex-encoded digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex characters, for logs and console output.
    pub fn short(&self) -> &str {
        &self.0[..12.min(self.0.len())]
    }
}

impl std::fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn write_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

/// Line endings are the only normalization; snippet whitespace is significant
/// for code.
fn normalize_body(body: &str) -> std::borrow::Cow<'_, str> {
    if body.contains('\r') {
        std::borrow::Cow::Owned(body.replace("\r\n", "\n"))
    } else {
        std::borrow::Cow::Borrowed(body)
    }
}

/// A retrieved content unit (Entity, immutable)
///
/// Holds the snippet body plus structural metadata such as the source file.
/// The identity key is computed once at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "DocumentParts", into = "DocumentParts")]
pub struct Document {
    body: String,
    metadata: BTreeMap<String, String>,
    key: DocumentKey,
}

impl Document {
    /// Create a document without metadata.
    pub fn new(body: impl Into<String>) -> Self {
        Self::with_metadata(body, BTreeMap::new())
    }

    /// Create a document with metadata.
    pub fn with_metadata(body: impl Into<String>, metadata: BTreeMap<String, String>) -> Self {
        let body = body.into();
        let key = DocumentKey::compute(&body, &metadata);
        Self {
            body,
            metadata,
            key,
        }
    }

    /// Builder-style helper adding one metadata entry.
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut metadata = self.metadata;
        metadata.insert(key.into(), value.into());
        Self::with_metadata(self.body, metadata)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn key(&self) -> &DocumentKey {
        &self.key
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Document {}

impl std::hash::Hash for Document {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Serialized shape of a [`Document`]; the key is always recomputed.
#[derive(Serialize, Deserialize)]
struct DocumentParts {
    body: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, String>,
}

impl From<DocumentParts> for Document {
    fn from(parts: DocumentParts) -> Self {
        Document::with_metadata(parts.body, parts.metadata)
    }
}

impl From<Document> for DocumentParts {
    fn from(doc: Document) -> Self {
        Self {
            body: doc.body,
            metadata: doc.metadata,
        }
    }
}
