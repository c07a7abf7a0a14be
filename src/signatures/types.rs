use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Signature record ID (uuid v4, assigned at creation).
pub type SigId = String;

/// Content hash (blake3 hex) used as the dedup key.
pub type ContentHash = String;

/// The user performing an operation. Passed explicitly to every call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub id: u64,
    pub name: String,
}

impl Actor {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One acquisition of a record from a named source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInstance {
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub reference: String,
    pub analyst: String,
}

/// A named source and every instance in which it supplied the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub instances: Vec<SourceInstance>,
}

/// Flat provenance entry as it arrives with a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceEntry {
    pub source_name: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub reference: String,
    pub analyst: String,
}

/// The shapes in which source information can be supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum ProvenanceInput {
    /// Just a source name; date/method/reference/analyst come from the submission.
    Name(String),
    Entry(ProvenanceEntry),
    Entries(Vec<ProvenanceEntry>),
}

impl From<&str> for ProvenanceInput {
    fn from(name: &str) -> Self {
        ProvenanceInput::Name(name.to_string())
    }
}

/// Typed link from a record to another object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Type of the related object, e.g. "Signature" or "Sample".
    pub rel_type: String,
    pub rel_object_id: String,
    /// Relationship kind, e.g. "Related To".
    pub relationship: String,
    #[serde(default)]
    pub relationship_date: Option<DateTime<Utc>>,
    pub analyst: String,
    pub date: DateTime<Utc>,
}

/// A highlighted source line. At most one per line per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub line: u32,
    pub line_content: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub date: DateTime<Utc>,
    pub analyst: String,
}

/// Append-only comment anchored to a line; many per line are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineComment {
    pub line: u32,
    pub comment: String,
    pub analyst: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_number: String,
    pub analyst: String,
    pub date: DateTime<Utc>,
}

/// A versioned signature document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub id: SigId,
    pub content_hash: ContentHash,
    /// Shared by every version of the same logical document.
    pub link_id: String,
    /// Position in the link chain, starting at 1. Zero until first persisted.
    pub version: u32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub data_type: String,
    pub data: String,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
    #[serde(default)]
    pub inlines: Vec<InlineComment>,
    #[serde(default)]
    pub bucket_list: Vec<String>,
    #[serde(default)]
    pub tickets: Vec<Ticket>,
    /// Bumped on every successful save; used for optimistic concurrency.
    #[serde(default)]
    pub revision: u64,
}

impl Signature {
    /// A fresh, unsaved record that is the root of its own link chain.
    pub fn new(
        content_hash: ContentHash,
        data: impl Into<String>,
        title: impl Into<String>,
        description: Option<String>,
        data_type: impl Into<String>,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content_hash,
            link_id: uuid::Uuid::new_v4().to_string(),
            version: 0,
            title: title.into(),
            description,
            data_type: data_type.into(),
            data: data.into(),
            created,
            sources: Vec::new(),
            relationships: Vec::new(),
            highlights: Vec::new(),
            inlines: Vec::new(),
            bucket_list: Vec::new(),
            tickets: Vec::new(),
            revision: 0,
        }
    }

    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.name.as_str())
    }
}

/// A registered signature data type (e.g. "YARA").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureType {
    pub name: String,
    pub analyst: String,
    pub created: DateTime<Utc>,
}

/// One row of a record's version listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub title: String,
    pub version: u32,
    pub data: String,
    /// ID of the record holding this version.
    pub link: SigId,
}

/// A record as presented to a particular actor, with its chain size.
#[derive(Debug, Clone, Serialize)]
pub struct SignatureDetails {
    pub signature: Signature,
    pub versions: usize,
}
