use chrono::{DateTime, Utc};

use super::error::{SigResult, SignatureError};
use super::types::{ProvenanceEntry, ProvenanceInput, Signature, Source, SourceInstance};

/// Flatten any accepted provenance shape into entries.
///
/// A bare name takes its date, method, reference and analyst from the
/// submission. Structured entries keep their own values; an empty method or
/// reference is filled in from the submission. Entries without a name are
/// dropped, and an input that yields nothing is rejected.
pub fn normalize(
    input: &ProvenanceInput,
    method: &str,
    reference: &str,
    analyst: &str,
    now: DateTime<Utc>,
) -> SigResult<Vec<ProvenanceEntry>> {
    let entries: Vec<ProvenanceEntry> = match input {
        ProvenanceInput::Name(name) => vec![ProvenanceEntry {
            source_name: name.trim().to_string(),
            date: now,
            method: method.to_string(),
            reference: reference.to_string(),
            analyst: analyst.to_string(),
        }],
        ProvenanceInput::Entry(entry) => vec![fill(entry, method, reference)],
        ProvenanceInput::Entries(list) => list.iter().map(|e| fill(e, method, reference)).collect(),
    };

    let entries: Vec<_> = entries
        .into_iter()
        .filter(|e| !e.source_name.is_empty())
        .collect();
    if entries.is_empty() {
        return Err(SignatureError::InvalidInput(
            "Missing source information.".into(),
        ));
    }
    Ok(entries)
}

fn fill(entry: &ProvenanceEntry, method: &str, reference: &str) -> ProvenanceEntry {
    let mut entry = entry.clone();
    entry.source_name = entry.source_name.trim().to_string();
    if entry.method.is_empty() {
        entry.method = method.to_string();
    }
    if entry.reference.is_empty() {
        entry.reference = reference.to_string();
    }
    entry
}

impl Signature {
    /// Record a provenance entry, adding an instance to an existing source
    /// of the same name rather than a second source.
    pub fn add_source(&mut self, entry: ProvenanceEntry) {
        let instance = SourceInstance {
            date: entry.date,
            method: entry.method,
            reference: entry.reference,
            analyst: entry.analyst,
        };
        match self.sources.iter_mut().find(|s| s.name == entry.source_name) {
            Some(source) => source.instances.push(instance),
            None => self.sources.push(Source {
                name: entry.source_name,
                instances: vec![instance],
            }),
        }
    }

    pub fn merge_sources(&mut self, entries: Vec<ProvenanceEntry>) {
        for entry in entries {
            self.add_source(entry);
        }
    }
}
