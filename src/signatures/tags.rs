use chrono::{DateTime, Utc};

use super::types::{Signature, Ticket};

/// Bucket or ticket values, as a comma-separated string or a list.
#[derive(Debug, Clone, PartialEq)]
pub enum TagInput {
    Csv(String),
    List(Vec<String>),
}

impl TagInput {
    /// Trimmed, non-empty values in input order.
    pub fn values(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            TagInput::Csv(s) => s.split(',').collect(),
            TagInput::List(list) => list.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Signature {
    pub fn add_bucket_list(&mut self, tags: &TagInput) {
        for bucket in tags.values() {
            if !self.bucket_list.contains(&bucket) {
                self.bucket_list.push(bucket);
            }
        }
    }

    pub fn add_tickets(&mut self, tags: &TagInput, analyst: &str, now: DateTime<Utc>) {
        for number in tags.values() {
            if self.tickets.iter().any(|t| t.ticket_number == number) {
                continue;
            }
            self.tickets.push(Ticket {
                ticket_number: number,
                analyst: analyst.to_string(),
                date: now,
            });
        }
    }
}
