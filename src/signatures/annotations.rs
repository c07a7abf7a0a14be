//! Line-anchored annotations: highlights (one per line, with optional
//! comment and date) and append-only inline comments.
//!
//! Every operation is a load-mutate-save through [`SignatureStore::update`],
//! so concurrent edits to different lines of the same record retry instead
//! of overwriting each other, and a failed edit writes nothing.
//!
//! [`SignatureStore::update`]: super::store::SignatureStore::update

use chrono::{DateTime, Utc};
use tracing::info;

use super::dates::parse_fuzzy_date;
use super::error::{OpResult, SigResult, SignatureError};
use super::types::{Actor, Highlight, InlineComment, Signature};
use super::SignatureService;

const HIGHLIGHT_NOT_FOUND: &str = "Could not find highlight.";

impl Signature {
    /// Highlight `line`. Highlighting an already highlighted line replaces
    /// its content and analyst and refreshes its date, keeping the comment.
    pub fn add_highlight(
        &mut self,
        line: u32,
        line_content: &str,
        analyst: &str,
        now: DateTime<Utc>,
    ) {
        match self.highlight_mut(line) {
            Some(existing) => {
                existing.line_content = line_content.to_string();
                existing.analyst = analyst.to_string();
                existing.date = now;
            }
            None => self.highlights.push(Highlight {
                line,
                line_content: line_content.to_string(),
                comment: None,
                date: now,
                analyst: analyst.to_string(),
            }),
        }
    }

    pub fn highlight_mut(&mut self, line: u32) -> Option<&mut Highlight> {
        self.highlights.iter_mut().find(|h| h.line == line)
    }

    /// Remove every highlight on `line`; returns how many went.
    pub fn remove_highlight(&mut self, line: u32) -> usize {
        let before = self.highlights.len();
        self.highlights.retain(|h| h.line != line);
        before - self.highlights.len()
    }

    pub fn add_inline_comment(
        &mut self,
        line: u32,
        comment: &str,
        analyst: &str,
        now: DateTime<Utc>,
    ) -> InlineComment {
        let inline = InlineComment {
            line,
            comment: comment.to_string(),
            analyst: analyst.to_string(),
            date: now,
        };
        self.inlines.push(inline.clone());
        inline
    }
}

impl SignatureService {
    pub async fn add_inline_comment(
        &self,
        id: &str,
        line: u32,
        comment: &str,
        actor: &Actor,
    ) -> OpResult<InlineComment> {
        let retries = self.annotation_retries().await;
        let result = self
            .store
            .update(id, retries, |sig| {
                Ok(sig.add_inline_comment(line, comment, &actor.name, Utc::now()))
            })
            .await
            .map(|(inline, _)| inline);
        if result.is_ok() {
            info!(sig_id = id, line, analyst = %actor, "inline comment added");
        }
        OpResult::from(result).with_message(format!("Comment for line {} added successfully!", line))
    }

    /// All inline comments on a record; empty for unknown records.
    pub async fn inline_comments(&self, id: &str) -> OpResult<Vec<InlineComment>> {
        let result: SigResult<_> = match self.store.get(id).await {
            Ok(sig) => Ok(sig.map(|s| s.inlines).unwrap_or_default()),
            Err(e) => Err(e.into()),
        };
        result.into()
    }

    /// Highlight a line; returns the record's highlights after the change.
    pub async fn add_highlight(
        &self,
        id: &str,
        line: u32,
        line_content: &str,
        actor: &Actor,
    ) -> OpResult<Vec<Highlight>> {
        let retries = self.annotation_retries().await;
        let result = self
            .store
            .update(id, retries, |sig| {
                sig.add_highlight(line, line_content, &actor.name, Utc::now());
                Ok(())
            })
            .await
            .map(|(_, sig)| sig.highlights);
        if result.is_ok() {
            info!(sig_id = id, line, analyst = %actor, "highlight added");
        }
        result.into()
    }

    pub async fn update_highlight_comment(
        &self,
        id: &str,
        line: u32,
        comment: &str,
        actor: &Actor,
    ) -> OpResult<Highlight> {
        let comment = comment.trim();
        let comment = (!comment.is_empty()).then(|| comment.to_string());
        let result = self
            .edit_highlight(id, line, |h| h.comment = comment.clone())
            .await;
        if result.is_ok() {
            info!(sig_id = id, line, analyst = %actor, "highlight comment updated");
        }
        result.into()
    }

    pub async fn update_highlight_date(
        &self,
        id: &str,
        line: u32,
        date: &str,
        actor: &Actor,
    ) -> OpResult<Highlight> {
        let date = match parse_fuzzy_date(date) {
            Ok(d) => d,
            Err(e) => return OpResult::fail(e.kind(), e.to_string()),
        };
        let result = self.edit_highlight(id, line, |h| h.date = date).await;
        if result.is_ok() {
            info!(sig_id = id, line, analyst = %actor, %date, "highlight date updated");
        }
        result.into()
    }

    /// Remove the highlight on `line`. Fails unless the highlight count
    /// actually went down.
    pub async fn remove_highlight(
        &self,
        id: &str,
        line: u32,
        actor: &Actor,
    ) -> OpResult<Vec<Highlight>> {
        let retries = self.annotation_retries().await;
        let result = self
            .store
            .update(id, retries, |sig| {
                if sig.remove_highlight(line) == 0 {
                    return Err(SignatureError::SoftFailure(HIGHLIGHT_NOT_FOUND.into()));
                }
                Ok(())
            })
            .await
            .map(|(_, sig)| sig.highlights);
        if result.is_ok() {
            info!(sig_id = id, line, analyst = %actor, "highlight removed");
        }
        result.into()
    }

    async fn edit_highlight<F>(&self, id: &str, line: u32, mut edit: F) -> SigResult<Highlight>
    where
        F: FnMut(&mut Highlight),
    {
        let retries = self.annotation_retries().await;
        let (highlight, _) = self
            .store
            .update(id, retries, |sig| {
                let highlight = sig
                    .highlight_mut(line)
                    .ok_or_else(|| SignatureError::SoftFailure(HIGHLIGHT_NOT_FOUND.into()))?;
                edit(highlight);
                Ok(highlight.clone())
            })
            .await?;
        Ok(highlight)
    }
}
