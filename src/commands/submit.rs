use poise::serenity_prelude as serenity;
use tracing::info;

use crate::commands::{actor, reply};
use crate::signatures::lifecycle::Submission;
use crate::signatures::tags::TagInput;
use crate::state::Context;

/// Submit a signature (inline text or an attached file)
#[poise::command(slash_command, guild_only)]
#[allow(clippy::too_many_arguments)]
pub async fn submit(
    ctx: Context<'_>,
    #[description = "Title"] title: String,
    #[description = "Data type (YARA, Snort, ...)"]
    #[autocomplete = "autocomplete_type"]
    data_type: String,
    #[description = "Source name"] source: String,
    #[description = "Signature text"] content: Option<String>,
    #[description = "Signature file (used instead of text)"] file: Option<serenity::Attachment>,
    #[description = "Description"] description: Option<String>,
    #[description = "Link ID of an existing chain (makes this a new version)"] link_id: Option<String>,
    #[description = "Copy relationships from the chain's first version"] copy_rels: Option<bool>,
    #[description = "How it was acquired"] method: Option<String>,
    #[description = "Source reference"] reference: Option<String>,
    #[description = "Buckets, comma separated"] buckets: Option<String>,
    #[description = "Tickets, comma separated"] tickets: Option<String>,
) -> Result<(), anyhow::Error> {
    ctx.defer().await?;

    let content = match (file, content) {
        (Some(file), _) => {
            let bytes = file.download().await?;
            match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => {
                    ctx.say("Attachment is not valid UTF-8 text.").await?;
                    return Ok(());
                }
            }
        }
        (None, Some(text)) => text,
        (None, None) => String::new(),
    };

    info!(user = ctx.author().name, title, data_type, source, "Submission started");

    let mut submission = Submission::new(content, source.as_str(), title, data_type);
    submission.description = description.filter(|d| !d.trim().is_empty());
    submission.link_id = link_id;
    submission.copy_relationships = copy_rels.unwrap_or(false);
    submission.method = method.unwrap_or_default();
    submission.reference = reference.unwrap_or_default();
    submission.buckets = buckets.map(TagInput::Csv);
    submission.tickets = tickets.map(TagInput::Csv);

    let result = ctx
        .data()
        .service
        .submit_record(&submission, &actor(&ctx))
        .await;
    let message = result.message_or_default().to_string();
    reply(&ctx, result, |s| {
        let status = if s.created { "new record" } else { "existing record, provenance added" };
        format!(
            "{} ({})\nID: `{}`\nLink: `{}` | Version: {}",
            message, status, s.id, s.link_id, s.version
        )
    })
    .await
}

/// Autocomplete for registered signature types.
pub(crate) async fn autocomplete_type(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let types = ctx
        .data()
        .service
        .list_signature_types()
        .await
        .data
        .unwrap_or_default();

    types
        .into_iter()
        .map(|t| t.name)
        .filter(|n| n.to_lowercase().contains(&partial.to_lowercase()))
        .take(25)
        .collect()
}
