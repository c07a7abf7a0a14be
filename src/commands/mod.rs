mod annotate;
mod config;
mod manage;
mod show;
mod submit;
mod types;

use crate::signatures::error::OpResult;
use crate::signatures::types::Actor;
use crate::state::Context;

/// Signature desk: submit, version and annotate detection signatures
#[poise::command(
    slash_command,
    subcommands(
        "submit::submit",
        "show::show",
        "show::versions",
        "annotate::comment",
        "annotate::comments",
        "annotate::highlight",
        "annotate::hlcomment",
        "annotate::hldate",
        "annotate::unhighlight",
        "manage::relate",
        "manage::settype",
        "manage::delete",
        "types::addtype",
        "types::types",
        "config::config"
    )
)]
pub async fn sig(_ctx: Context<'_>) -> Result<(), anyhow::Error> {
    Ok(())
}

/// The invoking Discord user as an engine actor.
pub(crate) fn actor(ctx: &Context<'_>) -> Actor {
    Actor::new(ctx.author().id.get(), ctx.author().name.clone())
}

/// Reply with `render(data)` on success, or the failure message.
pub(crate) async fn reply<T>(
    ctx: &Context<'_>,
    result: OpResult<T>,
    render: impl FnOnce(&T) -> String,
) -> Result<(), anyhow::Error> {
    let text = match &result.data {
        Some(data) if result.success => render(data),
        _ => format!("**Failed:** {}", result.message_or_default()),
    };
    send_chunked(ctx, &text).await
}

/// Send a message in Discord-safe chunks (max 1990 chars).
/// Follow-up chunks go through ctx.say() so they ride the interaction webhook.
pub(crate) async fn send_chunked(ctx: &Context<'_>, text: &str) -> Result<(), anyhow::Error> {
    let mut remaining = text;
    while !remaining.is_empty() {
        let chunk_len = floor_char_boundary(remaining, remaining.len().min(1990));
        let split_at = if chunk_len < remaining.len() {
            remaining[..chunk_len]
                .rfind('\n')
                .or_else(|| remaining[..chunk_len].rfind(' '))
                .map(|i| i + 1)
                .unwrap_or(chunk_len)
        } else {
            chunk_len
        };
        let chunk = &remaining[..split_at];
        remaining = &remaining[split_at..];

        ctx.say(chunk).await?;
    }
    Ok(())
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Shorten `text` to at most `max` bytes on a char boundary.
pub(crate) fn truncate(text: &str, max: usize) -> &str {
    &text[..floor_char_boundary(text, text.len().min(max))]
}
