use crate::commands::{actor, reply, truncate};
use crate::signatures::types::Highlight;
use crate::state::Context;

fn render_highlights(highlights: &[Highlight]) -> String {
    if highlights.is_empty() {
        return "No highlights.".to_string();
    }
    let mut out = String::from("**Highlights:**\n");
    for h in highlights {
        out.push_str(&format!(
            "- L{} `{}` ({}, {})",
            h.line,
            truncate(&h.line_content, 80),
            h.analyst,
            h.date.format("%Y-%m-%d")
        ));
        if let Some(comment) = &h.comment {
            out.push_str(&format!(": {}", comment));
        }
        out.push('\n');
    }
    out
}

/// Comment on a line of a signature
#[poise::command(slash_command, guild_only)]
pub async fn comment(
    ctx: Context<'_>,
    #[description = "Signature ID"] id: String,
    #[description = "Line number"] line: u32,
    #[description = "Comment"] text: String,
) -> Result<(), anyhow::Error> {
    let result = ctx
        .data()
        .service
        .add_inline_comment(&id, line, &text, &actor(&ctx))
        .await;
    let message = result.message_or_default().to_string();
    reply(&ctx, result, |_| message).await
}

/// List inline comments on a signature
#[poise::command(slash_command, guild_only)]
pub async fn comments(
    ctx: Context<'_>,
    #[description = "Signature ID"] id: String,
) -> Result<(), anyhow::Error> {
    let result = ctx.data().service.inline_comments(&id).await;
    reply(&ctx, result, |inlines| {
        if inlines.is_empty() {
            return "No comments.".to_string();
        }
        let mut out = String::from("**Comments:**\n");
        for c in inlines {
            out.push_str(&format!(
                "- L{} **{}** ({}): {}\n",
                c.line,
                c.analyst,
                c.date.format("%Y-%m-%d %H:%M"),
                c.comment
            ));
        }
        out
    })
    .await
}

/// Highlight a line of a signature
#[poise::command(slash_command, guild_only)]
pub async fn highlight(
    ctx: Context<'_>,
    #[description = "Signature ID"] id: String,
    #[description = "Line number"] line: u32,
    #[description = "Content of the line"] content: String,
) -> Result<(), anyhow::Error> {
    let result = ctx
        .data()
        .service
        .add_highlight(&id, line, &content, &actor(&ctx))
        .await;
    reply(&ctx, result, |h| render_highlights(h)).await
}

/// Set or clear the comment on a highlight
#[poise::command(slash_command, guild_only)]
pub async fn hlcomment(
    ctx: Context<'_>,
    #[description = "Signature ID"] id: String,
    #[description = "Line number"] line: u32,
    #[description = "Comment (empty clears it)"] text: Option<String>,
) -> Result<(), anyhow::Error> {
    let result = ctx
        .data()
        .service
        .update_highlight_comment(&id, line, text.as_deref().unwrap_or(""), &actor(&ctx))
        .await;
    reply(&ctx, result, |h| format!("Highlight on line {} updated.", h.line)).await
}

/// Set the date on a highlight (free-form date text)
#[poise::command(slash_command, guild_only)]
pub async fn hldate(
    ctx: Context<'_>,
    #[description = "Signature ID"] id: String,
    #[description = "Line number"] line: u32,
    #[description = "Date, e.g. 2024-03-05 or March 5th 2024"] date: String,
) -> Result<(), anyhow::Error> {
    let result = ctx
        .data()
        .service
        .update_highlight_date(&id, line, &date, &actor(&ctx))
        .await;
    reply(&ctx, result, |h| {
        format!("Highlight on line {} dated {}.", h.line, h.date.format("%Y-%m-%d %H:%M:%S"))
    })
    .await
}

/// Remove the highlight on a line
#[poise::command(slash_command, guild_only)]
pub async fn unhighlight(
    ctx: Context<'_>,
    #[description = "Signature ID"] id: String,
    #[description = "Line number"] line: u32,
) -> Result<(), anyhow::Error> {
    let result = ctx
        .data()
        .service
        .remove_highlight(&id, line, &actor(&ctx))
        .await;
    reply(&ctx, result, |h| render_highlights(h)).await
}
