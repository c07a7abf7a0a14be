use crate::commands::{actor, reply, truncate};
use crate::signatures::types::SignatureDetails;
use crate::state::Context;

/// Show a signature you have access to
#[poise::command(slash_command, guild_only)]
pub async fn show(
    ctx: Context<'_>,
    #[description = "Signature ID"] id: String,
) -> Result<(), anyhow::Error> {
    let result = ctx.data().service.get_details(&id, &actor(&ctx)).await;
    reply(&ctx, result, render_details).await
}

fn render_details(details: &SignatureDetails) -> String {
    let sig = &details.signature;
    let mut out = format!(
        "**{}** ({})\nID: `{}`\nLink: `{}` | Version {} of {}\n",
        sig.title, sig.data_type, sig.id, sig.link_id, sig.version, details.versions
    );
    if let Some(description) = &sig.description {
        out.push_str(&format!("{}\n", description));
    }

    out.push_str("\n**Sources:**\n");
    for source in &sig.sources {
        out.push_str(&format!("- {} ({} instance(s))\n", source.name, source.instances.len()));
    }
    if !sig.bucket_list.is_empty() {
        out.push_str(&format!("**Buckets:** {}\n", sig.bucket_list.join(", ")));
    }
    if !sig.tickets.is_empty() {
        let numbers: Vec<&str> = sig.tickets.iter().map(|t| t.ticket_number.as_str()).collect();
        out.push_str(&format!("**Tickets:** {}\n", numbers.join(", ")));
    }
    if !sig.relationships.is_empty() {
        out.push_str("**Relationships:**\n");
        for rel in &sig.relationships {
            out.push_str(&format!(
                "- {} {} `{}`\n",
                rel.relationship, rel.rel_type, rel.rel_object_id
            ));
        }
    }
    if !sig.highlights.is_empty() {
        out.push_str("**Highlights:**\n");
        for h in &sig.highlights {
            let comment = h.comment.as_deref().unwrap_or("");
            out.push_str(&format!("- L{} `{}` {}\n", h.line, truncate(&h.line_content, 80), comment));
        }
    }

    out.push_str(&format!("\n```\n{}\n```", truncate(&sig.data, 1500)));
    out
}

/// List every version in a signature's chain
#[poise::command(slash_command, guild_only)]
pub async fn versions(
    ctx: Context<'_>,
    #[description = "Signature ID"] id: String,
) -> Result<(), anyhow::Error> {
    let result = ctx.data().service.list_versions(&id).await;
    reply(&ctx, result, |entries| {
        let mut out = String::from("**Versions**\n\n");
        for v in entries {
            out.push_str(&format!("**v{}** {} (`{}`)\n", v.version, v.title, v.link));
            out.push_str(&format!("```\n{}\n```\n", truncate(&v.data, 300)));
        }
        out
    })
    .await
}
