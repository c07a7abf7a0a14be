use crate::commands::{actor, reply};
use crate::state::Context;

/// Register a new signature data type
#[poise::command(slash_command, guild_only)]
pub async fn addtype(
    ctx: Context<'_>,
    #[description = "Type name"] name: String,
) -> Result<(), anyhow::Error> {
    let result = ctx
        .data()
        .service
        .add_signature_type(&name, &actor(&ctx))
        .await;
    reply(&ctx, result, |t| format!("Registered type **{}**.", t.name)).await
}

/// List registered signature data types
#[poise::command(slash_command, guild_only)]
pub async fn types(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let result = ctx.data().service.list_signature_types().await;
    reply(&ctx, result, |types| {
        if types.is_empty() {
            return "No signature types registered. Use `/sig addtype` to add one.".to_string();
        }
        let mut out = String::from("**Signature Types**\n\n");
        for t in types {
            out.push_str(&format!(
                "- **{}** (added by {} on {})\n",
                t.name,
                t.analyst,
                t.created.format("%Y-%m-%d")
            ));
        }
        out
    })
    .await
}
