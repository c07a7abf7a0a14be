use tracing::info;

use crate::commands::submit::autocomplete_type;
use crate::commands::{actor, reply};
use crate::signatures::relationships::SIGNATURE_TYPE;
use crate::state::Context;

/// Relate a signature to another object
#[poise::command(slash_command, guild_only)]
pub async fn relate(
    ctx: Context<'_>,
    #[description = "Signature ID"] id: String,
    #[description = "Related object ID"] object_id: String,
    #[description = "Relationship, e.g. Related To"] kind: String,
    #[description = "Related object type (default Signature)"] object_type: Option<String>,
    #[description = "Relationship date"] date: Option<String>,
) -> Result<(), anyhow::Error> {
    let object_type = object_type.unwrap_or_else(|| SIGNATURE_TYPE.to_string());
    let result = ctx
        .data()
        .service
        .relate(&id, &object_type, &object_id, &kind, date.as_deref(), &actor(&ctx))
        .await;
    reply(&ctx, result, |rels| {
        format!(
            "Related `{}` to {} `{}` ({} relationship(s) total).",
            id,
            object_type,
            object_id,
            rels.len()
        )
    })
    .await
}

/// Change a signature's data type
#[poise::command(slash_command, guild_only)]
pub async fn settype(
    ctx: Context<'_>,
    #[description = "Signature ID"] id: String,
    #[description = "New data type"]
    #[autocomplete = "autocomplete_type"]
    data_type: String,
) -> Result<(), anyhow::Error> {
    let result = ctx
        .data()
        .service
        .update_data_type(&id, &data_type, &actor(&ctx))
        .await;
    reply(&ctx, result, |_| format!("Data type of `{}` set to **{}**.", id, data_type)).await
}

/// Delete a signature (admin only)
#[poise::command(slash_command, guild_only)]
pub async fn delete(
    ctx: Context<'_>,
    #[description = "Signature ID"] id: String,
) -> Result<(), anyhow::Error> {
    let actor = actor(&ctx);
    if !ctx.data().is_admin(&actor) {
        ctx.say("This command is admin-only.").await?;
        return Ok(());
    }

    info!(user = ctx.author().name, id, "Delete requested");
    let result = ctx.data().service.delete_record(&id, &actor).await;
    reply(&ctx, result, |existed| {
        if *existed {
            format!("Deleted `{}`.", id)
        } else {
            format!("No signature `{}`; nothing deleted.", id)
        }
    })
    .await
}
