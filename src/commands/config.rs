use crate::commands::actor;
use crate::state::Context;

/// Configure engine retry limits (admin only)
#[poise::command(slash_command, guild_only)]
pub async fn config(
    ctx: Context<'_>,
    #[description = "annotation_retries | submit_retries"] param: Option<String>,
    #[description = "New value"] value: Option<u32>,
) -> Result<(), anyhow::Error> {
    if !ctx.data().is_admin(&actor(&ctx)) {
        ctx.say("This command is admin-only.").await?;
        return Ok(());
    }

    match (param.as_deref(), value) {
        // Show current config
        (None, _) => {
            let config = ctx.data().config.read().await;
            ctx.say(format!(
                "**Engine Configuration:**\n\
                 `annotation_retries`: {}\n\
                 `submit_retries`: {}",
                config.annotation_retries, config.submit_retries
            ))
            .await?;
        }
        (Some(key), Some(val)) => {
            let mut config = ctx.data().config.write().await;
            match key {
                "annotation_retries" => {
                    config.annotation_retries = val;
                    ctx.say(format!("`annotation_retries` set to {}", val)).await?;
                }
                "submit_retries" => {
                    config.submit_retries = val;
                    ctx.say(format!("`submit_retries` set to {}", val)).await?;
                }
                _ => {
                    ctx.say(format!(
                        "Unknown param `{}`. Valid: `annotation_retries`, `submit_retries`",
                        key
                    ))
                    .await?;
                }
            }
        }
        (Some(_), None) => {
            ctx.say("Provide both `param` and `value`. Example: `/sig config submit_retries 5`")
                .await?;
        }
    }

    Ok(())
}
