mod commands;
mod signatures;
mod state;
mod triage;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use poise::{Framework, FrameworkOptions};
use tokio::sync::RwLock;
use tracing::{error, info, Level};

use signatures::access::{parse_source_acl, AccessControl, StaticAccess};
use signatures::relationships::StoreResolver;
use signatures::store::SignatureStore;
use signatures::{EngineConfig, SignatureService};
use state::AppState;
use triage::{AnalysisPipeline, LogOnlyTriage, TriageClient};

const DEFAULT_TYPES: &str = "YARA,Snort,Bro";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    // Load env
    let _ = dotenv::dotenv();
    let token = dotenv::var("DISCORD_TOKEN").context("DISCORD_TOKEN required")?;
    let guild_id: Option<serenity::GuildId> = dotenv::var("DISCORD_GUILD_ID")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(serenity::GuildId::new);

    // Init storage
    let data_dir = PathBuf::from(
        dotenv::var("SIG_DATA_DIR").unwrap_or_else(|_| "./data/signatures".to_string()),
    );
    let store = Arc::new(SignatureStore::new(&data_dir).await?);
    info!("Signature store initialized at {:?}", data_dir);

    // Parse admin user IDs and source ACL from env
    let admin_ids: HashSet<u64> = dotenv::var("ADMIN_USER_IDS")
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse::<u64>().ok())
        .collect();
    let source_acl = parse_source_acl(&dotenv::var("SIG_SOURCE_ACL").unwrap_or_default());
    if !source_acl.is_empty() {
        info!(users = source_acl.len(), "Source ACL configured");
    }
    let access = StaticAccess::new(admin_ids).with_source_acl(source_acl);
    if access.admin_count() > 0 {
        info!(count = access.admin_count(), "Admin users configured");
    }
    let access: Arc<dyn AccessControl> = Arc::new(access);

    let pipeline: Arc<dyn AnalysisPipeline> = match TriageClient::from_env()? {
        Some(client) => {
            info!("Analysis service configured");
            Arc::new(client)
        }
        None => Arc::new(LogOnlyTriage),
    };

    let config = Arc::new(RwLock::new(EngineConfig::default()));
    let service = Arc::new(SignatureService::new(
        store.clone(),
        access.clone(),
        Arc::new(StoreResolver::new(store)),
        pipeline,
        config.clone(),
    ));

    let default_types: Vec<String> = dotenv::var("SIG_DEFAULT_TYPES")
        .unwrap_or_else(|_| DEFAULT_TYPES.to_string())
        .split(',')
        .map(str::to_string)
        .collect();
    service.seed_types(&default_types).await?;

    let app_state = AppState {
        service,
        access,
        config,
    };

    let intents =
        serenity::GatewayIntents::GUILDS | serenity::GatewayIntents::GUILD_MESSAGES;

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: vec![commands::sig()],
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as: {} ({})", ready.user.name, ready.user.id);

                let commands = &framework.options().commands;
                info!("Registering {} top-level command(s):", commands.len());
                for cmd in commands {
                    info!("  /{} ({} subcommands)", cmd.name, cmd.subcommands.len());
                }

                if let Some(gid) = guild_id {
                    info!("Registering to guild {} (instant)", gid);
                    poise::builtins::register_in_guild(
                        ctx,
                        &framework.options().commands,
                        gid,
                    )
                    .await?;
                } else {
                    info!("Registering globally (up to 1 hour delay)");
                    poise::builtins::register_globally(
                        ctx,
                        &framework.options().commands,
                    )
                    .await?;
                }

                Ok(app_state)
            })
        })
        .build();

    info!("Starting signature desk bot...");

    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }

    Ok(())
}
