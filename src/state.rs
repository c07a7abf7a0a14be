use std::sync::Arc;
use tokio::sync::RwLock;

use crate::signatures::access::AccessControl;
use crate::signatures::types::Actor;
use crate::signatures::{EngineConfig, SignatureService};

pub struct AppState {
    pub service: Arc<SignatureService>,
    pub access: Arc<dyn AccessControl>,
    pub config: Arc<RwLock<EngineConfig>>,
}

impl AppState {
    pub fn is_admin(&self, actor: &Actor) -> bool {
        self.access.is_admin(actor)
    }
}

pub type Context<'a> = poise::Context<'a, AppState, anyhow::Error>;
