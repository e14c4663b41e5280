use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;
use serde_json::{Map, Value};
use shared::ClientProfile;

use super::paths;
use crate::gateway::StoreGateway;

/// Repository for the singleton client profile at `users/{uid}/perfil`.
#[derive(Clone)]
pub struct ProfileRepository {
    store: Arc<dyn StoreGateway>,
}

impl ProfileRepository {
    pub fn new(store: Arc<dyn StoreGateway>) -> Self {
        Self { store }
    }

    /// `Ok(None)` when the client never saved a profile.
    pub fn fetch(&self, uid: &str) -> Result<Option<ClientProfile>> {
        let Some(value) = self
            .store
            .get(&paths::profile(uid))
            .with_context(|| format!("failed to read profile of {uid}"))?
        else {
            return Ok(None);
        };
        let profile: ClientProfile = serde_json::from_value(value)
            .with_context(|| format!("malformed profile record for {uid}"))?;
        Ok(Some(profile))
    }

    /// Full overwrite from the personal-data form.
    pub fn save(&self, uid: &str, profile: &ClientProfile) -> Result<()> {
        let body = serde_json::to_value(profile).context("failed to serialize profile")?;
        self.store
            .set(&paths::profile(uid), body)
            .with_context(|| format!("failed to save profile of {uid}"))?;
        info!("saved profile of {uid}");
        Ok(())
    }

    /// Shallow merge of a subset of fields.
    pub fn merge(&self, uid: &str, partial: Map<String, Value>) -> Result<()> {
        self.store
            .update(&paths::profile(uid), partial)
            .with_context(|| format!("failed to merge profile fields of {uid}"))?;
        info!("merged profile fields of {uid}");
        Ok(())
    }
}
