use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde_json::json;
use shared::{RoleFlags, UserAccount, Veterinarian};

use super::paths;
use crate::gateway::StoreGateway;

/// Placeholder the admin list shows for accounts with no stored e-mail.
pub const MISSING_EMAIL: &str = "(sin email)";

/// Repository for account records (`users/{uid}`) and the read-only
/// veterinarian directory (`veterinarios/{uid}`).
#[derive(Clone)]
pub struct AccountRepository {
    store: Arc<dyn StoreGateway>,
}

impl AccountRepository {
    pub fn new(store: Arc<dyn StoreGateway>) -> Self {
        Self { store }
    }

    /// All accounts, tolerating partially-populated records: a missing e-mail
    /// becomes the placeholder, missing role flags become all-false.
    pub fn list(&self) -> Result<Vec<UserAccount>> {
        let Some(tree) = self
            .store
            .get(paths::USERS)
            .context("failed to read user accounts")?
        else {
            return Ok(Vec::new());
        };
        let map = tree.as_object().context("user collection is not an object")?;
        let mut accounts = Vec::with_capacity(map.len());
        for (uid, value) in map {
            let email = value
                .get("email")
                .and_then(|v| v.as_str())
                .unwrap_or(MISSING_EMAIL)
                .to_string();
            let roles = match value.get("roles") {
                Some(v) => serde_json::from_value(v.clone())
                    .with_context(|| format!("malformed role flags for account {uid}"))?,
                None => RoleFlags::default(),
            };
            accounts.push(UserAccount {
                uid: uid.clone(),
                email,
                roles,
            });
        }
        debug!("loaded {} account(s)", accounts.len());
        Ok(accounts)
    }

    /// Role flags of one account; absent node resolves to all-false.
    pub fn roles(&self, uid: &str) -> Result<RoleFlags> {
        let Some(value) = self
            .store
            .get(&paths::user_roles(uid))
            .with_context(|| format!("failed to read roles of {uid}"))?
        else {
            warn!("no role flags stored for {uid}, defaulting to client");
            return Ok(RoleFlags::default());
        };
        serde_json::from_value(value).with_context(|| format!("malformed role flags for {uid}"))
    }

    /// Overwrite the role flags of one account.
    pub fn set_roles(&self, uid: &str, flags: &RoleFlags) -> Result<()> {
        let body = serde_json::to_value(flags).context("failed to serialize role flags")?;
        self.store
            .set(&paths::user_roles(uid), body)
            .with_context(|| format!("failed to write roles of {uid}"))?;
        info!("wrote role flags of {uid}: {flags:?}");
        Ok(())
    }

    /// Initial account record written at sign-up: the e-mail plus an explicit
    /// non-admin flag, leaving the account a plain client.
    pub fn register(&self, uid: &str, email: &str) -> Result<()> {
        let body = json!({
            "email": email,
            "roles": { "admin": false },
        });
        self.store
            .set(&paths::user(uid), body)
            .with_context(|| format!("failed to register account {uid}"))?;
        info!("registered account {uid} ({email})");
        Ok(())
    }

    /// Remove an account record entirely.
    pub fn delete(&self, uid: &str) -> Result<()> {
        self.store
            .remove(&paths::user(uid))
            .with_context(|| format!("failed to delete account {uid}"))?;
        info!("deleted account {uid}");
        Ok(())
    }

    /// The veterinarian directory, for the booking form.
    pub fn list_veterinarians(&self) -> Result<Vec<Veterinarian>> {
        let Some(tree) = self
            .store
            .get(paths::VETERINARIANS)
            .context("failed to read veterinarian directory")?
        else {
            return Ok(Vec::new());
        };
        let map = tree
            .as_object()
            .context("veterinarian directory is not an object")?;
        let mut vets = Vec::with_capacity(map.len());
        for (uid, value) in map {
            let mut vet: Veterinarian = serde_json::from_value(value.clone())
                .with_context(|| format!("malformed veterinarian record '{uid}'"))?;
            vet.uid = uid.clone();
            vets.push(vet);
        }
        Ok(vets)
    }

    pub fn veterinarian(&self, uid: &str) -> Result<Option<Veterinarian>> {
        let Some(value) = self
            .store
            .get(&paths::veterinarian(uid))
            .with_context(|| format!("failed to read veterinarian '{uid}'"))?
        else {
            return Ok(None);
        };
        let mut vet: Veterinarian = serde_json::from_value(value)
            .with_context(|| format!("malformed veterinarian record '{uid}'"))?;
        vet.uid = uid.to_string();
        Ok(Some(vet))
    }
}
