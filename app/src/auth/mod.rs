//! Session and role resolution on top of the identity gateway.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use shared::{AuthUser, Role};

use crate::config::AppConfig;
use crate::domain::account_service::AccountService;
use crate::gateway::IdentityGateway;

/// Wraps the identity gateway with role resolution: the configured admin
/// allow-list is consulted first, then the per-account role flags in the
/// store.
#[derive(Clone)]
pub struct AuthService {
    identity: Arc<dyn IdentityGateway>,
    accounts: AccountService,
    config: AppConfig,
}

impl AuthService {
    pub fn new(
        config: AppConfig,
        identity: Arc<dyn IdentityGateway>,
        accounts: AccountService,
    ) -> Self {
        Self {
            identity,
            accounts,
            config,
        }
    }

    pub fn sign_in(&self, email: &str, password: &str) -> Result<(AuthUser, Vec<Role>)> {
        info!("sign-in attempt for {email}");
        let user = self
            .identity
            .sign_in(email, password)
            .context("sign-in failed")?;
        let roles = self.roles_for(&user)?;
        info!("sign-in succeeded for {email} with roles {roles:?}");
        Ok((user, roles))
    }

    /// Create the account, write its initial store record (e-mail plus
    /// explicit non-admin flags), and resolve roles.
    pub fn sign_up(&self, email: &str, password: &str) -> Result<(AuthUser, Vec<Role>)> {
        info!("sign-up attempt for {email}");
        let user = self
            .identity
            .sign_up(email, password)
            .context("sign-up failed")?;
        self.accounts
            .register_account(&user.uid, &user.email)
            .context("failed to write the initial account record")?;
        let roles = self.roles_for(&user)?;
        info!("sign-up succeeded for {email}");
        Ok((user, roles))
    }

    pub fn sign_out(&self) -> Result<()> {
        info!("signing out");
        self.identity.sign_out().context("sign-out failed")?;
        Ok(())
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.identity.current_user()
    }

    /// Effective roles of a session.
    ///
    /// The allow-list override short-circuits the store lookup entirely:
    /// listed e-mails are admins no matter what flags are stored. Otherwise
    /// every elevated stored flag contributes a role, and an account with none
    /// is a plain client.
    pub fn roles_for(&self, user: &AuthUser) -> Result<Vec<Role>> {
        if self.config.is_admin_email(&user.email) {
            warn!("{} resolved to ADMIN via the configured allow-list", user.email);
            return Ok(vec![Role::Admin]);
        }
        let flags = self.accounts.roles(&user.uid)?;
        let mut roles = Vec::new();
        if flags.admin {
            roles.push(Role::Admin);
        }
        if flags.vet {
            roles.push(Role::Veterinario);
        }
        if roles.is_empty() {
            roles.push(Role::Cliente);
        }
        Ok(roles)
    }
}
