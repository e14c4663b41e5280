use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::info;
use shared::{RoleFlags, Veterinarian};

use crate::domain::commands::account::{
    DeleteUserCommand, DeleteUserResult, ListUsersResult, ListVeterinariansResult, SetRolesCommand,
};
use crate::gateway::StoreGateway;
use crate::storage::AccountRepository;

/// Service over account records and the veterinarian directory.
#[derive(Clone)]
pub struct AccountService {
    accounts: AccountRepository,
}

impl AccountService {
    pub fn new(store: Arc<dyn StoreGateway>) -> Self {
        Self {
            accounts: AccountRepository::new(store),
        }
    }

    pub fn list_users(&self) -> Result<ListUsersResult> {
        info!("listing user accounts");
        let users = self.accounts.list()?;
        Ok(ListUsersResult { users })
    }

    /// Stored role flags of one account (all-false when nothing is stored).
    pub fn roles(&self, uid: &str) -> Result<RoleFlags> {
        self.accounts.roles(uid)
    }

    pub fn set_roles(&self, command: SetRolesCommand) -> Result<()> {
        if command.uid.trim().is_empty() {
            return Err(anyhow!("Falta el identificador del usuario"));
        }
        self.accounts.set_roles(&command.uid, &command.flags)
    }

    /// Initial account record written at sign-up.
    pub fn register_account(&self, uid: &str, email: &str) -> Result<()> {
        self.accounts.register(uid, email)
    }

    pub fn delete_user(&self, command: DeleteUserCommand) -> Result<DeleteUserResult> {
        if command.uid.trim().is_empty() {
            return Err(anyhow!("Falta el identificador del usuario"));
        }
        self.accounts.delete(&command.uid)?;
        Ok(DeleteUserResult {
            deleted_uid: command.uid,
        })
    }

    pub fn list_veterinarians(&self) -> Result<ListVeterinariansResult> {
        info!("listing veterinarian directory");
        let veterinarians = self.accounts.list_veterinarians()?;
        Ok(ListVeterinariansResult { veterinarians })
    }

    pub fn veterinarian(&self, uid: &str) -> Result<Option<Veterinarian>> {
        self.accounts.veterinarian(uid)
    }
}
