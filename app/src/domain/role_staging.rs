use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::{info, warn};
use shared::{Role, RoleFlags, StagedRoleChange, UserAccount};

use crate::domain::account_service::AccountService;
use crate::domain::commands::account::{DeleteUserCommand, SetRolesCommand};
use crate::gateway::StoreGateway;

/// In-memory diff list of proposed role reassignments, decoupled from the
/// committed user list until an explicit batch save.
///
/// At most one entry per user; staging a role equal to the committed one
/// removes the entry (a no-op diff). Entries keep insertion order, and a
/// re-staged user keeps their original position.
#[derive(Debug, Default, Clone)]
pub struct RoleStagingBuffer {
    changes: Vec<StagedRoleChange>,
}

impl RoleStagingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a proposed role for a user whose committed role is
    /// `committed_now`. Equal proposed/committed is treated as "no change" and
    /// clears any staged entry for the user.
    pub fn stage(&mut self, uid: &str, proposed: Role, committed_now: Role) {
        if proposed == committed_now {
            self.changes.retain(|c| c.uid != uid);
            return;
        }
        match self.changes.iter_mut().find(|c| c.uid == uid) {
            Some(existing) => {
                existing.proposed = proposed;
                existing.committed = committed_now;
            }
            None => self.changes.push(StagedRoleChange {
                uid: uid.to_string(),
                proposed,
                committed: committed_now,
            }),
        }
    }

    pub fn staged_role(&self, uid: &str) -> Option<Role> {
        self.changes.iter().find(|c| c.uid == uid).map(|c| c.proposed)
    }

    /// The role the view should render: the staged one when present, else the
    /// committed one, so unsaved edits stay visible.
    pub fn displayed_role(&self, uid: &str, committed: Role) -> Role {
        self.staged_role(uid).unwrap_or(committed)
    }

    /// Drives the "N pending changes" indicator.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn entries(&self) -> &[StagedRoleChange] {
        &self.changes
    }

    pub fn remove(&mut self, uid: &str) {
        self.changes.retain(|c| c.uid != uid);
    }

    /// Discard everything without writing.
    pub fn clear(&mut self) {
        self.changes.clear();
    }
}

/// Per-item result of a batch commit. Entries already written before a failure
/// stay committed; failing entries stay staged and can be retried.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub committed: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl CommitOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The admin role-management workflow: the committed user list as last
/// observed, the staging buffer, and the batch commit.
pub struct RoleAdmin {
    accounts: AccountService,
    users: Vec<UserAccount>,
    staged: RoleStagingBuffer,
}

impl RoleAdmin {
    pub fn new(store: Arc<dyn StoreGateway>) -> Self {
        Self {
            accounts: AccountService::new(store),
            users: Vec::new(),
            staged: RoleStagingBuffer::new(),
        }
    }

    /// Reload the committed user list. Staged entries are discarded: they were
    /// diffs against a list that no longer exists.
    pub fn load(&mut self) -> Result<()> {
        let mut users = self.accounts.list_users()?.users;
        users.sort_by(|a, b| a.email.cmp(&b.email));
        self.users = users;
        self.staged.clear();
        Ok(())
    }

    pub fn users(&self) -> &[UserAccount] {
        &self.users
    }

    pub fn pending_count(&self) -> usize {
        self.staged.len()
    }

    fn committed_role(&self, uid: &str) -> Option<Role> {
        self.users
            .iter()
            .find(|u| u.uid == uid)
            .map(|u| u.roles.resolve())
    }

    /// The role the admin table renders for a user: staged if present, else
    /// committed.
    pub fn displayed_role(&self, uid: &str) -> Option<Role> {
        let committed = self.committed_role(uid)?;
        Some(self.staged.displayed_role(uid, committed))
    }

    /// Stage a role pick from the admin table. Picking the committed role
    /// clears the staged entry for that user.
    pub fn stage_change(&mut self, uid: &str, proposed: Role) -> Result<()> {
        let committed = self
            .committed_role(uid)
            .ok_or_else(|| anyhow!("Usuario no encontrado: {uid}"))?;
        self.staged.stage(uid, proposed, committed);
        Ok(())
    }

    /// Apply every staged entry in insertion order, one write per user.
    ///
    /// The commit is sequential and non-transactional: each successful write
    /// updates the in-memory committed record and unstages the entry on the
    /// spot; each failure is recorded and the entry stays staged for a later
    /// retry. Nothing is rolled back.
    pub fn commit_all(&mut self) -> CommitOutcome {
        let mut outcome = CommitOutcome::default();
        let entries: Vec<StagedRoleChange> = self.staged.entries().to_vec();
        info!("committing {} staged role change(s)", entries.len());
        for entry in entries {
            let flags = RoleFlags::for_role(entry.proposed);
            match self.accounts.set_roles(SetRolesCommand {
                uid: entry.uid.clone(),
                flags,
            }) {
                Ok(()) => {
                    if let Some(user) = self.users.iter_mut().find(|u| u.uid == entry.uid) {
                        user.roles = flags;
                    }
                    self.staged.remove(&entry.uid);
                    outcome.committed.push(entry.uid);
                }
                Err(err) => {
                    warn!("role write for {} failed: {err:#}", entry.uid);
                    outcome.failed.push((entry.uid, err.to_string()));
                }
            }
        }
        info!(
            "batch commit finished: {} committed, {} failed",
            outcome.committed.len(),
            outcome.failed.len()
        );
        outcome
    }

    /// Discard all staged entries without writing.
    pub fn cancel_all(&mut self) {
        self.staged.clear();
    }

    /// Remove a user's record from the store, the committed list, and the
    /// staging buffer.
    pub fn delete_user(&mut self, uid: &str) -> Result<()> {
        self.accounts
            .delete_user(DeleteUserCommand { uid: uid.to_string() })?;
        self.users.retain(|u| u.uid != uid);
        self.staged.remove(uid);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{MemoryStore, StoreGateway as _};
    use crate::storage::test_utils::FailingStore;
    use serde_json::json;

    fn seed_user(store: &dyn crate::gateway::StoreGateway, uid: &str, email: &str, role: Role) {
        let flags = serde_json::to_value(RoleFlags::for_role(role)).unwrap();
        store
            .set(&format!("users/{uid}"), json!({ "email": email, "roles": flags }))
            .unwrap();
    }

    fn setup() -> (Arc<MemoryStore>, RoleAdmin) {
        let store = Arc::new(MemoryStore::new());
        seed_user(store.as_ref(), "u1", "a@example.com", Role::Cliente);
        seed_user(store.as_ref(), "u2", "b@example.com", Role::Cliente);
        seed_user(store.as_ref(), "u3", "c@example.com", Role::Veterinario);
        let mut admin = RoleAdmin::new(store.clone());
        admin.load().unwrap();
        (store, admin)
    }

    #[test]
    fn staging_the_committed_role_is_a_no_op_diff() {
        let (_store, mut admin) = setup();
        admin.stage_change("u1", Role::Veterinario).unwrap();
        assert_eq!(admin.pending_count(), 1);

        // Picking the committed role again clears the entry.
        admin.stage_change("u1", Role::Cliente).unwrap();
        assert_eq!(admin.pending_count(), 0);
        assert_eq!(admin.displayed_role("u1"), Some(Role::Cliente));
    }

    #[test]
    fn back_and_forth_staging_nets_no_entry_and_no_write() {
        let (store, mut admin) = setup();
        admin.stage_change("u1", Role::Veterinario).unwrap();
        admin.stage_change("u1", Role::Cliente).unwrap();
        assert_eq!(admin.pending_count(), 0);

        let outcome = admin.commit_all();
        assert!(outcome.committed.is_empty());
        assert!(outcome.failed.is_empty());
        // The stored flags never changed shape.
        let roles = store.get("users/u1/roles").unwrap().unwrap();
        assert_eq!(roles["veterinario"], false);
    }

    #[test]
    fn displayed_role_prefers_the_staged_entry() {
        let (_store, mut admin) = setup();
        assert_eq!(admin.displayed_role("u1"), Some(Role::Cliente));
        admin.stage_change("u1", Role::Admin).unwrap();
        assert_eq!(admin.displayed_role("u1"), Some(Role::Admin));
        // Other users are untouched.
        assert_eq!(admin.displayed_role("u2"), Some(Role::Cliente));
        assert_eq!(admin.displayed_role("ghost"), None);
    }

    #[test]
    fn restaging_keeps_one_entry_per_user() {
        let (_store, mut admin) = setup();
        admin.stage_change("u1", Role::Veterinario).unwrap();
        admin.stage_change("u1", Role::Admin).unwrap();
        assert_eq!(admin.pending_count(), 1);
        assert_eq!(admin.displayed_role("u1"), Some(Role::Admin));
    }

    #[test]
    fn commit_writes_flags_and_updates_committed_list() {
        let (store, mut admin) = setup();
        admin.stage_change("u1", Role::Veterinario).unwrap();
        admin.stage_change("u2", Role::Admin).unwrap();

        let outcome = admin.commit_all();
        assert!(outcome.is_complete());
        assert_eq!(outcome.committed, vec!["u1".to_string(), "u2".to_string()]);
        assert_eq!(admin.pending_count(), 0);

        let roles = store.get("users/u1/roles").unwrap().unwrap();
        assert_eq!(roles, json!({ "admin": false, "veterinario": true, "cliente": true }));
        assert_eq!(admin.displayed_role("u1"), Some(Role::Veterinario));
        assert_eq!(admin.displayed_role("u2"), Some(Role::Admin));
    }

    #[test]
    fn partial_failure_keeps_failing_entries_staged() {
        let store = Arc::new(FailingStore::new());
        seed_user(store.as_ref(), "u1", "a@example.com", Role::Cliente);
        seed_user(store.as_ref(), "u2", "b@example.com", Role::Cliente);
        let mut admin = RoleAdmin::new(store.clone());
        admin.load().unwrap();

        admin.stage_change("u1", Role::Veterinario).unwrap();
        admin.stage_change("u2", Role::Admin).unwrap();

        store.deny_writes("users/u2/");
        let outcome = admin.commit_all();
        assert_eq!(outcome.committed, vec!["u1".to_string()]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].0, "u2");
        assert!(!outcome.is_complete());

        // u1 is committed and unstaged; u2 is still staged for retry.
        assert_eq!(admin.pending_count(), 1);
        assert_eq!(admin.displayed_role("u1"), Some(Role::Veterinario));
        assert_eq!(admin.displayed_role("u2"), Some(Role::Admin));

        store.allow_all();
        let retry = admin.commit_all();
        assert_eq!(retry.committed, vec!["u2".to_string()]);
        assert!(retry.is_complete());
        assert_eq!(admin.pending_count(), 0);
    }

    #[test]
    fn cancel_discards_without_writing() {
        let (store, mut admin) = setup();
        admin.stage_change("u1", Role::Admin).unwrap();
        admin.cancel_all();
        assert_eq!(admin.pending_count(), 0);
        let roles = store.get("users/u1/roles").unwrap().unwrap();
        assert_eq!(roles["admin"], false);
    }

    #[test]
    fn delete_user_also_drops_their_staged_entry() {
        let (store, mut admin) = setup();
        admin.stage_change("u1", Role::Admin).unwrap();
        admin.delete_user("u1").unwrap();
        assert_eq!(admin.pending_count(), 0);
        assert!(admin.users().iter().all(|u| u.uid != "u1"));
        assert!(store.get("users/u1").unwrap().is_none());
    }

    #[test]
    fn load_discards_stale_staged_entries() {
        let (_store, mut admin) = setup();
        admin.stage_change("u1", Role::Admin).unwrap();
        admin.load().unwrap();
        assert_eq!(admin.pending_count(), 0);
    }

    #[test]
    fn stage_for_unknown_user_fails() {
        let (_store, mut admin) = setup();
        assert!(admin.stage_change("ghost", Role::Admin).is_err());
    }
}
