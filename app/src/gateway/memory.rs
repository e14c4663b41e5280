//! In-memory gateway implementations backed by a JSON tree and a plain
//! account map. These serve as the test backend and as a local mode with the
//! same observable semantics as the managed store.

use std::collections::HashMap;
use std::sync::Mutex;

use log::debug;
use serde_json::{Map, Value};
use shared::AuthUser;
use uuid::Uuid;

use super::{AuthError, AuthListener, IdentityGateway, ListenerId, StoreError, StoreGateway};

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// In-memory document tree implementing [`StoreGateway`].
#[derive(Default)]
pub struct MemoryStore {
    root: Mutex<Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            root: Mutex::new(Value::Object(Map::new())),
        }
    }

    fn with_root<T>(&self, f: impl FnOnce(&mut Value) -> T) -> T {
        let mut root = self.root.lock().unwrap_or_else(|e| e.into_inner());
        if root.is_null() {
            *root = Value::Object(Map::new());
        }
        f(&mut root)
    }
}

fn node_at<'a>(root: &'a Value, segs: &[&str]) -> Option<&'a Value> {
    let mut node = root;
    for seg in segs {
        node = node.as_object()?.get(*seg)?;
    }
    Some(node)
}

/// Walk to the object holding the last path segment, creating intermediate
/// objects on the way.
fn parent_object_mut<'a>(root: &'a mut Value, segs: &[&str]) -> &'a mut Map<String, Value> {
    let mut node = root;
    for seg in segs {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let map = node.as_object_mut().unwrap_or_else(|| unreachable!());
        node = map
            .entry(seg.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    node.as_object_mut().unwrap_or_else(|| unreachable!())
}

impl StoreGateway for MemoryStore {
    fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let segs = segments(path);
        self.with_root(|root| Ok(node_at(root, &segs).cloned()))
    }

    fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        let segs = segments(path);
        if segs.is_empty() {
            return self.with_root(|root| {
                *root = value;
                Ok(())
            });
        }
        debug!("memory store set at '{path}'");
        let (last, parents) = segs.split_last().unwrap_or_else(|| unreachable!());
        self.with_root(|root| {
            let parent = parent_object_mut(root, parents);
            if value.is_null() {
                parent.remove(*last);
            } else {
                parent.insert((*last).to_string(), value);
            }
            Ok(())
        })
    }

    fn update(&self, path: &str, partial: Map<String, Value>) -> Result<(), StoreError> {
        let segs = segments(path);
        debug!("memory store update at '{path}' ({} key(s))", partial.len());
        self.with_root(|root| {
            let target = parent_object_mut(root, &segs);
            for (key, value) in partial {
                if value.is_null() {
                    target.remove(&key);
                } else {
                    target.insert(key, value);
                }
            }
            Ok(())
        })
    }

    fn remove(&self, path: &str) -> Result<(), StoreError> {
        let segs = segments(path);
        debug!("memory store remove at '{path}'");
        let Some((last, parents)) = segs.split_last() else {
            return self.with_root(|root| {
                *root = Value::Object(Map::new());
                Ok(())
            });
        };
        self.with_root(|root| {
            // Removing under an absent parent must not create the chain, so
            // walk without the creating helper.
            let mut node = &mut *root;
            for seg in parents {
                match node.as_object_mut().and_then(|m| m.get_mut(*seg)) {
                    Some(next) => node = next,
                    None => return Ok(()),
                }
            }
            if let Some(map) = node.as_object_mut() {
                map.remove(*last);
            }
            Ok(())
        })
    }

    fn push(&self, path: &str) -> Result<String, StoreError> {
        let key = Uuid::new_v4().simple().to_string();
        debug!("memory store push under '{path}' -> {key}");
        Ok(key)
    }
}

struct Account {
    uid: String,
    password: String,
}

#[derive(Default)]
struct SessionInner {
    accounts: HashMap<String, Account>,
    current: Option<AuthUser>,
}

/// In-memory identity provider implementing [`IdentityGateway`].
#[derive(Default)]
pub struct MemoryIdentity {
    state: Mutex<SessionInner>,
    listeners: Mutex<HashMap<ListenerId, AuthListener>>,
    next_listener: Mutex<ListenerId>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account without opening a session (test setup helper).
    pub fn register_account(&self, email: &str, password: &str) -> AuthUser {
        let email = email.trim().to_lowercase();
        let uid = Uuid::new_v4().simple().to_string();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.accounts.insert(
            email.clone(),
            Account {
                uid: uid.clone(),
                password: password.to_string(),
            },
        );
        AuthUser { uid, email }
    }

    fn notify(&self, current: Option<&AuthUser>) {
        let listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        for listener in listeners.values() {
            listener(current);
        }
    }
}

impl IdentityGateway for MemoryIdentity {
    fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let email = email.trim().to_lowercase();
        let user = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            let account = state
                .accounts
                .get(&email)
                .filter(|a| a.password == password)
                .ok_or(AuthError::InvalidCredentials)?;
            let user = AuthUser {
                uid: account.uid.clone(),
                email,
            };
            state.current = Some(user.clone());
            user
        };
        self.notify(Some(&user));
        Ok(user)
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let email = email.trim().to_lowercase();
        let user = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            if state.accounts.contains_key(&email) {
                return Err(AuthError::EmailTaken(email));
            }
            let uid = Uuid::new_v4().simple().to_string();
            state.accounts.insert(
                email.clone(),
                Account {
                    uid: uid.clone(),
                    password: password.to_string(),
                },
            );
            let user = AuthUser { uid, email };
            state.current = Some(user.clone());
            user
        };
        self.notify(Some(&user));
        Ok(user)
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.current = None;
        }
        self.notify(None);
        Ok(())
    }

    fn current_user(&self) -> Option<AuthUser> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.current.clone()
    }

    fn subscribe(&self, listener: AuthListener) -> ListenerId {
        let id = {
            let mut next = self.next_listener.lock().unwrap_or_else(|e| e.into_inner());
            *next += 1;
            *next
        };
        let current = self.current_user();
        listener(current.as_ref());
        let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        listeners.insert(id, listener);
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        listeners.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn set_and_get_nested_paths() {
        let store = MemoryStore::new();
        store.set("users/u1/perfil", json!({ "nombre": "Juan" })).unwrap();
        let profile = store.get("users/u1/perfil").unwrap().unwrap();
        assert_eq!(profile["nombre"], "Juan");
        // Interior-node read returns the whole subtree.
        let users = store.get("users").unwrap().unwrap();
        assert_eq!(users["u1"]["perfil"]["nombre"], "Juan");
    }

    #[test]
    fn get_absent_path_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("citas").unwrap().is_none());
        assert!(store.get("users/u1/perfil").unwrap().is_none());
    }

    #[test]
    fn update_merges_shallowly_and_null_removes() {
        let store = MemoryStore::new();
        store
            .set("citas/c1", json!({ "estado": "pendiente", "motivo": "vacuna" }))
            .unwrap();
        let mut partial = Map::new();
        partial.insert("estado".into(), json!("confirmada"));
        partial.insert("motivo".into(), Value::Null);
        store.update("citas/c1", partial).unwrap();
        let record = store.get("citas/c1").unwrap().unwrap();
        assert_eq!(record["estado"], "confirmada");
        assert!(record.get("motivo").is_none());
    }

    #[test]
    fn remove_deletes_subtree_and_tolerates_absence() {
        let store = MemoryStore::new();
        store.set("users/u1/mascotas/p1", json!({ "nombre": "Rex" })).unwrap();
        store.remove("users/u1/mascotas/p1").unwrap();
        assert!(store.get("users/u1/mascotas/p1").unwrap().is_none());
        // Second remove and removal under an absent parent are both fine.
        store.remove("users/u1/mascotas/p1").unwrap();
        store.remove("nope/nothing/here").unwrap();
        assert!(store.get("nope").unwrap().is_none());
    }

    #[test]
    fn push_keys_are_unique() {
        let store = MemoryStore::new();
        let a = store.push("citas").unwrap();
        let b = store.push("citas").unwrap();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn identity_sign_up_in_out_cycle() {
        let identity = MemoryIdentity::new();
        let user = identity.sign_up("cliente@example.com", "secret").unwrap();
        assert_eq!(identity.current_user(), Some(user.clone()));

        assert!(matches!(
            identity.sign_up("cliente@example.com", "other"),
            Err(AuthError::EmailTaken(_))
        ));

        identity.sign_out().unwrap();
        assert!(identity.current_user().is_none());

        assert!(matches!(
            identity.sign_in("cliente@example.com", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
        let again = identity.sign_in("Cliente@Example.com", "secret").unwrap();
        assert_eq!(again.uid, user.uid);
    }

    #[test]
    fn subscribe_fires_immediately_and_on_changes() {
        let identity = MemoryIdentity::new();
        identity.register_account("cliente@example.com", "secret");
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let id = identity.subscribe(Box::new(move |_user| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        // Immediate invocation with the (empty) current session.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        identity.sign_in("cliente@example.com", "secret").unwrap();
        identity.sign_out().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        identity.unsubscribe(id);
        identity.sign_in("cliente@example.com", "secret").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
