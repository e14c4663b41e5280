//! # Gateway Seams
//!
//! The two external collaborators of the system, behind object-safe traits so
//! the domain layer never sees a concrete backend: a path-addressed document
//! store and an identity provider. [`memory`] provides in-memory
//! implementations of both, used by every test and usable as a local backend.

pub mod memory;

pub use memory::{MemoryIdentity, MemoryStore};

use serde_json::{Map, Value};
use shared::AuthUser;
use thiserror::Error;

/// Failure of a remote store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("permission denied at '{0}'")]
    PermissionDenied(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("malformed document at '{path}': {message}")]
    Malformed { path: String, message: String },
}

/// A keyed document tree reachable by `/`-separated path.
///
/// Semantics follow the hosted document stores this deploys against:
/// `get` on an interior node returns the whole subtree, `set` overwrites,
/// `update` shallow-merges the given keys at the node, and `push` mints a
/// unique child key without writing anything.
///
/// Operations are synchronous; there is exactly one logical writer (the
/// driving event loop) and no operation supports cancellation.
pub trait StoreGateway: Send + Sync {
    /// Point or subtree read. `Ok(None)` when nothing is stored at the path.
    fn get(&self, path: &str) -> Result<Option<Value>, StoreError>;

    /// Overwrite the node at the path, creating intermediate nodes as needed.
    fn set(&self, path: &str, value: Value) -> Result<(), StoreError>;

    /// Shallow-merge `partial` into the object at the path. A `null` value
    /// removes that key. Creates the node when absent.
    fn update(&self, path: &str, partial: Map<String, Value>) -> Result<(), StoreError>;

    /// Delete the subtree at the path. Removing an absent node is not an error.
    fn remove(&self, path: &str) -> Result<(), StoreError>;

    /// Generate a unique child key under the path.
    fn push(&self, path: &str) -> Result<String, StoreError>;
}

/// Failure of an identity-provider operation.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("email already registered: {0}")]
    EmailTaken(String),
    #[error("no active session")]
    NotSignedIn,
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Handle for removing an auth-state listener.
pub type ListenerId = u64;

/// Auth-state observer callback. Receives the current session (or `None` after
/// sign-out) on every change.
pub type AuthListener = Box<dyn Fn(Option<&AuthUser>) + Send + Sync>;

/// The identity provider: sign-in/sign-up/sign-out, the current session, and
/// an auth-state observer.
pub trait IdentityGateway: Send + Sync {
    fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    /// Create an account and open a session for it. Rejects an already
    /// registered e-mail.
    fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    fn sign_out(&self) -> Result<(), AuthError>;

    fn current_user(&self) -> Option<AuthUser>;

    /// Register an auth-state listener. The listener is invoked immediately
    /// with the current session and again on every change. Listeners must not
    /// call back into the gateway.
    fn subscribe(&self, listener: AuthListener) -> ListenerId;

    fn unsubscribe(&self, id: ListenerId);
}
