use shared::{AuthUser, Role};

/// The user/session container: identity and roles held only in memory,
/// repopulated on every auth-state change.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub user: Option<AuthUser>,
    pub roles: Vec<Role>,
    pub is_authenticated: bool,
    /// Initial auth probe: true until the first auth-state event arrives.
    pub loading: bool,
    pub login_loading: bool,
    pub register_loading: bool,
    pub error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            roles: Vec::new(),
            is_authenticated: false,
            loading: true,
            login_loading: false,
            register_loading: false,
            error: None,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login_requested(&mut self) {
        self.login_loading = true;
        self.error = None;
    }

    pub fn login_succeeded(&mut self, user: AuthUser, roles: Vec<Role>) {
        self.login_loading = false;
        self.apply_session(Some(user), roles);
    }

    pub fn login_failed(&mut self, message: String) {
        self.login_loading = false;
        self.error = Some(message);
    }

    pub fn register_requested(&mut self) {
        self.register_loading = true;
        self.error = None;
    }

    pub fn register_succeeded(&mut self, user: AuthUser, roles: Vec<Role>) {
        self.register_loading = false;
        self.apply_session(Some(user), roles);
    }

    pub fn register_failed(&mut self, message: String) {
        self.register_loading = false;
        self.error = Some(message);
    }

    /// An auth-state event from the identity gateway (including the initial
    /// probe).
    pub fn auth_state_changed(&mut self, user: Option<AuthUser>, roles: Vec<Role>) {
        self.loading = false;
        self.apply_session(user, roles);
    }

    pub fn signed_out(&mut self) {
        self.apply_session(None, Vec::new());
        self.error = None;
    }

    /// A failed sign-out leaves the session in place and reports through the
    /// error slot, like every other failed operation.
    pub fn sign_out_failed(&mut self, message: String) {
        self.error = Some(message);
    }

    fn apply_session(&mut self, user: Option<AuthUser>, roles: Vec<Role>) {
        self.is_authenticated = user.is_some();
        self.user = user;
        self.roles = if self.is_authenticated { roles } else { Vec::new() };
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    pub fn is_vet(&self) -> bool {
        self.has_role(Role::Veterinario)
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
