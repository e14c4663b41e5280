use shared::{AuthUser, Role};

use super::{AppointmentState, PetState, ProfileState, SessionState};

/// The application-wide state: the four entity containers plus the session
/// teardown routine that keeps them consistent.
///
/// Teardown is owned here rather than sprinkled across call sites: a sign-out
/// event clears every dependent container in one place. In-progress flags are
/// left as they are — in-flight requests are never cancelled, their
/// completions simply land in already-cleared containers.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub session: SessionState,
    pub profile: ProfileState,
    pub pets: PetState,
    pub appointments: AppointmentState,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: SessionState::new(),
            ..Self::default()
        }
    }

    /// Funnel for auth-state events from the identity gateway.
    pub fn handle_auth_event(&mut self, user: Option<AuthUser>, roles: Vec<Role>) {
        match user {
            Some(user) => self.session.auth_state_changed(Some(user), roles),
            None => {
                self.session.auth_state_changed(None, Vec::new());
                self.teardown();
            }
        }
    }

    /// Clear every session-scoped container. Collections and errors go,
    /// in-progress flags stay.
    pub fn teardown(&mut self) {
        self.profile.clear();
        self.pets.clear();
        self.appointments.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ClientProfile;

    #[test]
    fn sign_out_clears_dependent_containers() {
        let mut state = AppState::new();
        let user = AuthUser {
            uid: "u1".into(),
            email: "a@example.com".into(),
        };
        state.handle_auth_event(Some(user), vec![Role::Cliente]);
        state.profile.fetch_succeeded(ClientProfile {
            first_name: "Juan".into(),
            ..ClientProfile::default()
        });
        state.appointments.fetch_failed("sin conexión".into());
        // An in-flight pet fetch at sign-out time.
        state.pets.fetch_requested();

        state.handle_auth_event(None, Vec::new());
        assert!(!state.session.is_authenticated);
        assert!(state.profile.profile.is_none());
        assert!(state.appointments.error.is_none());
        assert!(state.pets.pets.is_empty());
        // The in-flight flag survives; the request was never cancelled.
        assert!(state.pets.loading);
    }
}
