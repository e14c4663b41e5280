//! The application coordinator: wires config, gateways, services, and state,
//! and drives the three-phase container contract around every operation.

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use log::error;
use shared::AuthUser;

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::domain::commands::appointment::{
    CancelAppointmentCommand, ConfirmAppointmentCommand, DeleteAppointmentCommand,
    RequestAppointmentCommand,
};
use crate::domain::commands::pet::{CreatePetCommand, DeletePetCommand, UpdatePetCommand};
use crate::domain::commands::profile::SaveProfileCommand;
use crate::domain::{AccountService, AppointmentService, PetService, ProfileService};
use crate::gateway::{IdentityGateway, ListenerId, StoreGateway};
use crate::state::AppState;

/// Top-level handle for a signed-in (or signing-in) browser session.
///
/// Every operation follows the same shape: mark the matching container
/// in-progress, run the domain service, then apply `succeeded` or `failed`.
/// Remote failures stop here — callers observe them through the container's
/// error slot, and the methods merely report whether the operation stuck.
pub struct ClinicApp {
    auth: AuthService,
    profiles: ProfileService,
    pets: PetService,
    appointments: AppointmentService,
    identity: Arc<dyn IdentityGateway>,
    auth_events: Option<Receiver<Option<AuthUser>>>,
    auth_listener: Option<ListenerId>,
    pub state: AppState,
}

impl ClinicApp {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn StoreGateway>,
        identity: Arc<dyn IdentityGateway>,
    ) -> Self {
        let accounts = AccountService::new(store.clone());
        Self {
            auth: AuthService::new(config, identity.clone(), accounts),
            profiles: ProfileService::new(store.clone()),
            pets: PetService::new(store.clone()),
            appointments: AppointmentService::new(store),
            identity,
            auth_events: None,
            auth_listener: None,
            state: AppState::new(),
        }
    }

    /// Resolve the current session once at startup (the initial auth probe).
    /// For live events, [`Self::attach_auth_observer`] registers with the
    /// gateway's observer instead.
    pub fn bootstrap_session(&mut self) {
        let user = self.auth.current_user();
        self.handle_auth_event(user);
    }

    /// Register with the identity gateway's auth-state observer. Events are
    /// queued and folded into the state by [`Self::pump_auth_events`]; the
    /// queue keeps gateway callbacks from re-entering the app. The
    /// subscription fires immediately with the current session, so the first
    /// pump resolves the initial auth probe.
    pub fn attach_auth_observer(&mut self) {
        if self.auth_listener.is_some() {
            return;
        }
        let (tx, rx) = mpsc::channel();
        let id = self.identity.subscribe(Box::new(move |user| {
            let _ = tx.send(user.cloned());
        }));
        self.auth_events = Some(rx);
        self.auth_listener = Some(id);
    }

    /// Drain queued auth-state events into [`Self::handle_auth_event`].
    /// Hosts call this from their event loop.
    pub fn pump_auth_events(&mut self) {
        let Some(events) = self
            .auth_events
            .as_ref()
            .map(|rx| rx.try_iter().collect::<Vec<_>>())
        else {
            return;
        };
        for user in events {
            self.handle_auth_event(user);
        }
    }

    pub fn detach_auth_observer(&mut self) {
        if let Some(id) = self.auth_listener.take() {
            self.identity.unsubscribe(id);
        }
        self.auth_events = None;
    }

    /// An auth-state event: resolve roles for the new session (if any) and
    /// run the teardown routine on sign-out.
    pub fn handle_auth_event(&mut self, user: Option<AuthUser>) {
        match user {
            Some(user) => match self.auth.roles_for(&user) {
                Ok(roles) => self.state.handle_auth_event(Some(user), roles),
                Err(err) => {
                    error!("role resolution failed for {}: {err:#}", user.email);
                    self.state.session.login_failed(err.to_string());
                }
            },
            None => self.state.handle_auth_event(None, Vec::new()),
        }
    }

    pub fn sign_in(&mut self, email: &str, password: &str) -> bool {
        self.state.session.login_requested();
        match self.auth.sign_in(email, password) {
            Ok((user, roles)) => {
                self.state.session.login_succeeded(user, roles);
                true
            }
            Err(err) => {
                self.state.session.login_failed(err.to_string());
                false
            }
        }
    }

    pub fn sign_up(&mut self, email: &str, password: &str) -> bool {
        self.state.session.register_requested();
        match self.auth.sign_up(email, password) {
            Ok((user, roles)) => {
                self.state.session.register_succeeded(user, roles);
                true
            }
            Err(err) => {
                self.state.session.register_failed(err.to_string());
                false
            }
        }
    }

    pub fn sign_out(&mut self) -> bool {
        match self.auth.sign_out() {
            Ok(()) => {
                self.state.session.signed_out();
                self.state.teardown();
                true
            }
            Err(err) => {
                self.state.session.sign_out_failed(err.to_string());
                false
            }
        }
    }

    pub fn load_profile(&mut self, uid: &str) -> bool {
        self.state.profile.fetch_requested();
        match self.profiles.fetch(uid) {
            Ok(result) => {
                self.state.profile.fetch_succeeded(result.profile);
                true
            }
            Err(err) => {
                self.state.profile.fetch_failed(err.to_string());
                false
            }
        }
    }

    pub fn save_profile(&mut self, command: SaveProfileCommand) -> bool {
        self.state.profile.save_requested();
        match self.profiles.save(command) {
            Ok(result) => {
                self.state.profile.save_succeeded(result.profile);
                true
            }
            Err(err) => {
                self.state.profile.save_failed(err.to_string());
                false
            }
        }
    }

    pub fn load_pets(&mut self, owner_uid: &str) -> bool {
        self.state.pets.fetch_requested();
        match self.pets.list(owner_uid) {
            Ok(result) => {
                self.state.pets.fetch_succeeded(result.pets);
                true
            }
            Err(err) => {
                self.state.pets.fetch_failed(err.to_string());
                false
            }
        }
    }

    pub fn add_pet(&mut self, command: CreatePetCommand) -> bool {
        self.state.pets.add_requested();
        match self.pets.create(command) {
            Ok(result) => {
                self.state.pets.add_succeeded(result.pet);
                true
            }
            Err(err) => {
                self.state.pets.add_failed(err.to_string());
                false
            }
        }
    }

    pub fn update_pet(&mut self, command: UpdatePetCommand) -> bool {
        self.state.pets.update_requested();
        match self.pets.update(command) {
            Ok(result) => {
                self.state.pets.update_succeeded(result.pet);
                true
            }
            Err(err) => {
                self.state.pets.update_failed(err.to_string());
                false
            }
        }
    }

    pub fn delete_pet(&mut self, command: DeletePetCommand) -> bool {
        self.state.pets.delete_requested();
        match self.pets.delete(command) {
            Ok(result) => {
                self.state.pets.delete_succeeded(&result.deleted_id);
                true
            }
            Err(err) => {
                self.state.pets.delete_failed(err.to_string());
                false
            }
        }
    }

    pub fn load_client_appointments(&mut self, client_uid: &str) -> bool {
        self.state.appointments.fetch_requested();
        match self.appointments.list_for_client(client_uid) {
            Ok(result) => {
                self.state.appointments.fetch_succeeded(result.appointments);
                true
            }
            Err(err) => {
                self.state.appointments.fetch_failed(err.to_string());
                false
            }
        }
    }

    pub fn load_vet_appointments(&mut self, vet_uid: &str) -> bool {
        self.state.appointments.fetch_requested();
        match self.appointments.list_for_vet(vet_uid) {
            Ok(result) => {
                self.state.appointments.fetch_succeeded(result.appointments);
                true
            }
            Err(err) => {
                self.state.appointments.fetch_failed(err.to_string());
                false
            }
        }
    }

    /// Booking is gated on the client having a pet on file; the service
    /// re-checks what the view already enforces.
    pub fn request_appointment(&mut self, command: RequestAppointmentCommand) -> bool {
        self.state.appointments.add_requested();
        match self.appointments.request(command) {
            Ok(result) => {
                self.state.appointments.add_succeeded(result.appointment);
                true
            }
            Err(err) => {
                self.state.appointments.add_failed(err.to_string());
                false
            }
        }
    }

    pub fn confirm_appointment(&mut self, command: ConfirmAppointmentCommand) -> bool {
        self.state.appointments.update_requested();
        match self.appointments.confirm(command) {
            Ok(result) => {
                self.state.appointments.update_succeeded(result.appointment);
                true
            }
            Err(err) => {
                self.state.appointments.update_failed(err.to_string());
                false
            }
        }
    }

    pub fn cancel_appointment(&mut self, command: CancelAppointmentCommand) -> bool {
        self.state.appointments.update_requested();
        match self.appointments.cancel(command) {
            Ok(result) => {
                self.state.appointments.update_succeeded(result.appointment);
                true
            }
            Err(err) => {
                self.state.appointments.update_failed(err.to_string());
                false
            }
        }
    }

    pub fn delete_appointment(&mut self, command: DeleteAppointmentCommand) -> bool {
        self.state.appointments.delete_requested();
        match self.appointments.delete(command) {
            Ok(result) => {
                self.state.appointments.delete_succeeded(&result.deleted_id);
                true
            }
            Err(err) => {
                self.state.appointments.delete_failed(err.to_string());
                false
            }
        }
    }
}
