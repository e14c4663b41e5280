use shared::ClientProfile;

/// Singleton container for the client's personal-data record.
#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    pub profile: Option<ClientProfile>,
    pub loading: bool,
    pub save_loading: bool,
    pub error: Option<String>,
}

impl ProfileState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetch_requested(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn fetch_succeeded(&mut self, profile: ClientProfile) {
        self.loading = false;
        self.profile = Some(profile);
    }

    pub fn fetch_failed(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub fn save_requested(&mut self) {
        self.save_loading = true;
        self.error = None;
    }

    pub fn save_succeeded(&mut self, profile: ClientProfile) {
        self.save_loading = false;
        self.profile = Some(profile);
    }

    pub fn save_failed(&mut self, message: String) {
        self.save_loading = false;
        self.error = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Session teardown: drop the data and the error, leave flags alone.
    pub fn clear(&mut self) {
        self.profile = None;
        self.error = None;
    }
}
