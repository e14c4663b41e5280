use shared::ClientProfile;

#[derive(Debug, Clone)]
pub struct FetchProfileResult {
    pub profile: ClientProfile,
    /// False when no record was stored and the empty default was materialized.
    pub stored: bool,
}

/// Full overwrite from the personal-data form.
#[derive(Debug, Clone)]
pub struct SaveProfileCommand {
    pub uid: String,
    pub profile: ClientProfile,
}

#[derive(Debug, Clone)]
pub struct SaveProfileResult {
    pub profile: ClientProfile,
}

/// Partial update: only the provided fields are merged into the stored record.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileCommand {
    pub uid: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateProfileResult {
    pub profile: ClientProfile,
}
