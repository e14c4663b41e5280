use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use log::{info, warn};
use serde_json::{Map, Value};
use shared::ClientProfile;

use crate::domain::commands::profile::{
    FetchProfileResult, SaveProfileCommand, SaveProfileResult, UpdateProfileCommand,
    UpdateProfileResult,
};
use crate::gateway::StoreGateway;
use crate::storage::ProfileRepository;

/// Service for the singleton personal-data record of a client.
#[derive(Clone)]
pub struct ProfileService {
    profiles: ProfileRepository,
}

impl ProfileService {
    pub fn new(store: Arc<dyn StoreGateway>) -> Self {
        Self {
            profiles: ProfileRepository::new(store),
        }
    }

    /// A client who never saved the form gets the empty-field record; nothing
    /// is written back on read.
    pub fn fetch(&self, uid: &str) -> Result<FetchProfileResult> {
        info!("fetching profile of {uid}");
        match self.profiles.fetch(uid)? {
            Some(profile) => Ok(FetchProfileResult { profile, stored: true }),
            None => {
                warn!("no stored profile for {uid}, materializing the empty record");
                Ok(FetchProfileResult {
                    profile: ClientProfile::default(),
                    stored: false,
                })
            }
        }
    }

    /// Full overwrite from the personal-data form.
    pub fn save(&self, command: SaveProfileCommand) -> Result<SaveProfileResult> {
        info!("saving profile of {}", command.uid);
        Self::validate_birth_date(&command.profile.birth_date)?;
        self.profiles.save(&command.uid, &command.profile)?;
        Ok(SaveProfileResult {
            profile: command.profile,
        })
    }

    /// Merge only the provided fields into the stored record, then return the
    /// merged view.
    pub fn update_partial(&self, command: UpdateProfileCommand) -> Result<UpdateProfileResult> {
        info!("partially updating profile of {}", command.uid);
        if let Some(ref birth_date) = command.birth_date {
            Self::validate_birth_date(birth_date)?;
        }
        let mut partial = Map::new();
        let fields = [
            ("nombre", &command.first_name),
            ("apellidos", &command.last_name),
            ("dni", &command.national_id),
            ("telefono", &command.phone),
            ("direccion", &command.address),
            ("fechaNacimiento", &command.birth_date),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                partial.insert(key.into(), Value::String(value.clone()));
            }
        }
        if partial.is_empty() {
            return Err(anyhow!("No hay campos que actualizar"));
        }
        self.profiles.merge(&command.uid, partial)?;
        let profile = self.fetch(&command.uid)?.profile;
        Ok(UpdateProfileResult { profile })
    }

    /// Blank is fine (the field is optional); a non-blank value must be an ISO
    /// date.
    fn validate_birth_date(birth_date: &str) -> Result<()> {
        if birth_date.trim().is_empty() {
            return Ok(());
        }
        NaiveDate::parse_from_str(birth_date, "%Y-%m-%d")
            .map(|_| ())
            .map_err(|_| anyhow!("Fecha de nacimiento no válida, usa el formato YYYY-MM-DD"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryStore;

    fn setup() -> ProfileService {
        ProfileService::new(Arc::new(MemoryStore::new()))
    }

    fn full_profile() -> ClientProfile {
        ClientProfile {
            first_name: "Juan".into(),
            last_name: "Pérez".into(),
            national_id: "12345678A".into(),
            phone: "+34 666 777 888".into(),
            address: "Calle Ejemplo 123".into(),
            birth_date: "1990-01-01".into(),
        }
    }

    #[test]
    fn fetch_without_stored_record_returns_empty_default() {
        let service = setup();
        let result = service.fetch("u1").unwrap();
        assert!(!result.stored);
        assert_eq!(result.profile, ClientProfile::default());
    }

    #[test]
    fn save_then_fetch_round_trips_every_field() {
        let service = setup();
        service
            .save(SaveProfileCommand {
                uid: "u1".into(),
                profile: full_profile(),
            })
            .unwrap();

        let fetched = service.fetch("u1").unwrap();
        assert!(fetched.stored);
        assert_eq!(fetched.profile, full_profile());
    }

    #[test]
    fn save_is_a_full_overwrite() {
        let service = setup();
        service
            .save(SaveProfileCommand {
                uid: "u1".into(),
                profile: full_profile(),
            })
            .unwrap();

        // Saving a mostly-blank form replaces the whole record.
        let sparse = ClientProfile {
            first_name: "Juan".into(),
            ..ClientProfile::default()
        };
        service
            .save(SaveProfileCommand {
                uid: "u1".into(),
                profile: sparse.clone(),
            })
            .unwrap();
        assert_eq!(service.fetch("u1").unwrap().profile, sparse);
    }

    #[test]
    fn partial_update_merges_only_given_fields() {
        let service = setup();
        service
            .save(SaveProfileCommand {
                uid: "u1".into(),
                profile: full_profile(),
            })
            .unwrap();

        let updated = service
            .update_partial(UpdateProfileCommand {
                uid: "u1".into(),
                phone: Some("+34 600 000 000".into()),
                ..UpdateProfileCommand::default()
            })
            .unwrap()
            .profile;
        assert_eq!(updated.phone, "+34 600 000 000");
        assert_eq!(updated.first_name, "Juan");
        assert_eq!(updated.address, "Calle Ejemplo 123");
    }

    #[test]
    fn partial_update_with_no_fields_is_rejected() {
        let service = setup();
        let result = service.update_partial(UpdateProfileCommand {
            uid: "u1".into(),
            ..UpdateProfileCommand::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn birth_date_is_validated_when_present() {
        let service = setup();
        let mut profile = full_profile();
        profile.birth_date = "01-01-1990".into();
        assert!(service
            .save(SaveProfileCommand { uid: "u1".into(), profile })
            .is_err());

        // Blank birth date is acceptable.
        let mut profile = full_profile();
        profile.birth_date = String::new();
        service
            .save(SaveProfileCommand { uid: "u1".into(), profile })
            .unwrap();
    }
}
