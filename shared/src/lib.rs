use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an appointment.
///
/// Wire values are the Spanish labels the remote store has always held
/// (`pendiente` / `confirmada` / `cancelada`), so existing records keep
/// deserializing unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "confirmada")]
    Confirmed,
    #[serde(rename = "cancelada")]
    Cancelled,
}

impl AppointmentStatus {
    /// Legal status moves: `Pending` may become `Confirmed` or `Cancelled`,
    /// nothing else. Both `Confirmed` and `Cancelled` are terminal.
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        matches!(
            (self, next),
            (AppointmentStatus::Pending, AppointmentStatus::Confirmed)
                | (AppointmentStatus::Pending, AppointmentStatus::Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, AppointmentStatus::Pending)
    }

    /// Wire label, useful for building filter values and log lines.
    pub fn as_wire(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pendiente",
            AppointmentStatus::Confirmed => "confirmada",
            AppointmentStatus::Cancelled => "cancelada",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Bookable half-hour slots offered by the clinic (morning and afternoon blocks).
pub const APPOINTMENT_SLOTS: [&str; 12] = [
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "12:00", "16:00", "16:30", "17:00",
    "17:30", "18:00",
];

/// Whether a time-of-day label is one of the fixed bookable slots.
pub fn is_valid_slot(label: &str) -> bool {
    APPOINTMENT_SLOTS.contains(&label)
}

/// An appointment record under `citas/{id}`.
///
/// The client and veterinarian display names are denormalized copies taken at
/// creation time so lists render without a profile lookup per row. They can go
/// stale if the source profile later changes; the `*_uid` fields are the only
/// identity source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    /// Store key. Assigned on first persist; never serialized into the record
    /// body (the key is the path segment).
    #[serde(skip)]
    pub id: Option<String>,
    #[serde(rename = "clienteUid")]
    pub client_uid: String,
    #[serde(rename = "clienteEmail")]
    pub client_email: String,
    #[serde(rename = "clienteNombre", skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(rename = "clienteApellidos", skip_serializing_if = "Option::is_none")]
    pub client_surname: Option<String>,
    #[serde(rename = "mascotaId")]
    pub pet_id: String,
    #[serde(rename = "mascotaNombre")]
    pub pet_name: String,
    #[serde(rename = "veterinarioUid", skip_serializing_if = "Option::is_none")]
    pub vet_uid: Option<String>,
    #[serde(rename = "veterinarioNombre", skip_serializing_if = "Option::is_none")]
    pub vet_name: Option<String>,
    /// Calendar date, ISO 8601 (`YYYY-MM-DD`).
    #[serde(rename = "fecha")]
    pub date: String,
    /// Half-hour slot label, one of [`APPOINTMENT_SLOTS`].
    #[serde(rename = "hora")]
    pub slot: String,
    #[serde(rename = "motivo")]
    pub reason: String,
    #[serde(rename = "estado")]
    pub status: AppointmentStatus,
    #[serde(rename = "observaciones", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// RFC 3339 creation instant, set once at first persist.
    #[serde(rename = "creadaEn")]
    pub created_at: String,
    /// RFC 3339 instant of the last status change or overwrite.
    #[serde(rename = "actualizadaEn", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Species accepted by the pet form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Species {
    #[serde(rename = "perro")]
    Dog,
    #[serde(rename = "gato")]
    Cat,
    #[serde(rename = "ave")]
    Bird,
    #[serde(rename = "reptil")]
    Reptile,
    #[serde(rename = "otro")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "macho")]
    Male,
    #[serde(rename = "hembra")]
    Female,
}

/// A pet record under `users/{ownerUid}/mascotas/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    /// Store key. Assigned on first persist; not part of the record body.
    #[serde(skip)]
    pub id: Option<String>,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "especie")]
    pub species: Species,
    #[serde(rename = "raza")]
    pub breed: String,
    #[serde(rename = "edad")]
    pub age: u32,
    #[serde(rename = "peso", skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chip: Option<String>,
    #[serde(rename = "genero")]
    pub gender: Gender,
    #[serde(rename = "esterilizado", skip_serializing_if = "Option::is_none")]
    pub neutered: Option<bool>,
    #[serde(rename = "observaciones", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "fechaNacimiento", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(rename = "clienteUid")]
    pub owner_uid: String,
}

/// The personal-data record under `users/{uid}/perfil`.
///
/// Every field is blank-by-default; a client who never filled the form simply
/// has no stored node, and reads materialize this empty record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    #[serde(rename = "nombre", default)]
    pub first_name: String,
    #[serde(rename = "apellidos", default)]
    pub last_name: String,
    #[serde(rename = "dni", default)]
    pub national_id: String,
    #[serde(rename = "telefono", default)]
    pub phone: String,
    #[serde(rename = "direccion", default)]
    pub address: String,
    #[serde(rename = "fechaNacimiento", default)]
    pub birth_date: String,
}

/// Elevated roles a signed-in account can hold. `Cliente` is the implicit
/// default when no elevated flag is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Veterinario,
    Cliente,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Admin => "ADMIN",
            Role::Veterinario => "VETERINARIO",
            Role::Cliente => "CLIENTE",
        };
        f.write_str(label)
    }
}

/// Per-account role flags as stored at `users/{uid}/roles`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleFlags {
    #[serde(default)]
    pub admin: bool,
    #[serde(rename = "veterinario", default)]
    pub vet: bool,
    #[serde(rename = "cliente", default)]
    pub client: bool,
}

impl RoleFlags {
    /// Collapse the flags to the single effective role: admin beats
    /// veterinarian beats client.
    pub fn resolve(self) -> Role {
        if self.admin {
            Role::Admin
        } else if self.vet {
            Role::Veterinario
        } else {
            Role::Cliente
        }
    }

    /// Flag shape written when an administrator assigns `role`: exactly one
    /// elevated flag may be true, and everyone stays a client.
    pub fn for_role(role: Role) -> Self {
        RoleFlags {
            admin: role == Role::Admin,
            vet: role == Role::Veterinario,
            client: true,
        }
    }
}

/// An account row in the admin user list, assembled from `users/{uid}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Store key (the path segment under `users/`), not part of the body.
    #[serde(skip)]
    pub uid: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: RoleFlags,
}

/// A veterinarian directory entry under `veterinarios/{uid}`. This system only
/// reads the directory; it is maintained elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Veterinarian {
    #[serde(skip)]
    pub uid: String,
    #[serde(rename = "nombre", default)]
    pub first_name: String,
    #[serde(rename = "apellidos", default)]
    pub last_name: String,
}

impl Veterinarian {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The authenticated identity, held only in memory for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

/// One uncommitted role reassignment in the admin staging buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedRoleChange {
    pub uid: String,
    /// Role the administrator picked.
    pub proposed: Role,
    /// Committed role at the moment of staging, kept so the entry can be
    /// rendered as "was X, becomes Y".
    pub committed: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_transitions_only_leave_pending() {
        use AppointmentStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Confirmed.can_transition_to(Cancelled));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn status_wire_labels() {
        let v = serde_json::to_value(AppointmentStatus::Confirmed).unwrap();
        assert_eq!(v, json!("confirmada"));
        let s: AppointmentStatus = serde_json::from_value(json!("pendiente")).unwrap();
        assert_eq!(s, AppointmentStatus::Pending);
    }

    #[test]
    fn appointment_serializes_with_original_field_names() {
        let appt = Appointment {
            id: Some("abc".into()),
            client_uid: "u1".into(),
            client_email: "c@example.com".into(),
            client_name: Some("Juan".into()),
            client_surname: None,
            pet_id: "p1".into(),
            pet_name: "Rex".into(),
            vet_uid: Some("v1".into()),
            vet_name: Some("Ana López".into()),
            date: "2025-03-10".into(),
            slot: "09:30".into(),
            reason: "vacuna".into(),
            status: AppointmentStatus::Pending,
            notes: None,
            created_at: "2025-03-01T10:00:00Z".into(),
            updated_at: None,
        };
        let v = serde_json::to_value(&appt).unwrap();
        assert_eq!(v["clienteUid"], "u1");
        assert_eq!(v["mascotaNombre"], "Rex");
        assert_eq!(v["hora"], "09:30");
        assert_eq!(v["estado"], "pendiente");
        assert_eq!(v["creadaEn"], "2025-03-01T10:00:00Z");
        // The store key never appears in the record body.
        assert!(v.get("id").is_none());
        // Absent optionals are absent keys, not nulls.
        assert!(v.get("observaciones").is_none());
        assert!(v.get("actualizadaEn").is_none());
    }

    #[test]
    fn profile_defaults_to_blank_fields() {
        let profile: ClientProfile = serde_json::from_value(json!({})).unwrap();
        assert_eq!(profile, ClientProfile::default());
        assert_eq!(profile.first_name, "");
    }

    #[test]
    fn role_flags_resolution_precedence() {
        let all = RoleFlags { admin: true, vet: true, client: true };
        assert_eq!(all.resolve(), Role::Admin);
        let vet = RoleFlags { admin: false, vet: true, client: true };
        assert_eq!(vet.resolve(), Role::Veterinario);
        assert_eq!(RoleFlags::default().resolve(), Role::Cliente);
    }

    #[test]
    fn role_flags_write_shape_sets_one_elevated_flag() {
        let v = serde_json::to_value(RoleFlags::for_role(Role::Veterinario)).unwrap();
        assert_eq!(v, json!({ "admin": false, "veterinario": true, "cliente": true }));
        let v = serde_json::to_value(RoleFlags::for_role(Role::Cliente)).unwrap();
        assert_eq!(v, json!({ "admin": false, "veterinario": false, "cliente": true }));
    }

    #[test]
    fn slot_labels() {
        assert!(is_valid_slot("09:00"));
        assert!(is_valid_slot("18:00"));
        assert!(!is_valid_slot("13:00"));
        assert!(!is_valid_slot("9:00"));
    }

    #[test]
    fn pet_round_trips_wire_names() {
        let pet = Pet {
            id: None,
            name: "Misha".into(),
            species: Species::Cat,
            breed: "Siamés".into(),
            age: 3,
            weight: Some(4.2),
            color: None,
            chip: Some("977200001111".into()),
            gender: Gender::Female,
            neutered: Some(true),
            notes: None,
            birth_date: None,
            owner_uid: "u1".into(),
        };
        let v = serde_json::to_value(&pet).unwrap();
        assert_eq!(v["especie"], "gato");
        assert_eq!(v["genero"], "hembra");
        assert_eq!(v["esterilizado"], true);
        assert_eq!(v["clienteUid"], "u1");
        let back: Pet = serde_json::from_value(v).unwrap();
        assert_eq!(back, Pet { id: None, ..pet });
    }
}
