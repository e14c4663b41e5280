//! Persisted layout of the document tree. Every path the system reads or
//! writes is built here, in one place.
//!
//! ```text
//! users/{uid}/roles                per-account role flags
//! users/{uid}/perfil               client profile
//! users/{uid}/mascotas/{petId}     pets, scoped under their owner
//! veterinarios/{uid}               vet directory (read-only here)
//! citas/{appointmentId}            flat appointment collection
//! ```

pub fn user(uid: &str) -> String {
    format!("users/{uid}")
}

pub fn user_roles(uid: &str) -> String {
    format!("users/{uid}/roles")
}

pub fn profile(uid: &str) -> String {
    format!("users/{uid}/perfil")
}

pub fn pets(owner_uid: &str) -> String {
    format!("users/{owner_uid}/mascotas")
}

pub fn pet(owner_uid: &str, pet_id: &str) -> String {
    format!("users/{owner_uid}/mascotas/{pet_id}")
}

pub const USERS: &str = "users";
pub const VETERINARIANS: &str = "veterinarios";
pub const APPOINTMENTS: &str = "citas";

pub fn appointment(id: &str) -> String {
    format!("citas/{id}")
}

pub fn veterinarian(uid: &str) -> String {
    format!("veterinarios/{uid}")
}
