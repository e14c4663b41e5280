//! # Storage Layer
//!
//! Typed repositories over the [`StoreGateway`](crate::gateway::StoreGateway)
//! document tree. Each repository owns the path construction and the
//! `serde_json::Value` conversion for one entity family; the domain services
//! above never touch raw paths or values.

pub mod account_repository;
pub mod appointment_repository;
pub mod paths;
pub mod pet_repository;
pub mod profile_repository;

#[cfg(test)]
pub mod test_utils;

pub use account_repository::AccountRepository;
pub use appointment_repository::AppointmentRepository;
pub use pet_repository::PetRepository;
pub use profile_repository::ProfileRepository;
