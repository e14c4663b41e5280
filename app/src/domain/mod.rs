//! # Domain Layer
//!
//! Command/service modules, one per entity family, plus the admin role-change
//! staging workflow. Services validate first, then talk to the repositories;
//! a validation failure never reaches the remote store.

pub mod account_service;
pub mod appointment_service;
pub mod commands;
pub mod pet_service;
pub mod profile_service;
pub mod role_staging;

pub use account_service::AccountService;
pub use appointment_service::AppointmentService;
pub use pet_service::PetService;
pub use profile_service::ProfileService;
pub use role_staging::{CommitOutcome, RoleAdmin, RoleStagingBuffer};
