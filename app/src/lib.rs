//! # Veterinary Clinic Client Core
//!
//! Client-side logic for a small clinic management app: clients keep a pet
//! profile and request appointments, veterinarians triage the appointments
//! assigned to them, and an administrator manages role assignments.
//!
//! Persistence and authentication are delegated to external gateways (a
//! path-addressed document store and an identity provider); everything in this
//! crate is orchestration on top of those seams:
//!
//! - [`gateway`] — the `StoreGateway` / `IdentityGateway` traits plus
//!   in-memory implementations.
//! - [`storage`] — typed repositories over the document store.
//! - [`domain`] — command/service layer: appointment lifecycle, pets,
//!   profiles, accounts, and the admin role-change staging buffer.
//! - [`state`] — per-entity state containers with request/success/failure
//!   transitions and derived loading/error flags.
//! - [`app`] — the coordinator wiring config, services, and state together.

pub mod app;
pub mod auth;
pub mod config;
pub mod domain;
pub mod gateway;
pub mod state;
pub mod storage;
