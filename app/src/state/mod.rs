//! # Entity State Containers
//!
//! One container per entity family, each a uniform shape: the collection (or
//! singleton), independent in-progress flags per request kind, and a single
//! last-error slot. Every request follows the same three-phase contract:
//!
//! - `*_requested`: the matching flag goes true, the error clears.
//! - `*_succeeded`: the flag goes false and the collection is mutated
//!   (replace-all on fetch, append on create, replace-by-key on update,
//!   remove-by-key on delete).
//! - `*_failed`: the flag goes false, the error is set, the collection is
//!   untouched.
//!
//! `clear()` empties the collection and the error for session teardown; it
//! deliberately leaves in-progress flags alone, since in-flight requests are
//! never cancelled.

pub mod app_state;
pub mod appointment_state;
pub mod pet_state;
pub mod profile_state;
pub mod session_state;

pub use app_state::AppState;
pub use appointment_state::{AppointmentFilters, AppointmentState};
pub use pet_state::PetState;
pub use profile_state::ProfileState;
pub use session_state::SessionState;
