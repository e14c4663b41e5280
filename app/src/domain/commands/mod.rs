//! Command and result types for the domain services. One module per entity
//! family, mirroring the service split.

pub mod account;
pub mod appointment;
pub mod pet;
pub mod profile;
