use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::{Map, Value};
use shared::{Appointment, AppointmentStatus};

use super::paths;
use crate::gateway::StoreGateway;

/// Repository for the flat `citas` collection.
///
/// The store offers no server-side queries, so list operations read the whole
/// collection and filter client-side, exactly as the views need them.
#[derive(Clone)]
pub struct AppointmentRepository {
    store: Arc<dyn StoreGateway>,
}

impl AppointmentRepository {
    pub fn new(store: Arc<dyn StoreGateway>) -> Self {
        Self { store }
    }

    fn list_all(&self) -> Result<Vec<Appointment>> {
        let Some(tree) = self
            .store
            .get(paths::APPOINTMENTS)
            .context("failed to read appointment collection")?
        else {
            return Ok(Vec::new());
        };
        let map = tree
            .as_object()
            .context("appointment collection is not an object")?;
        let mut appointments = Vec::with_capacity(map.len());
        for (id, value) in map {
            let mut appointment: Appointment = serde_json::from_value(value.clone())
                .with_context(|| format!("malformed appointment record '{id}'"))?;
            appointment.id = Some(id.clone());
            appointments.push(appointment);
        }
        Ok(appointments)
    }

    /// All appointments owned by a client.
    pub fn list_for_client(&self, client_uid: &str) -> Result<Vec<Appointment>> {
        let appointments: Vec<Appointment> = self
            .list_all()?
            .into_iter()
            .filter(|a| a.client_uid == client_uid)
            .collect();
        debug!("found {} appointment(s) for client {client_uid}", appointments.len());
        Ok(appointments)
    }

    /// All appointments assigned to a veterinarian.
    pub fn list_for_vet(&self, vet_uid: &str) -> Result<Vec<Appointment>> {
        let appointments: Vec<Appointment> = self
            .list_all()?
            .into_iter()
            .filter(|a| a.vet_uid.as_deref() == Some(vet_uid))
            .collect();
        debug!("found {} appointment(s) for vet {vet_uid}", appointments.len());
        Ok(appointments)
    }

    pub fn get(&self, id: &str) -> Result<Option<Appointment>> {
        let Some(value) = self
            .store
            .get(&paths::appointment(id))
            .with_context(|| format!("failed to read appointment '{id}'"))?
        else {
            return Ok(None);
        };
        let mut appointment: Appointment = serde_json::from_value(value)
            .with_context(|| format!("malformed appointment record '{id}'"))?;
        appointment.id = Some(id.to_string());
        Ok(Some(appointment))
    }

    /// Persist a new appointment under a store-generated key. Returns the key.
    pub fn create(&self, appointment: &Appointment) -> Result<String> {
        let key = self
            .store
            .push(paths::APPOINTMENTS)
            .context("failed to generate appointment key")?;
        let body = serde_json::to_value(appointment)
            .context("failed to serialize appointment")?;
        self.store
            .set(&paths::appointment(&key), body)
            .with_context(|| format!("failed to store appointment '{key}'"))?;
        info!("stored appointment '{key}' for client {}", appointment.client_uid);
        Ok(key)
    }

    /// Partial status write: status, notes, and the modified instant, leaving
    /// the rest of the record (notably `creadaEn`) untouched.
    pub fn set_status(
        &self,
        id: &str,
        status: AppointmentStatus,
        notes: &str,
        updated_at: &str,
    ) -> Result<()> {
        let mut partial = Map::new();
        partial.insert("estado".into(), Value::String(status.as_wire().into()));
        partial.insert("observaciones".into(), Value::String(notes.into()));
        partial.insert("actualizadaEn".into(), Value::String(updated_at.into()));
        self.store
            .update(&paths::appointment(id), partial)
            .with_context(|| format!("failed to update status of appointment '{id}'"))?;
        info!("appointment '{id}' moved to '{status}'");
        Ok(())
    }

    /// Hard delete, distinct from a status transition.
    pub fn delete(&self, id: &str) -> Result<()> {
        self.store
            .remove(&paths::appointment(id))
            .with_context(|| format!("failed to delete appointment '{id}'"))?;
        info!("deleted appointment '{id}'");
        Ok(())
    }
}
