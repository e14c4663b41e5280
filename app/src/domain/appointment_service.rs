use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use shared::{is_valid_slot, Appointment, AppointmentStatus};

use crate::domain::commands::appointment::{
    CancelAppointmentCommand, ConfirmAppointmentCommand, DeleteAppointmentCommand,
    DeleteAppointmentResult, ListAppointmentsResult, RequestAppointmentCommand,
    RequestAppointmentResult, TriageAppointmentResult,
};
use crate::gateway::StoreGateway;
use crate::storage::{AccountRepository, AppointmentRepository, PetRepository};

/// Observation marker stamped when a veterinarian confirms an appointment
/// without writing their own note.
pub const CONFIRMED_BY_VET: &str = "Confirmada por el veterinario";
/// Observation marker stamped when a veterinarian cancels an appointment.
pub const CANCELLED_BY_VET: &str = "Cancelada por el veterinario";

/// Service enforcing the appointment lifecycle: who may move an appointment
/// between states and what each transition stamps onto the record.
///
/// Legal transitions are checked against the stored record, not just the
/// caller's view, so a stale or hostile caller cannot move a terminal
/// appointment.
#[derive(Clone)]
pub struct AppointmentService {
    appointments: AppointmentRepository,
    pets: PetRepository,
    accounts: AccountRepository,
}

impl AppointmentService {
    pub fn new(store: Arc<dyn StoreGateway>) -> Self {
        Self {
            appointments: AppointmentRepository::new(store.clone()),
            pets: PetRepository::new(store.clone()),
            accounts: AccountRepository::new(store),
        }
    }

    /// Appointments owned by a client. No bookings is an empty list, not an
    /// error.
    pub fn list_for_client(&self, client_uid: &str) -> Result<ListAppointmentsResult> {
        info!("listing appointments of client {client_uid}");
        let appointments = self.appointments.list_for_client(client_uid)?;
        Ok(ListAppointmentsResult { appointments })
    }

    /// Appointments assigned to a veterinarian.
    pub fn list_for_vet(&self, vet_uid: &str) -> Result<ListAppointmentsResult> {
        info!("listing appointments of veterinarian {vet_uid}");
        let appointments = self.appointments.list_for_vet(vet_uid)?;
        Ok(ListAppointmentsResult { appointments })
    }

    /// Client books an appointment. The record always starts `Pending`, no
    /// matter what status the submitted payload carries, and the client must
    /// have the named pet on file.
    pub fn request(&self, command: RequestAppointmentCommand) -> Result<RequestAppointmentResult> {
        info!(
            "appointment request from client {} for pet {}",
            command.client_uid, command.pet_id
        );
        self.validate_request(&command)?;

        let pet = self
            .pets
            .get(&command.client_uid, &command.pet_id)?
            .ok_or_else(|| anyhow!("No hay ninguna mascota registrada con ese identificador"))?;

        let vet = self
            .accounts
            .veterinarian(&command.vet_uid)?
            .ok_or_else(|| anyhow!("El veterinario seleccionado no existe"))?;

        if let Some(status) = command.status {
            if status != AppointmentStatus::Pending {
                warn!("booking payload carried status '{status}', forcing 'pendiente'");
            }
        }

        let mut appointment = Appointment {
            id: None,
            client_uid: command.client_uid,
            client_email: command.client_email,
            client_name: command.client_name,
            client_surname: command.client_surname,
            pet_id: command.pet_id,
            // Display names are denormalized at creation time so lists render
            // without extra lookups; they are not identity.
            pet_name: pet.name,
            vet_uid: Some(vet.uid.clone()),
            vet_name: Some(vet.full_name()),
            date: command.date,
            slot: command.slot,
            reason: command.reason.trim().to_string(),
            status: AppointmentStatus::Pending,
            notes: None,
            created_at: Utc::now().to_rfc3339(),
            updated_at: None,
        };
        let key = self.appointments.create(&appointment)?;
        appointment.id = Some(key);
        Ok(RequestAppointmentResult { appointment })
    }

    /// Veterinarian accepts a pending appointment.
    pub fn confirm(&self, command: ConfirmAppointmentCommand) -> Result<TriageAppointmentResult> {
        let notes = command
            .notes
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| CONFIRMED_BY_VET.to_string());
        self.triage(
            &command.appointment_id,
            &command.vet_uid,
            AppointmentStatus::Confirmed,
            notes,
        )
    }

    /// Veterinarian declines a pending appointment.
    pub fn cancel(&self, command: CancelAppointmentCommand) -> Result<TriageAppointmentResult> {
        self.triage(
            &command.appointment_id,
            &command.vet_uid,
            AppointmentStatus::Cancelled,
            CANCELLED_BY_VET.to_string(),
        )
    }

    fn triage(
        &self,
        appointment_id: &str,
        vet_uid: &str,
        target: AppointmentStatus,
        notes: String,
    ) -> Result<TriageAppointmentResult> {
        info!("veterinarian {vet_uid} moving appointment {appointment_id} to '{target}'");
        let mut appointment = self
            .appointments
            .get(appointment_id)?
            .ok_or_else(|| anyhow!("Cita no encontrada: {appointment_id}"))?;

        // Assigned-or-assignable: an appointment already routed to another
        // veterinarian is off limits.
        if let Some(assigned) = appointment.vet_uid.as_deref() {
            if assigned != vet_uid {
                return Err(anyhow!(
                    "La cita {appointment_id} está asignada a otro veterinario"
                ));
            }
        }

        if !appointment.status.can_transition_to(target) {
            return Err(anyhow!(
                "Transición ilegal de '{}' a '{target}' en la cita {appointment_id}",
                appointment.status
            ));
        }

        let updated_at = Utc::now().to_rfc3339();
        self.appointments
            .set_status(appointment_id, target, &notes, &updated_at)
            .context("status transition was not persisted")?;

        appointment.status = target;
        appointment.notes = Some(notes);
        appointment.updated_at = Some(updated_at);
        if appointment.vet_uid.is_none() {
            appointment.vet_uid = Some(vet_uid.to_string());
        }
        Ok(TriageAppointmentResult { appointment })
    }

    /// Client removes their own appointment outright. Offered for pending and
    /// confirmed bookings; a record a veterinarian already cancelled stays
    /// visible.
    pub fn delete(&self, command: DeleteAppointmentCommand) -> Result<DeleteAppointmentResult> {
        info!(
            "client {} deleting appointment {}",
            command.client_uid, command.appointment_id
        );
        let appointment = self
            .appointments
            .get(&command.appointment_id)?
            .ok_or_else(|| anyhow!("Cita no encontrada: {}", command.appointment_id))?;

        if appointment.client_uid != command.client_uid {
            return Err(anyhow!("Solo el cliente propietario puede eliminar la cita"));
        }
        if appointment.status == AppointmentStatus::Cancelled {
            return Err(anyhow!("Una cita cancelada no se puede eliminar"));
        }

        self.appointments.delete(&command.appointment_id)?;
        Ok(DeleteAppointmentResult {
            deleted_id: command.appointment_id,
        })
    }

    fn validate_request(&self, command: &RequestAppointmentCommand) -> Result<()> {
        if command.client_uid.trim().is_empty() {
            return Err(anyhow!("Falta el identificador del cliente"));
        }
        if command.vet_uid.trim().is_empty() {
            return Err(anyhow!("Selecciona un veterinario"));
        }
        if command.reason.trim().is_empty() {
            return Err(anyhow!("Indica el motivo de la cita"));
        }
        NaiveDate::parse_from_str(&command.date, "%Y-%m-%d")
            .map_err(|_| anyhow!("Fecha no válida, usa el formato YYYY-MM-DD"))?;
        if !is_valid_slot(&command.slot) {
            return Err(anyhow!("La hora '{}' no es una franja disponible", command.slot));
        }
        Ok(())
    }
}
