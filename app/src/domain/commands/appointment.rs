use serde::{Deserialize, Serialize};
use shared::{Appointment, AppointmentStatus};

/// A client's booking request.
///
/// `status` is accepted for wire compatibility with the submitting form but is
/// ignored: a created appointment always starts out pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestAppointmentCommand {
    pub client_uid: String,
    pub client_email: String,
    pub client_name: Option<String>,
    pub client_surname: Option<String>,
    pub pet_id: String,
    pub vet_uid: String,
    /// ISO date (`YYYY-MM-DD`).
    pub date: String,
    /// Half-hour slot label.
    pub slot: String,
    pub reason: String,
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Clone)]
pub struct RequestAppointmentResult {
    pub appointment: Appointment,
}

/// A veterinarian confirming a pending appointment. `notes` overrides the
/// fixed confirmation marker when present.
#[derive(Debug, Clone)]
pub struct ConfirmAppointmentCommand {
    pub appointment_id: String,
    pub vet_uid: String,
    pub notes: Option<String>,
}

/// A veterinarian cancelling a pending appointment.
#[derive(Debug, Clone)]
pub struct CancelAppointmentCommand {
    pub appointment_id: String,
    pub vet_uid: String,
}

#[derive(Debug, Clone)]
pub struct TriageAppointmentResult {
    pub appointment: Appointment,
}

/// A client removing their own appointment outright. This is a deletion, not
/// a status transition.
#[derive(Debug, Clone)]
pub struct DeleteAppointmentCommand {
    pub appointment_id: String,
    pub client_uid: String,
}

#[derive(Debug, Clone)]
pub struct DeleteAppointmentResult {
    pub deleted_id: String,
}

#[derive(Debug, Clone)]
pub struct ListAppointmentsResult {
    pub appointments: Vec<Appointment>,
}
