use shared::{Appointment, AppointmentStatus};

/// Client-side filters over the loaded appointment list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFilters {
    pub status: Option<AppointmentStatus>,
    /// ISO date (`YYYY-MM-DD`).
    pub date: Option<String>,
    pub vet_uid: Option<String>,
}

/// Container for the appointment list of the signed-in client or veterinarian.
#[derive(Debug, Clone, Default)]
pub struct AppointmentState {
    pub appointments: Vec<Appointment>,
    pub loading: bool,
    pub add_loading: bool,
    pub update_loading: bool,
    pub delete_loading: bool,
    pub error: Option<String>,
    pub filters: AppointmentFilters,
}

impl AppointmentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetch_requested(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn fetch_succeeded(&mut self, appointments: Vec<Appointment>) {
        self.loading = false;
        self.appointments = appointments;
    }

    pub fn fetch_failed(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub fn add_requested(&mut self) {
        self.add_loading = true;
        self.error = None;
    }

    pub fn add_succeeded(&mut self, appointment: Appointment) {
        self.add_loading = false;
        self.appointments.push(appointment);
    }

    pub fn add_failed(&mut self, message: String) {
        self.add_loading = false;
        self.error = Some(message);
    }

    pub fn update_requested(&mut self) {
        self.update_loading = true;
        self.error = None;
    }

    pub fn update_succeeded(&mut self, appointment: Appointment) {
        self.update_loading = false;
        if let Some(existing) = self
            .appointments
            .iter_mut()
            .find(|a| a.id == appointment.id)
        {
            *existing = appointment;
        }
    }

    pub fn update_failed(&mut self, message: String) {
        self.update_loading = false;
        self.error = Some(message);
    }

    pub fn delete_requested(&mut self) {
        self.delete_loading = true;
        self.error = None;
    }

    pub fn delete_succeeded(&mut self, appointment_id: &str) {
        self.delete_loading = false;
        self.appointments
            .retain(|a| a.id.as_deref() != Some(appointment_id));
    }

    pub fn delete_failed(&mut self, message: String) {
        self.delete_loading = false;
        self.error = Some(message);
    }

    pub fn set_filters(&mut self, filters: AppointmentFilters) {
        self.filters = filters;
    }

    pub fn clear_filters(&mut self) {
        self.filters = AppointmentFilters::default();
    }

    /// The loaded list narrowed by the active filters.
    pub fn filtered(&self) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| {
                self.filters.status.map_or(true, |s| a.status == s)
                    && self
                        .filters
                        .date
                        .as_deref()
                        .map_or(true, |d| a.date == d)
                    && self
                        .filters
                        .vet_uid
                        .as_deref()
                        .map_or(true, |v| a.vet_uid.as_deref() == Some(v))
            })
            .collect()
    }

    /// Whether confirm/cancel actions are offered for an appointment: only
    /// while it is still pending.
    pub fn can_triage(appointment: &Appointment) -> bool {
        appointment.status == AppointmentStatus::Pending
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Session teardown: drop the data and the error, leave flags alone.
    pub fn clear(&mut self) {
        self.appointments.clear();
        self.error = None;
    }
}
