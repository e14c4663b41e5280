use shared::Pet;

/// Container for the client's pets.
#[derive(Debug, Clone, Default)]
pub struct PetState {
    pub pets: Vec<Pet>,
    pub loading: bool,
    pub add_loading: bool,
    pub update_loading: bool,
    pub delete_loading: bool,
    pub error: Option<String>,
}

impl PetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetch_requested(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn fetch_succeeded(&mut self, pets: Vec<Pet>) {
        self.loading = false;
        self.pets = pets;
    }

    pub fn fetch_failed(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub fn add_requested(&mut self) {
        self.add_loading = true;
        self.error = None;
    }

    pub fn add_succeeded(&mut self, pet: Pet) {
        self.add_loading = false;
        self.pets.push(pet);
    }

    pub fn add_failed(&mut self, message: String) {
        self.add_loading = false;
        self.error = Some(message);
    }

    pub fn update_requested(&mut self) {
        self.update_loading = true;
        self.error = None;
    }

    pub fn update_succeeded(&mut self, pet: Pet) {
        self.update_loading = false;
        if let Some(existing) = self.pets.iter_mut().find(|p| p.id == pet.id) {
            *existing = pet;
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

    pub fn delete_succeeded(&mut self, pet_id: &str) {
        self.delete_loading = false;
        self.pets.retain(|p| p.id.as_deref() != Some(pet_id));
    }

    pub fn delete_failed(&mut self, message: String) {
        self.delete_loading = false;
        self.error = Some(message);
    }

    pub fn has_pet(&self) -> bool {
        !self.pets.is_empty()
    }

    /// The booking action is only available while a pet is on file.
    pub fn can_request_appointment(&self) -> bool {
        self.has_pet()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Session teardown: drop the data and the error, leave flags alone.
    pub fn clear(&mut self) {
        self.pets.clear();
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Gender, Species};

    fn pet(id: &str) -> Pet {
        Pet {
            id: Some(id.into()),
            name: "Rex".into(),
            species: Species::Dog,
            breed: "Mestizo".into(),
            age: 2,
            weight: None,
            color: None,
            chip: None,
            gender: Gender::Male,
            neutered: None,
            notes: None,
            birth_date: None,
            owner_uid: "u1".into(),
        }
    }

    #[test]
    fn deleting_the_only_pet_disables_booking() {
        let mut state = PetState::new();
        state.fetch_succeeded(vec![pet("p1")]);
        assert!(state.has_pet());
        assert!(state.can_request_appointment());

        state.delete_requested();
        state.delete_succeeded("p1");
        assert!(!state.has_pet());
        assert!(!state.can_request_appointment());

        // Registering a new pet re-enables the action.
        state.add_requested();
        state.add_succeeded(pet("p2"));
        assert!(state.can_request_appointment());
    }

    #[test]
    fn update_replaces_by_key() {
        let mut state = PetState::new();
        state.fetch_succeeded(vec![pet("p1"), pet("p2")]);
        let mut changed = pet("p2");
        changed.age = 7;
        state.update_requested();
        state.update_succeeded(changed);
        assert_eq!(state.pets[0].age, 2);
        assert_eq!(state.pets[1].age, 7);
    }

    #[test]
    fn failure_leaves_collection_untouched() {
        let mut state = PetState::new();
        state.fetch_succeeded(vec![pet("p1")]);
        state.add_requested();
        state.add_failed("sin conexión".into());
        assert_eq!(state.pets.len(), 1);
        assert!(!state.add_loading);
        assert_eq!(state.error.as_deref(), Some("sin conexión"));

        state.clear_error();
        assert!(state.error.is_none());
    }
}
