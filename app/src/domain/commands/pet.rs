use shared::Pet;

#[derive(Debug, Clone)]
pub struct CreatePetCommand {
    /// New pet with `id` unset; `owner_uid` names the owning client.
    pub pet: Pet,
}

#[derive(Debug, Clone)]
pub struct CreatePetResult {
    pub pet: Pet,
}

#[derive(Debug, Clone)]
pub struct UpdatePetCommand {
    /// Full replacement record; `id` must be set.
    pub pet: Pet,
}

#[derive(Debug, Clone)]
pub struct UpdatePetResult {
    pub pet: Pet,
}

#[derive(Debug, Clone)]
pub struct DeletePetCommand {
    pub owner_uid: String,
    pub pet_id: String,
}

#[derive(Debug, Clone)]
pub struct DeletePetResult {
    pub deleted_id: String,
}

#[derive(Debug, Clone)]
pub struct ListPetsResult {
    pub pets: Vec<Pet>,
}
