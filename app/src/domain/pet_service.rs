use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::info;

use crate::domain::commands::pet::{
    CreatePetCommand, CreatePetResult, DeletePetCommand, DeletePetResult, ListPetsResult,
    UpdatePetCommand, UpdatePetResult,
};
use crate::gateway::StoreGateway;
use crate::storage::PetRepository;

/// Service for the pets a client keeps on file.
#[derive(Clone)]
pub struct PetService {
    pets: PetRepository,
}

impl PetService {
    pub fn new(store: Arc<dyn StoreGateway>) -> Self {
        Self {
            pets: PetRepository::new(store),
        }
    }

    pub fn list(&self, owner_uid: &str) -> Result<ListPetsResult> {
        info!("listing pets of client {owner_uid}");
        let pets = self.pets.list(owner_uid)?;
        Ok(ListPetsResult { pets })
    }

    pub fn create(&self, command: CreatePetCommand) -> Result<CreatePetResult> {
        let mut pet = command.pet;
        info!("registering pet '{}' for client {}", pet.name, pet.owner_uid);
        Self::validate(&pet.name, &pet.breed, &pet.owner_uid)?;
        pet.name = pet.name.trim().to_string();
        pet.breed = pet.breed.trim().to_string();
        let key = self.pets.create(&pet)?;
        pet.id = Some(key);
        Ok(CreatePetResult { pet })
    }

    /// Full overwrite keyed by (owner, pet id). The pet must already exist.
    pub fn update(&self, command: UpdatePetCommand) -> Result<UpdatePetResult> {
        let mut pet = command.pet;
        let id = pet
            .id
            .clone()
            .ok_or_else(|| anyhow!("La mascota no tiene identificador"))?;
        info!("updating pet '{id}' of client {}", pet.owner_uid);
        Self::validate(&pet.name, &pet.breed, &pet.owner_uid)?;
        self.pets
            .get(&pet.owner_uid, &id)?
            .ok_or_else(|| anyhow!("Mascota no encontrada: {id}"))?;
        pet.name = pet.name.trim().to_string();
        pet.breed = pet.breed.trim().to_string();
        self.pets.update(&pet)?;
        Ok(UpdatePetResult { pet })
    }

    pub fn delete(&self, command: DeletePetCommand) -> Result<DeletePetResult> {
        info!(
            "deleting pet '{}' of client {}",
            command.pet_id, command.owner_uid
        );
        self.pets
            .get(&command.owner_uid, &command.pet_id)?
            .ok_or_else(|| anyhow!("Mascota no encontrada: {}", command.pet_id))?;
        self.pets.delete(&command.owner_uid, &command.pet_id)?;
        Ok(DeletePetResult {
            deleted_id: command.pet_id,
        })
    }

    fn validate(name: &str, breed: &str, owner_uid: &str) -> Result<()> {
        if owner_uid.trim().is_empty() {
            return Err(anyhow!("Falta el identificador del cliente"));
        }
        if name.trim().is_empty() {
            return Err(anyhow!("El nombre de la mascota no puede estar vacío"));
        }
        if breed.trim().is_empty() {
            return Err(anyhow!("La raza no puede estar vacía"));
        }
        Ok(())
    }
}
