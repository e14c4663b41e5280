use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};
use shared::Pet;

use super::paths;
use crate::gateway::StoreGateway;

/// Repository for pets, scoped under their owning client
/// (`users/{uid}/mascotas/{petId}`).
#[derive(Clone)]
pub struct PetRepository {
    store: Arc<dyn StoreGateway>,
}

impl PetRepository {
    pub fn new(store: Arc<dyn StoreGateway>) -> Self {
        Self { store }
    }

    pub fn list(&self, owner_uid: &str) -> Result<Vec<Pet>> {
        let Some(tree) = self
            .store
            .get(&paths::pets(owner_uid))
            .with_context(|| format!("failed to read pets of client {owner_uid}"))?
        else {
            return Ok(Vec::new());
        };
        let map = tree.as_object().context("pet collection is not an object")?;
        let mut pets = Vec::with_capacity(map.len());
        for (id, value) in map {
            let mut pet: Pet = serde_json::from_value(value.clone())
                .with_context(|| format!("malformed pet record '{id}'"))?;
            pet.id = Some(id.clone());
            pets.push(pet);
        }
        debug!("found {} pet(s) for client {owner_uid}", pets.len());
        Ok(pets)
    }

    pub fn get(&self, owner_uid: &str, pet_id: &str) -> Result<Option<Pet>> {
        let Some(value) = self
            .store
            .get(&paths::pet(owner_uid, pet_id))
            .with_context(|| format!("failed to read pet '{pet_id}'"))?
        else {
            return Ok(None);
        };
        let mut pet: Pet = serde_json::from_value(value)
            .with_context(|| format!("malformed pet record '{pet_id}'"))?;
        pet.id = Some(pet_id.to_string());
        Ok(Some(pet))
    }

    /// Persist a new pet under a store-generated key. Returns the key.
    pub fn create(&self, pet: &Pet) -> Result<String> {
        let key = self
            .store
            .push(&paths::pets(&pet.owner_uid))
            .context("failed to generate pet key")?;
        let body = serde_json::to_value(pet).context("failed to serialize pet")?;
        self.store
            .set(&paths::pet(&pet.owner_uid, &key), body)
            .with_context(|| format!("failed to store pet '{key}'"))?;
        info!("stored pet '{}' ({key}) for client {}", pet.name, pet.owner_uid);
        Ok(key)
    }

    /// Full overwrite keyed by (owner, pet id).
    pub fn update(&self, pet: &Pet) -> Result<()> {
        let id = pet.id.as_deref().context("cannot update a pet without a key")?;
        let body = serde_json::to_value(pet).context("failed to serialize pet")?;
        self.store
            .set(&paths::pet(&pet.owner_uid, id), body)
            .with_context(|| format!("failed to update pet '{id}'"))?;
        Ok(())
    }

    pub fn delete(&self, owner_uid: &str, pet_id: &str) -> Result<()> {
        self.store
            .remove(&paths::pet(owner_uid, pet_id))
            .with_context(|| format!("failed to delete pet '{pet_id}'"))?;
        info!("deleted pet '{pet_id}' of client {owner_uid}");
        Ok(())
    }
}
