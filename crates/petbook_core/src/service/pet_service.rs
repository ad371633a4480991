//! Pet intake and lineage use-case service.
//!
//! # Responsibility
//! - Provide shelter intake and offspring registration entry points.
//! - Expose the family read model (pet, parent, children) in one call.
//!
//! # Invariants
//! - Offspring inherit the parent's breed and start unadopted.
//! - Shelter lookup by name reuses the first existing row.

use crate::model::pet::{NewPet, Pet, PetId, Shelter};
use crate::repo::pet_repo::{PetListQuery, PetRepository};
use crate::repo::{RepoError, RepoResult};

/// Family read model for one pet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyLine {
    pub pet: Pet,
    /// Parent, if one is recorded.
    pub parent: Option<Pet>,
    /// Direct children, `name ASC, id ASC`.
    pub children: Vec<Pet>,
}

/// Use-case service wrapper for shelter and pet operations.
pub struct PetService<R: PetRepository> {
    repo: R,
}

impl<R: PetRepository> PetService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the shelter with the given name, creating it if absent.
    pub fn register_shelter(&self, name: &str, website: Option<&str>) -> RepoResult<Shelter> {
        if let Some(existing) = self.repo.find_shelter_by_name(name)? {
            return Ok(existing);
        }
        self.repo.create_shelter(name, website)
    }

    /// Creates one pet from a draft.
    pub fn intake_pet(&self, draft: &NewPet) -> RepoResult<Pet> {
        self.repo.create_pet(draft)
    }

    /// Registers one offspring of an existing pet.
    ///
    /// # Contract
    /// - Breed is inherited from the parent.
    /// - `adopted` starts as `Some(false)`.
    pub fn register_offspring(
        &self,
        parent_id: PetId,
        name: &str,
        age: Option<i64>,
    ) -> RepoResult<Pet> {
        let parent = self
            .repo
            .get_pet(parent_id)?
            .ok_or(RepoError::PetNotFound(parent_id))?;

        self.repo.create_pet(&NewPet {
            name: name.to_string(),
            age,
            adopted: Some(false),
            breed_id: parent.breed_id,
            shelter_id: None,
            parent_id: Some(parent.id),
        })
    }

    /// Marks one pet as adopted.
    pub fn mark_adopted(&self, pet_id: PetId) -> RepoResult<()> {
        self.repo.set_adopted(pet_id, true)
    }

    /// Loads one pet together with its parent and direct children.
    pub fn family_of(&self, pet_id: PetId) -> RepoResult<FamilyLine> {
        let pet = self
            .repo
            .get_pet(pet_id)?
            .ok_or(RepoError::PetNotFound(pet_id))?;
        let parent = self.repo.parent_of(pet_id)?;
        let children = self.repo.children_of(pet_id)?;
        Ok(FamilyLine {
            pet,
            parent,
            children,
        })
    }

    /// Lists pets using filter and pagination options.
    pub fn list_pets(&self, query: &PetListQuery) -> RepoResult<Vec<Pet>> {
        self.repo.list_pets(query)
    }
}
