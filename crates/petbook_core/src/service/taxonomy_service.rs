//! Taxonomy use-case service.
//!
//! # Responsibility
//! - Provide find-or-create entry points for species, breeds, and traits.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - `ensure_*` operations reuse the first existing row with the given
//!   name instead of inserting duplicates.
//! - Service APIs never bypass repository reference checks.

use crate::model::taxonomy::{Breed, BreedId, BreedTrait, Species, SpeciesId, TraitId};
use crate::repo::taxonomy_repo::TaxonomyRepository;
use crate::repo::RepoResult;

/// Use-case service wrapper for taxonomy operations.
pub struct TaxonomyService<R: TaxonomyRepository> {
    repo: R,
}

impl<R: TaxonomyRepository> TaxonomyService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the species with the given name, creating it if absent.
    pub fn ensure_species(&self, name: &str) -> RepoResult<Species> {
        if let Some(existing) = self.repo.find_species_by_name(name)? {
            return Ok(existing);
        }
        self.repo.create_species(name)
    }

    /// Returns the breed with the given name within one species, creating
    /// it if absent.
    pub fn ensure_breed(&self, name: &str, species_id: SpeciesId) -> RepoResult<Breed> {
        if let Some(existing) = self.repo.find_breed(name, species_id)? {
            return Ok(existing);
        }
        self.repo.create_breed(name, species_id)
    }

    /// Returns the trait with the given name, creating it if absent.
    pub fn ensure_trait(&self, name: &str) -> RepoResult<BreedTrait> {
        if let Some(existing) = self.repo.find_trait_by_name(name)? {
            return Ok(existing);
        }
        self.repo.create_trait(name)
    }

    /// Ensures a trait by name and links it to the breed.
    pub fn tag_breed(&self, breed_id: BreedId, trait_name: &str) -> RepoResult<BreedTrait> {
        let tagged = self.ensure_trait(trait_name)?;
        self.repo.link_breed_trait(breed_id, tagged.id)?;
        Ok(tagged)
    }

    /// Replaces the full trait set of one breed.
    pub fn set_breed_traits(&self, breed_id: BreedId, trait_ids: &[TraitId]) -> RepoResult<()> {
        self.repo.set_breed_traits(breed_id, trait_ids)
    }

    /// Lists the traits linked to one breed.
    pub fn traits_of_breed(&self, breed_id: BreedId) -> RepoResult<Vec<BreedTrait>> {
        self.repo.traits_of_breed(breed_id)
    }

    /// Lists the breeds linked to one trait.
    pub fn breeds_with_trait(&self, trait_id: TraitId) -> RepoResult<Vec<Breed>> {
        self.repo.breeds_with_trait(trait_id)
    }

    /// Lists all breeds.
    pub fn list_breeds(&self) -> RepoResult<Vec<Breed>> {
        self.repo.list_breeds()
    }

    /// Counts all traits.
    pub fn trait_count(&self) -> RepoResult<i64> {
        self.repo.count_traits()
    }
}
