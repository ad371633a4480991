//! Shelter and pet records.
//!
//! # Responsibility
//! - Define pets and the shelters that house them.
//! - Carry the optional self-referential parent link for pet lineage.
//!
//! # Invariants
//! - Every pet references an existing breed.
//! - A pet has at most one parent and never appears in its own ancestor
//!   chain; the reverse (children-of) lookup is derived, not stored.

use crate::model::taxonomy::BreedId;
use serde::{Deserialize, Serialize};

/// Stable identifier for a shelter row.
pub type ShelterId = i64;
/// Stable identifier for a pet row.
pub type PetId = i64;

/// An animal shelter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shelter {
    pub id: ShelterId,
    pub name: String,
    /// Optional website text, stored verbatim.
    pub website: Option<String>,
}

/// A pet known to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub age: Option<i64>,
    /// Tri-state on purpose: unknown, not adopted, adopted.
    pub adopted: Option<bool>,
    pub breed_id: BreedId,
    /// A pet may be unsheltered.
    pub shelter_id: Option<ShelterId>,
    /// Parent pet, if recorded. Root of a lineage when `None`.
    pub parent_id: Option<PetId>,
}

/// Draft input for creating one pet.
///
/// Identity is assigned by the persistence engine on create; drafts carry
/// everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPet {
    pub name: String,
    pub age: Option<i64>,
    pub adopted: Option<bool>,
    pub breed_id: BreedId,
    pub shelter_id: Option<ShelterId>,
    pub parent_id: Option<PetId>,
}

impl NewPet {
    /// Creates a minimal draft: a named pet of a breed, everything else
    /// unset.
    pub fn named(name: impl Into<String>, breed_id: BreedId) -> Self {
        Self {
            name: name.into(),
            age: None,
            adopted: None,
            breed_id,
            shelter_id: None,
            parent_id: None,
        }
    }
}
