//! Species, breed, and trait records.
//!
//! # Responsibility
//! - Define the taxonomy side of the domain: which animals exist and what
//!   their breeds are like.
//!
//! # Invariants
//! - Every breed belongs to exactly one species.
//! - Breed/trait membership is an unordered set with no link attributes.

use serde::{Deserialize, Serialize};

/// Stable identifier for a species row.
pub type SpeciesId = i64;
/// Stable identifier for a breed row.
pub type BreedId = i64;
/// Stable identifier for a trait row.
pub type TraitId = i64;

/// An animal species, e.g. "Dog".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub id: SpeciesId,
    pub name: String,
}

/// A breed within one species, e.g. "Dalmatian".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breed {
    pub id: BreedId,
    pub name: String,
    /// Owning species. Required; a breed never exists without one.
    pub species_id: SpeciesId,
}

/// A temperament or behavior trait breeds can share, e.g. "Dog Friendly".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedTrait {
    pub id: TraitId,
    pub name: String,
}
