//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per aggregate.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Write paths validate referenced rows before SQL mutations and return
//!   semantic not-found errors instead of raw constraint failures.
//! - Multi-statement write operations run inside one immediate transaction.
//! - Repository APIs surface the unique `(pet, person)` ownership pair as
//!   [`RepoError::OwnershipExists`], never as a transport error.

use crate::db::DbError;
use crate::model::person::PersonId;
use crate::model::pet::{PetId, ShelterId};
use crate::model::phone::PhoneNumberError;
use crate::model::taxonomy::{BreedId, SpeciesId, TraitId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod person_repo;
pub mod pet_repo;
pub mod taxonomy_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Shared repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Phone input failed normalization.
    Phone(PhoneNumberError),
    SpeciesNotFound(SpeciesId),
    BreedNotFound(BreedId),
    TraitNotFound(TraitId),
    ShelterNotFound(ShelterId),
    PetNotFound(PetId),
    PersonNotFound(PersonId),
    /// The unique `(pet, person)` ownership pair already has a row.
    OwnershipExists { pet_id: PetId, person_id: PersonId },
    /// Requested parent assignment would cycle the lineage.
    ParentageCycle { pet_id: PetId, parent_id: PetId },
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Phone(err) => write!(f, "{err}"),
            Self::SpeciesNotFound(id) => write!(f, "species not found: {id}"),
            Self::BreedNotFound(id) => write!(f, "breed not found: {id}"),
            Self::TraitNotFound(id) => write!(f, "trait not found: {id}"),
            Self::ShelterNotFound(id) => write!(f, "shelter not found: {id}"),
            Self::PetNotFound(id) => write!(f, "pet not found: {id}"),
            Self::PersonNotFound(id) => write!(f, "person not found: {id}"),
            Self::OwnershipExists { pet_id, person_id } => write!(
                f,
                "ownership already recorded for pet {pet_id} and person {person_id}"
            ),
            Self::ParentageCycle { pet_id, parent_id } => write!(
                f,
                "assigning parent {parent_id} to pet {pet_id} would create a cycle"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Phone(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<PhoneNumberError> for RepoError {
    fn from(value: PhoneNumberError) -> Self {
        Self::Phone(value)
    }
}
