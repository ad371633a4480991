//! Adoption use-case service.
//!
//! # Responsibility
//! - Register people, accepting raw phone input at the boundary.
//! - Record and release pet ownership; manage nicknames.
//!
//! # Invariants
//! - Raw phone input is normalized before it reaches a repository write.
//! - A duplicate `(pet, person)` adoption surfaces as `AlreadyRecorded`,
//!   leaving the original row untouched.
//! - Nicknames are stored trimmed and must not be blank.

use crate::model::person::{NewPerson, Ownership, Person, PersonId, PetNickname};
use crate::model::pet::{Pet, PetId};
use crate::model::phone::{PhoneNumber, PhoneNumberError};
use crate::repo::person_repo::PersonRepository;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Request model for registering one person.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterPersonRequest {
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i64>,
    /// Raw phone input as entered, e.g. `"555 243 9988"`.
    pub phone: Option<String>,
}

/// Errors from adoption service operations.
#[derive(Debug)]
pub enum AdoptionServiceError {
    /// Phone input failed normalization.
    Phone(PhoneNumberError),
    /// Target person does not exist.
    PersonNotFound(PersonId),
    /// Target pet does not exist.
    PetNotFound(PetId),
    /// The `(pet, person)` pair already has an ownership row.
    AlreadyRecorded { pet_id: PetId, person_id: PersonId },
    /// Nickname is blank after trim.
    BlankNickname,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for AdoptionServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Phone(err) => write!(f, "{err}"),
            Self::PersonNotFound(id) => write!(f, "person not found: {id}"),
            Self::PetNotFound(id) => write!(f, "pet not found: {id}"),
            Self::AlreadyRecorded { pet_id, person_id } => write!(
                f,
                "adoption already recorded for pet {pet_id} and person {person_id}"
            ),
            Self::BlankNickname => write!(f, "nickname must not be blank"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AdoptionServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Phone(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PhoneNumberError> for AdoptionServiceError {
    fn from(value: PhoneNumberError) -> Self {
        Self::Phone(value)
    }
}

impl From<RepoError> for AdoptionServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Phone(err) => Self::Phone(err),
            RepoError::PersonNotFound(id) => Self::PersonNotFound(id),
            RepoError::PetNotFound(id) => Self::PetNotFound(id),
            RepoError::OwnershipExists { pet_id, person_id } => {
                Self::AlreadyRecorded { pet_id, person_id }
            }
            other => Self::Repo(other),
        }
    }
}

/// Adoption service facade over repository implementations.
pub struct AdoptionService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> AdoptionService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers one person, normalizing the raw phone input first.
    pub fn register_person(
        &self,
        request: &RegisterPersonRequest,
    ) -> Result<Person, AdoptionServiceError> {
        let phone = match request.phone.as_deref() {
            Some(raw) => Some(PhoneNumber::parse(raw)?),
            None => None,
        };

        let person = self.repo.create_person(&NewPerson {
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            age: request.age,
            phone,
        })?;
        Ok(person)
    }

    /// Replaces one person's phone from raw input.
    ///
    /// A failed parse leaves the stored value unchanged.
    pub fn change_phone(&self, person_id: PersonId, raw: &str) -> Result<(), AdoptionServiceError> {
        let phone = PhoneNumber::parse(raw)?;
        self.repo.update_phone(person_id, &phone)?;
        Ok(())
    }

    /// Loads one person by id.
    pub fn get_person(&self, person_id: PersonId) -> Result<Person, AdoptionServiceError> {
        self.repo
            .get_person(person_id)?
            .ok_or(AdoptionServiceError::PersonNotFound(person_id))
    }

    /// Records one adoption with optional tenure.
    pub fn adopt(
        &self,
        pet_id: PetId,
        person_id: PersonId,
        years: Option<i64>,
    ) -> Result<Ownership, AdoptionServiceError> {
        let ownership = self.repo.record_ownership(pet_id, person_id, years)?;
        Ok(ownership)
    }

    /// Loads the ownership row between one person and one pet, if any.
    pub fn ownership_of(
        &self,
        person_id: PersonId,
        pet_id: PetId,
    ) -> Result<Option<Ownership>, AdoptionServiceError> {
        let ownership = self.repo.ownership_between(pet_id, person_id)?;
        Ok(ownership)
    }

    /// Releases one adoption. Returns whether a row existed.
    pub fn surrender(
        &self,
        pet_id: PetId,
        person_id: PersonId,
    ) -> Result<bool, AdoptionServiceError> {
        let released = self.repo.release_ownership(pet_id, person_id)?;
        Ok(released)
    }

    /// Lists the pets one person owns.
    pub fn household(&self, person_id: PersonId) -> Result<Vec<Pet>, AdoptionServiceError> {
        let pets = self.repo.pets_of_person(person_id)?;
        Ok(pets)
    }

    /// Lists the people owning one pet.
    pub fn owners_of_pet(&self, pet_id: PetId) -> Result<Vec<Person>, AdoptionServiceError> {
        let people = self.repo.owners_of_pet(pet_id)?;
        Ok(people)
    }

    /// Stores one nickname a person gave a pet.
    pub fn give_nickname(
        &self,
        pet_id: PetId,
        person_id: PersonId,
        nickname: &str,
    ) -> Result<PetNickname, AdoptionServiceError> {
        let trimmed = nickname.trim();
        if trimmed.is_empty() {
            return Err(AdoptionServiceError::BlankNickname);
        }

        let stored = self.repo.add_nickname(pet_id, person_id, trimmed)?;
        Ok(stored)
    }

    /// Lists all nicknames of one pet in insertion order.
    pub fn nicknames_for_pet(
        &self,
        pet_id: PetId,
    ) -> Result<Vec<PetNickname>, AdoptionServiceError> {
        let nicknames = self.repo.nicknames_for_pet(pet_id)?;
        Ok(nicknames)
    }
}
