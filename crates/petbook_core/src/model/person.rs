//! Person, ownership, and nickname records.
//!
//! # Responsibility
//! - Define people and their links to pets.
//! - Keep the phone write path behind the normalizing value object.
//!
//! # Invariants
//! - A stored phone, when present, is canonical (see [`PhoneNumber`]).
//! - One `(pet, person)` pair has at most one ownership row.
//! - Nicknames carry no uniqueness; the same pair may add many.

use crate::model::pet::PetId;
use crate::model::phone::{PhoneNumber, PhoneResult};
use serde::{Deserialize, Serialize};

/// Stable identifier for a person row.
pub type PersonId = i64;
/// Stable identifier for an ownership row.
pub type OwnershipId = i64;
/// Stable identifier for a nickname row.
pub type NicknameId = i64;

/// A person who can own and nickname pets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i64>,
    /// Canonical 10-digit phone, if one was ever set.
    pub phone: Option<PhoneNumber>,
}

impl Person {
    /// Returns first and last name joined by a single space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Normalizes and stores a raw phone input.
    ///
    /// On error the previously stored value is left untouched.
    pub fn set_phone(&mut self, input: &str) -> PhoneResult<()> {
        self.phone = Some(PhoneNumber::parse(input)?);
        Ok(())
    }

    /// Returns the hyphenated display form of the stored phone, if any.
    pub fn phone_display(&self) -> Option<String> {
        self.phone.as_ref().map(PhoneNumber::to_string)
    }
}

/// Draft input for creating one person.
///
/// The phone arrives already normalized; callers accepting raw text parse
/// it first so an invalid number never reaches a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i64>,
    pub phone: Option<PhoneNumber>,
}

/// Association row linking one pet to one person, with tenure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
    pub id: OwnershipId,
    pub pet_id: PetId,
    pub person_id: PersonId,
    /// Years of ownership; may be unrecorded.
    pub years: Option<i64>,
}

/// One nickname a person gave a pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetNickname {
    pub id: NicknameId,
    pub pet_id: PetId,
    pub person_id: PersonId,
    pub nickname: String,
}
