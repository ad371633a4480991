//! Person/ownership repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide persistence APIs for people, pet ownership, and nicknames.
//! - Map the unique `(pet, person)` constraint to a semantic error.
//!
//! # Invariants
//! - Phone values are normalized before any SQL write; the read path
//!   rejects non-canonical persisted values instead of masking them.
//! - Ownership rows are unique per `(pet, person)` pair.
//! - Nickname listing preserves insertion order (`id ASC`).

use crate::model::person::{NewPerson, Ownership, Person, PersonId, PetNickname};
use crate::model::pet::{Pet, PetId};
use crate::model::phone::PhoneNumber;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    age,
    phone
FROM people";

/// Repository interface for person, ownership, and nickname operations.
pub trait PersonRepository {
    /// Creates one person and returns the stored record.
    fn create_person(&self, draft: &NewPerson) -> RepoResult<Person>;
    /// Loads one person by id.
    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>>;
    /// Lists all people.
    fn list_people(&self) -> RepoResult<Vec<Person>>;
    /// Replaces the stored phone of one person.
    fn update_phone(&self, id: PersonId, phone: &PhoneNumber) -> RepoResult<()>;

    /// Records one pet/person ownership with optional tenure.
    fn record_ownership(
        &self,
        pet_id: PetId,
        person_id: PersonId,
        years: Option<i64>,
    ) -> RepoResult<Ownership>;
    /// Loads the ownership row for one `(pet, person)` pair, if any.
    fn ownership_between(
        &self,
        pet_id: PetId,
        person_id: PersonId,
    ) -> RepoResult<Option<Ownership>>;
    /// Removes the ownership row for one pair. Returns whether one existed.
    fn release_ownership(&self, pet_id: PetId, person_id: PersonId) -> RepoResult<bool>;
    /// Lists the pets one person owns.
    fn pets_of_person(&self, person_id: PersonId) -> RepoResult<Vec<Pet>>;
    /// Lists the people owning one pet.
    fn owners_of_pet(&self, pet_id: PetId) -> RepoResult<Vec<Person>>;

    /// Stores one nickname a person gave a pet.
    fn add_nickname(
        &self,
        pet_id: PetId,
        person_id: PersonId,
        nickname: &str,
    ) -> RepoResult<PetNickname>;
    /// Lists all nicknames of one pet in insertion order.
    fn nicknames_for_pet(&self, pet_id: PetId) -> RepoResult<Vec<PetNickname>>;
}

/// SQLite-backed person/ownership repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn create_person(&self, draft: &NewPerson) -> RepoResult<Person> {
        self.conn.execute(
            "INSERT INTO people (
                first_name,
                last_name,
                age,
                phone
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                draft.first_name.as_str(),
                draft.last_name.as_str(),
                draft.age,
                draft.phone.as_ref().map(PhoneNumber::as_digits),
            ],
        )?;

        Ok(Person {
            id: self.conn.last_insert_rowid(),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            age: draft.age,
            phone: draft.phone.clone(),
        })
    }

    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }
        Ok(None)
    }

    fn list_people(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PERSON_SELECT_SQL} ORDER BY last_name ASC, first_name ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }
        Ok(people)
    }

    fn update_phone(&self, id: PersonId, phone: &PhoneNumber) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE people SET phone = ?2 WHERE id = ?1;",
            params![id, phone.as_digits()],
        )?;
        if changed == 0 {
            return Err(RepoError::PersonNotFound(id));
        }
        Ok(())
    }

    fn record_ownership(
        &self,
        pet_id: PetId,
        person_id: PersonId,
        years: Option<i64>,
    ) -> RepoResult<Ownership> {
        if !pet_exists(self.conn, pet_id)? {
            return Err(RepoError::PetNotFound(pet_id));
        }
        if !person_exists(self.conn, person_id)? {
            return Err(RepoError::PersonNotFound(person_id));
        }

        // References were checked above, so a constraint failure on this
        // insert can only be the unique (pet_id, person_id) pair.
        let inserted = self.conn.execute(
            "INSERT INTO ownerships (pet_id, person_id, years) VALUES (?1, ?2, ?3);",
            params![pet_id, person_id, years],
        );
        match inserted {
            Ok(_) => Ok(Ownership {
                id: self.conn.last_insert_rowid(),
                pet_id,
                person_id,
                years,
            }),
            Err(err) if is_constraint_violation(&err) => {
                Err(RepoError::OwnershipExists { pet_id, person_id })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn ownership_between(
        &self,
        pet_id: PetId,
        person_id: PersonId,
    ) -> RepoResult<Option<Ownership>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, pet_id, person_id, years
             FROM ownerships
             WHERE pet_id = ?1
               AND person_id = ?2;",
        )?;
        let mut rows = stmt.query(params![pet_id, person_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_ownership_row(row)?));
        }
        Ok(None)
    }

    fn release_ownership(&self, pet_id: PetId, person_id: PersonId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM ownerships WHERE pet_id = ?1 AND person_id = ?2;",
            params![pet_id, person_id],
        )?;
        Ok(changed > 0)
    }

    fn pets_of_person(&self, person_id: PersonId) -> RepoResult<Vec<Pet>> {
        if !person_exists(self.conn, person_id)? {
            return Err(RepoError::PersonNotFound(person_id));
        }

        let mut stmt = self.conn.prepare(
            "SELECT
                p.id,
                p.name,
                p.age,
                p.adopted,
                p.breed_id,
                p.shelter_id,
                p.parent_id
             FROM ownerships o
             INNER JOIN pets p ON p.id = o.pet_id
             WHERE o.person_id = ?1
             ORDER BY p.name ASC, p.id ASC;",
        )?;
        let mut rows = stmt.query([person_id])?;
        let mut pets = Vec::new();
        while let Some(row) = rows.next()? {
            pets.push(parse_joined_pet_row(row)?);
        }
        Ok(pets)
    }

    fn owners_of_pet(&self, pet_id: PetId) -> RepoResult<Vec<Person>> {
        if !pet_exists(self.conn, pet_id)? {
            return Err(RepoError::PetNotFound(pet_id));
        }

        let mut stmt = self.conn.prepare(
            "SELECT
                pe.id,
                pe.first_name,
                pe.last_name,
                pe.age,
                pe.phone
             FROM ownerships o
             INNER JOIN people pe ON pe.id = o.person_id
             WHERE o.pet_id = ?1
             ORDER BY pe.last_name ASC, pe.first_name ASC, pe.id ASC;",
        )?;
        let mut rows = stmt.query([pet_id])?;
        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }
        Ok(people)
    }

    fn add_nickname(
        &self,
        pet_id: PetId,
        person_id: PersonId,
        nickname: &str,
    ) -> RepoResult<PetNickname> {
        if !pet_exists(self.conn, pet_id)? {
            return Err(RepoError::PetNotFound(pet_id));
        }
        if !person_exists(self.conn, person_id)? {
            return Err(RepoError::PersonNotFound(person_id));
        }

        self.conn.execute(
            "INSERT INTO pet_nicknames (pet_id, person_id, nickname) VALUES (?1, ?2, ?3);",
            params![pet_id, person_id, nickname],
        )?;
        Ok(PetNickname {
            id: self.conn.last_insert_rowid(),
            pet_id,
            person_id,
            nickname: nickname.to_string(),
        })
    }

    fn nicknames_for_pet(&self, pet_id: PetId) -> RepoResult<Vec<PetNickname>> {
        if !pet_exists(self.conn, pet_id)? {
            return Err(RepoError::PetNotFound(pet_id));
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, pet_id, person_id, nickname
             FROM pet_nicknames
             WHERE pet_id = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([pet_id])?;
        let mut nicknames = Vec::new();
        while let Some(row) = rows.next()? {
            nicknames.push(parse_nickname_row(row)?);
        }
        Ok(nicknames)
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn pet_exists(conn: &Connection, id: PetId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM pets WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn person_exists(conn: &Connection, id: PersonId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM people WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let phone = match row.get::<_, Option<String>>("phone")? {
        Some(value) => Some(PhoneNumber::parse(&value).map_err(|err| {
            RepoError::InvalidData(format!(
                "invalid phone value `{value}` in people.phone: {err}"
            ))
        })?),
        None => None,
    };

    Ok(Person {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        age: row.get("age")?,
        phone,
    })
}

fn parse_ownership_row(row: &Row<'_>) -> RepoResult<Ownership> {
    Ok(Ownership {
        id: row.get("id")?,
        pet_id: row.get("pet_id")?,
        person_id: row.get("person_id")?,
        years: row.get("years")?,
    })
}

fn parse_nickname_row(row: &Row<'_>) -> RepoResult<PetNickname> {
    Ok(PetNickname {
        id: row.get("id")?,
        pet_id: row.get("pet_id")?,
        person_id: row.get("person_id")?,
        nickname: row.get("nickname")?,
    })
}

fn parse_joined_pet_row(row: &Row<'_>) -> RepoResult<Pet> {
    let adopted = match row.get::<_, Option<i64>>("adopted")? {
        None => None,
        Some(0) => Some(false),
        Some(1) => Some(true),
        Some(other) => {
            return Err(RepoError::InvalidData(format!(
                "invalid adopted value `{other}` in pets.adopted"
            )));
        }
    };

    Ok(Pet {
        id: row.get("id")?,
        name: row.get("name")?,
        age: row.get("age")?,
        adopted,
        breed_id: row.get("breed_id")?,
        shelter_id: row.get("shelter_id")?,
        parent_id: row.get("parent_id")?,
    })
}
