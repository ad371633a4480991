//! Shelter/pet repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide persistence APIs for shelters and the pets they house.
//! - Own pet lineage maintenance: parent assignment and derived lookups.
//!
//! # Invariants
//! - Every pet write references an existing breed; shelter and parent
//!   references are checked when present.
//! - Parent assignment never creates a cycle; the candidate's ancestor
//!   chain is walked inside the same immediate transaction as the update.
//! - Child listing is deterministic: `name ASC, id ASC`.

use crate::model::pet::{NewPet, Pet, PetId, Shelter, ShelterId};
use crate::model::taxonomy::BreedId;
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

const PET_SELECT_SQL: &str = "SELECT
    id,
    name,
    age,
    adopted,
    breed_id,
    shelter_id,
    parent_id
FROM pets";

/// Query options for listing pets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetListQuery {
    pub breed_id: Option<BreedId>,
    pub shelter_id: Option<ShelterId>,
    pub adopted: Option<bool>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for shelter and pet operations.
pub trait PetRepository {
    /// Creates one shelter and returns the stored record.
    fn create_shelter(&self, name: &str, website: Option<&str>) -> RepoResult<Shelter>;
    /// Loads one shelter by id.
    fn get_shelter(&self, id: ShelterId) -> RepoResult<Option<Shelter>>;
    /// Finds the first shelter with the given name.
    fn find_shelter_by_name(&self, name: &str) -> RepoResult<Option<Shelter>>;
    /// Lists all shelters.
    fn list_shelters(&self) -> RepoResult<Vec<Shelter>>;

    /// Creates one pet from a draft, checking every reference first.
    fn create_pet(&self, draft: &NewPet) -> RepoResult<Pet>;
    /// Loads one pet by id.
    fn get_pet(&self, id: PetId) -> RepoResult<Option<Pet>>;
    /// Lists pets using filter and pagination options.
    fn list_pets(&self, query: &PetListQuery) -> RepoResult<Vec<Pet>>;
    /// Updates the adoption flag of one pet.
    fn set_adopted(&self, id: PetId, adopted: bool) -> RepoResult<()>;

    /// Assigns a parent to one pet, refusing cycles.
    fn set_parent(&self, pet_id: PetId, parent_id: PetId) -> RepoResult<()>;
    /// Loads the parent of one pet, if recorded.
    fn parent_of(&self, pet_id: PetId) -> RepoResult<Option<Pet>>;
    /// Lists the direct children of one pet.
    fn children_of(&self, pet_id: PetId) -> RepoResult<Vec<Pet>>;
    /// Lists the ancestor chain of one pet, nearest first.
    fn ancestors_of(&self, pet_id: PetId) -> RepoResult<Vec<Pet>>;
}

/// SQLite-backed shelter/pet repository.
pub struct SqlitePetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePetRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PetRepository for SqlitePetRepository<'_> {
    fn create_shelter(&self, name: &str, website: Option<&str>) -> RepoResult<Shelter> {
        self.conn.execute(
            "INSERT INTO shelters (name, website) VALUES (?1, ?2);",
            params![name, website],
        )?;
        Ok(Shelter {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            website: website.map(str::to_string),
        })
    }

    fn get_shelter(&self, id: ShelterId) -> RepoResult<Option<Shelter>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, website FROM shelters WHERE id = ?1;")?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_shelter_row(row)?));
        }
        Ok(None)
    }

    fn find_shelter_by_name(&self, name: &str) -> RepoResult<Option<Shelter>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, website
             FROM shelters
             WHERE name = ?1
             ORDER BY id ASC
             LIMIT 1;",
        )?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_shelter_row(row)?));
        }
        Ok(None)
    }

    fn list_shelters(&self) -> RepoResult<Vec<Shelter>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, website FROM shelters ORDER BY name ASC, id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_shelter_row(row)?);
        }
        Ok(items)
    }

    fn create_pet(&self, draft: &NewPet) -> RepoResult<Pet> {
        if !breed_exists(self.conn, draft.breed_id)? {
            return Err(RepoError::BreedNotFound(draft.breed_id));
        }
        if let Some(shelter_id) = draft.shelter_id {
            if !shelter_exists(self.conn, shelter_id)? {
                return Err(RepoError::ShelterNotFound(shelter_id));
            }
        }
        if let Some(parent_id) = draft.parent_id {
            if !pet_exists(self.conn, parent_id)? {
                return Err(RepoError::PetNotFound(parent_id));
            }
        }

        self.conn.execute(
            "INSERT INTO pets (
                name,
                age,
                adopted,
                breed_id,
                shelter_id,
                parent_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                draft.name.as_str(),
                draft.age,
                draft.adopted.map(bool_to_int),
                draft.breed_id,
                draft.shelter_id,
                draft.parent_id,
            ],
        )?;

        Ok(Pet {
            id: self.conn.last_insert_rowid(),
            name: draft.name.clone(),
            age: draft.age,
            adopted: draft.adopted,
            breed_id: draft.breed_id,
            shelter_id: draft.shelter_id,
            parent_id: draft.parent_id,
        })
    }

    fn get_pet(&self, id: PetId) -> RepoResult<Option<Pet>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PET_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_pet_row(row)?));
        }
        Ok(None)
    }

    fn list_pets(&self, query: &PetListQuery) -> RepoResult<Vec<Pet>> {
        let mut sql = format!("{PET_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(breed_id) = query.breed_id {
            sql.push_str(" AND breed_id = ?");
            bind_values.push(Value::Integer(breed_id));
        }
        if let Some(shelter_id) = query.shelter_id {
            sql.push_str(" AND shelter_id = ?");
            bind_values.push(Value::Integer(shelter_id));
        }
        if let Some(adopted) = query.adopted {
            sql.push_str(" AND adopted = ?");
            bind_values.push(Value::Integer(bool_to_int(adopted)));
        }

        sql.push_str(" ORDER BY name ASC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut pets = Vec::new();
        while let Some(row) = rows.next()? {
            pets.push(parse_pet_row(row)?);
        }
        Ok(pets)
    }

    fn set_adopted(&self, id: PetId, adopted: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE pets SET adopted = ?2 WHERE id = ?1;",
            params![id, bool_to_int(adopted)],
        )?;
        if changed == 0 {
            return Err(RepoError::PetNotFound(id));
        }
        Ok(())
    }

    fn set_parent(&self, pet_id: PetId, parent_id: PetId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !pet_exists(&tx, pet_id)? {
            return Err(RepoError::PetNotFound(pet_id));
        }
        if !pet_exists(&tx, parent_id)? {
            return Err(RepoError::PetNotFound(parent_id));
        }
        // The candidate parent and its whole ancestor chain must not
        // contain the pet itself; this also covers parent == pet.
        if lineage_contains(&tx, parent_id, pet_id)? {
            return Err(RepoError::ParentageCycle { pet_id, parent_id });
        }

        tx.execute(
            "UPDATE pets SET parent_id = ?2 WHERE id = ?1;",
            params![pet_id, parent_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn parent_of(&self, pet_id: PetId) -> RepoResult<Option<Pet>> {
        let pet = self
            .get_pet(pet_id)?
            .ok_or(RepoError::PetNotFound(pet_id))?;
        match pet.parent_id {
            Some(parent_id) => self.get_pet(parent_id),
            None => Ok(None),
        }
    }

    fn children_of(&self, pet_id: PetId) -> RepoResult<Vec<Pet>> {
        if !pet_exists(self.conn, pet_id)? {
            return Err(RepoError::PetNotFound(pet_id));
        }

        let mut stmt = self.conn.prepare(&format!(
            "{PET_SELECT_SQL}
             WHERE parent_id = ?1
             ORDER BY name ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([pet_id])?;
        let mut pets = Vec::new();
        while let Some(row) = rows.next()? {
            pets.push(parse_pet_row(row)?);
        }
        Ok(pets)
    }

    fn ancestors_of(&self, pet_id: PetId) -> RepoResult<Vec<Pet>> {
        if !pet_exists(self.conn, pet_id)? {
            return Err(RepoError::PetNotFound(pet_id));
        }

        let mut stmt = self.conn.prepare(
            "WITH RECURSIVE lineage(id, depth) AS (
                SELECT parent_id, 1
                FROM pets
                WHERE id = ?1
                  AND parent_id IS NOT NULL
                UNION ALL
                SELECT p.parent_id, l.depth + 1
                FROM pets p
                INNER JOIN lineage l ON p.id = l.id
                WHERE p.parent_id IS NOT NULL
            )
            SELECT
                p.id,
                p.name,
                p.age,
                p.adopted,
                p.breed_id,
                p.shelter_id,
                p.parent_id
            FROM pets p
            INNER JOIN lineage l ON p.id = l.id
            ORDER BY l.depth ASC;",
        )?;
        let mut rows = stmt.query([pet_id])?;
        let mut pets = Vec::new();
        while let Some(row) = rows.next()? {
            pets.push(parse_pet_row(row)?);
        }
        Ok(pets)
    }
}

fn lineage_contains(conn: &Connection, start_id: PetId, needle_id: PetId) -> RepoResult<bool> {
    let found: i64 = conn.query_row(
        "WITH RECURSIVE lineage(id) AS (
            SELECT ?1
            UNION ALL
            SELECT p.parent_id
            FROM pets p
            INNER JOIN lineage l ON p.id = l.id
            WHERE p.parent_id IS NOT NULL
        )
        SELECT EXISTS(SELECT 1 FROM lineage WHERE id = ?2);",
        params![start_id, needle_id],
        |row| row.get(0),
    )?;
    Ok(found == 1)
}

fn breed_exists(conn: &Connection, id: BreedId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM breeds WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn shelter_exists(conn: &Connection, id: ShelterId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM shelters WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn pet_exists(conn: &Connection, id: PetId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM pets WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_shelter_row(row: &Row<'_>) -> RepoResult<Shelter> {
    Ok(Shelter {
        id: row.get("id")?,
        name: row.get("name")?,
        website: row.get("website")?,
    })
}

fn parse_pet_row(row: &Row<'_>) -> RepoResult<Pet> {
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

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
