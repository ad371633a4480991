//! Taxonomy repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide persistence APIs for species, breeds, and traits.
//! - Own breed/trait link maintenance with atomic replace semantics.
//!
//! # Invariants
//! - Every breed write references an existing species.
//! - `set_breed_traits` replaces the whole link set in one transaction.
//! - Link rows are deduplicated; re-linking an existing pair is a no-op.
//! - Listings are deterministic: `name ASC, id ASC`.

use crate::model::taxonomy::{Breed, BreedId, BreedTrait, Species, SpeciesId, TraitId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

/// Repository interface for taxonomy operations.
pub trait TaxonomyRepository {
    /// Creates one species and returns the stored record.
    fn create_species(&self, name: &str) -> RepoResult<Species>;
    /// Loads one species by id.
    fn get_species(&self, id: SpeciesId) -> RepoResult<Option<Species>>;
    /// Finds the first species with the given name.
    fn find_species_by_name(&self, name: &str) -> RepoResult<Option<Species>>;
    /// Lists all species.
    fn list_species(&self) -> RepoResult<Vec<Species>>;

    /// Creates one breed under an existing species.
    fn create_breed(&self, name: &str, species_id: SpeciesId) -> RepoResult<Breed>;
    /// Loads one breed by id.
    fn get_breed(&self, id: BreedId) -> RepoResult<Option<Breed>>;
    /// Finds the first breed with the given name within one species.
    fn find_breed(&self, name: &str, species_id: SpeciesId) -> RepoResult<Option<Breed>>;
    /// Lists all breeds.
    fn list_breeds(&self) -> RepoResult<Vec<Breed>>;
    /// Lists the breeds belonging to one species.
    fn breeds_of_species(&self, species_id: SpeciesId) -> RepoResult<Vec<Breed>>;

    /// Creates one trait and returns the stored record.
    fn create_trait(&self, name: &str) -> RepoResult<BreedTrait>;
    /// Loads one trait by id.
    fn get_trait(&self, id: TraitId) -> RepoResult<Option<BreedTrait>>;
    /// Finds the first trait with the given name.
    fn find_trait_by_name(&self, name: &str) -> RepoResult<Option<BreedTrait>>;
    /// Lists all traits.
    fn list_traits(&self) -> RepoResult<Vec<BreedTrait>>;
    /// Counts all traits.
    fn count_traits(&self) -> RepoResult<i64>;

    /// Links one breed to one trait; already-linked pairs are kept as-is.
    fn link_breed_trait(&self, breed_id: BreedId, trait_id: TraitId) -> RepoResult<()>;
    /// Replaces the full trait set of one breed in one transaction.
    fn set_breed_traits(&self, breed_id: BreedId, trait_ids: &[TraitId]) -> RepoResult<()>;
    /// Lists the traits linked to one breed.
    fn traits_of_breed(&self, breed_id: BreedId) -> RepoResult<Vec<BreedTrait>>;
    /// Lists the breeds linked to one trait.
    fn breeds_with_trait(&self, trait_id: TraitId) -> RepoResult<Vec<Breed>>;
}

/// SQLite-backed taxonomy repository.
pub struct SqliteTaxonomyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaxonomyRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaxonomyRepository for SqliteTaxonomyRepository<'_> {
    fn create_species(&self, name: &str) -> RepoResult<Species> {
        self.conn
            .execute("INSERT INTO species (name) VALUES (?1);", [name])?;
        Ok(Species {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    fn get_species(&self, id: SpeciesId) -> RepoResult<Option<Species>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM species WHERE id = ?1;")?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_species_row(row)?));
        }
        Ok(None)
    }

    fn find_species_by_name(&self, name: &str) -> RepoResult<Option<Species>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name
             FROM species
             WHERE name = ?1
             ORDER BY id ASC
             LIMIT 1;",
        )?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_species_row(row)?));
        }
        Ok(None)
    }

    fn list_species(&self) -> RepoResult<Vec<Species>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM species ORDER BY name ASC, id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_species_row(row)?);
        }
        Ok(items)
    }

    fn create_breed(&self, name: &str, species_id: SpeciesId) -> RepoResult<Breed> {
        if !species_exists(self.conn, species_id)? {
            return Err(RepoError::SpeciesNotFound(species_id));
        }

        self.conn.execute(
            "INSERT INTO breeds (name, species_id) VALUES (?1, ?2);",
            params![name, species_id],
        )?;
        Ok(Breed {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            species_id,
        })
    }

    fn get_breed(&self, id: BreedId) -> RepoResult<Option<Breed>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, species_id FROM breeds WHERE id = ?1;")?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_breed_row(row)?));
        }
        Ok(None)
    }

    fn find_breed(&self, name: &str, species_id: SpeciesId) -> RepoResult<Option<Breed>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, species_id
             FROM breeds
             WHERE name = ?1
               AND species_id = ?2
             ORDER BY id ASC
             LIMIT 1;",
        )?;
        let mut rows = stmt.query(params![name, species_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_breed_row(row)?));
        }
        Ok(None)
    }

    fn list_breeds(&self) -> RepoResult<Vec<Breed>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, species_id
             FROM breeds
             ORDER BY name ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_breed_row(row)?);
        }
        Ok(items)
    }

    fn breeds_of_species(&self, species_id: SpeciesId) -> RepoResult<Vec<Breed>> {
        if !species_exists(self.conn, species_id)? {
            return Err(RepoError::SpeciesNotFound(species_id));
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, name, species_id
             FROM breeds
             WHERE species_id = ?1
             ORDER BY name ASC, id ASC;",
        )?;
        let mut rows = stmt.query([species_id])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_breed_row(row)?);
        }
        Ok(items)
    }

    fn create_trait(&self, name: &str) -> RepoResult<BreedTrait> {
        self.conn
            .execute("INSERT INTO traits (name) VALUES (?1);", [name])?;
        Ok(BreedTrait {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    fn get_trait(&self, id: TraitId) -> RepoResult<Option<BreedTrait>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM traits WHERE id = ?1;")?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_trait_row(row)?));
        }
        Ok(None)
    }

    fn find_trait_by_name(&self, name: &str) -> RepoResult<Option<BreedTrait>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name
             FROM traits
             WHERE name = ?1
             ORDER BY id ASC
             LIMIT 1;",
        )?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_trait_row(row)?));
        }
        Ok(None)
    }

    fn list_traits(&self) -> RepoResult<Vec<BreedTrait>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM traits ORDER BY name ASC, id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_trait_row(row)?);
        }
        Ok(items)
    }

    fn count_traits(&self) -> RepoResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM traits;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn link_breed_trait(&self, breed_id: BreedId, trait_id: TraitId) -> RepoResult<()> {
        if !breed_exists(self.conn, breed_id)? {
            return Err(RepoError::BreedNotFound(breed_id));
        }
        if !trait_exists(self.conn, trait_id)? {
            return Err(RepoError::TraitNotFound(trait_id));
        }

        self.conn.execute(
            "INSERT OR IGNORE INTO breed_traits (breed_id, trait_id) VALUES (?1, ?2);",
            params![breed_id, trait_id],
        )?;
        Ok(())
    }

    fn set_breed_traits(&self, breed_id: BreedId, trait_ids: &[TraitId]) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !breed_exists(&tx, breed_id)? {
            return Err(RepoError::BreedNotFound(breed_id));
        }
        for trait_id in trait_ids {
            if !trait_exists(&tx, *trait_id)? {
                return Err(RepoError::TraitNotFound(*trait_id));
            }
        }

        tx.execute("DELETE FROM breed_traits WHERE breed_id = ?1;", [breed_id])?;
        for trait_id in trait_ids {
            tx.execute(
                "INSERT OR IGNORE INTO breed_traits (breed_id, trait_id) VALUES (?1, ?2);",
                params![breed_id, trait_id],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn traits_of_breed(&self, breed_id: BreedId) -> RepoResult<Vec<BreedTrait>> {
        if !breed_exists(self.conn, breed_id)? {
            return Err(RepoError::BreedNotFound(breed_id));
        }

        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.name
             FROM breed_traits bt
             INNER JOIN traits t ON t.id = bt.trait_id
             WHERE bt.breed_id = ?1
             ORDER BY t.name ASC, t.id ASC;",
        )?;
        let mut rows = stmt.query([breed_id])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_trait_row(row)?);
        }
        Ok(items)
    }

    fn breeds_with_trait(&self, trait_id: TraitId) -> RepoResult<Vec<Breed>> {
        if !trait_exists(self.conn, trait_id)? {
            return Err(RepoError::TraitNotFound(trait_id));
        }

        let mut stmt = self.conn.prepare(
            "SELECT b.id, b.name, b.species_id
             FROM breed_traits bt
             INNER JOIN breeds b ON b.id = bt.breed_id
             WHERE bt.trait_id = ?1
             ORDER BY b.name ASC, b.id ASC;",
        )?;
        let mut rows = stmt.query([trait_id])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_breed_row(row)?);
        }
        Ok(items)
    }
}

fn species_exists(conn: &Connection, id: SpeciesId) -> RepoResult<bool> {
    row_exists(conn, "SELECT EXISTS(SELECT 1 FROM species WHERE id = ?1);", id)
}

fn breed_exists(conn: &Connection, id: BreedId) -> RepoResult<bool> {
    row_exists(conn, "SELECT EXISTS(SELECT 1 FROM breeds WHERE id = ?1);", id)
}

fn trait_exists(conn: &Connection, id: TraitId) -> RepoResult<bool> {
    row_exists(conn, "SELECT EXISTS(SELECT 1 FROM traits WHERE id = ?1);", id)
}

fn row_exists(conn: &Connection, sql: &str, id: i64) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(sql, [id], |row| row.get(0))?;
    Ok(exists == 1)
}

fn parse_species_row(row: &Row<'_>) -> RepoResult<Species> {
    Ok(Species {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn parse_breed_row(row: &Row<'_>) -> RepoResult<Breed> {
    Ok(Breed {
        id: row.get("id")?,
        name: row.get("name")?,
        species_id: row.get("species_id")?,
    })
}

fn parse_trait_row(row: &Row<'_>) -> RepoResult<BreedTrait> {
    Ok(BreedTrait {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
