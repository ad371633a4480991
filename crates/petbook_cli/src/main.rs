//! Seed/demo entry point.
//!
//! # Responsibility
//! - Initialize the schema and populate a small sample menagerie.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Pass a database path as the first argument to seed a file; without
//! arguments an in-memory database is used and discarded on exit. The
//! schema is always dropped and recreated before seeding.

use petbook_core::db::{open_db, open_db_in_memory, reset_db};
use petbook_core::{
    AdoptionService, NewPet, PetService, RegisterPersonRequest, SqlitePersonRepository,
    SqlitePetRepository, SqliteTaxonomyRepository, TaxonomyService,
};
use std::error::Error;

fn main() {
    if let Err(err) = run() {
        eprintln!("petbook seed failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut conn = match std::env::args().nth(1) {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    reset_db(&mut conn)?;

    let taxonomy = TaxonomyService::new(SqliteTaxonomyRepository::new(&conn));
    let pets = PetService::new(SqlitePetRepository::new(&conn));
    let adoptions = AdoptionService::new(SqlitePersonRepository::new(&conn));

    // People first; phone inputs arrive in assorted punctuated forms.
    let tom = adoptions.register_person(&RegisterPersonRequest {
        first_name: "Tom".to_string(),
        last_name: "Smith".to_string(),
        age: Some(52),
        phone: Some("555-555-5555".to_string()),
    })?;
    let sue = adoptions.register_person(&RegisterPersonRequest {
        first_name: "Sue".to_string(),
        last_name: "Johnson".to_string(),
        age: Some(54),
        phone: Some("555 243 9988".to_string()),
    })?;
    let gary = adoptions.register_person(&RegisterPersonRequest {
        first_name: "Gary".to_string(),
        last_name: "Jones".to_string(),
        age: Some(52),
        phone: Some("555-123-5555".to_string()),
    })?;
    let karim = adoptions.register_person(&RegisterPersonRequest {
        first_name: "Karim".to_string(),
        last_name: "Osman".to_string(),
        age: Some(32),
        phone: Some("555-123-4545".to_string()),
    })?;

    // One species, four breeds; ensure_* reuses rows on repeat names.
    let dog = taxonomy.ensure_species("Dog")?;
    let dalmatian = taxonomy.ensure_breed("Dalmatian", dog.id)?;
    let golden = taxonomy.ensure_breed("Golden Retriever", dog.id)?;
    let labrador = taxonomy.ensure_breed("Labrador Retriever", dog.id)?;
    let boxer = taxonomy.ensure_breed("Boxer", dog.id)?;

    let shelter = pets.register_shelter("Happy Animal Place", None)?;

    let spot = pets.intake_pet(&NewPet {
        name: "Spot".to_string(),
        age: Some(2),
        adopted: Some(true),
        breed_id: dalmatian.id,
        shelter_id: None,
        parent_id: None,
    })?;
    let goldie = pets.intake_pet(&NewPet {
        name: "Goldie".to_string(),
        age: Some(9),
        adopted: Some(false),
        breed_id: golden.id,
        shelter_id: Some(shelter.id),
        parent_id: None,
    })?;
    let duke = pets.intake_pet(&NewPet {
        name: "Duke".to_string(),
        age: Some(5),
        adopted: Some(true),
        breed_id: labrador.id,
        shelter_id: Some(shelter.id),
        parent_id: None,
    })?;
    let sonya = pets.intake_pet(&NewPet {
        name: "Sonya".to_string(),
        age: Some(7),
        adopted: Some(true),
        breed_id: boxer.id,
        shelter_id: None,
        parent_id: None,
    })?;

    adoptions.adopt(spot.id, tom.id, Some(2))?;
    adoptions.adopt(spot.id, sue.id, Some(2))?;
    adoptions.adopt(duke.id, gary.id, Some(5))?;
    adoptions.adopt(sonya.id, karim.id, Some(7))?;

    // Tom gives Spot up; Sue keeps him.
    adoptions.surrender(spot.id, tom.id)?;

    let fast = taxonomy.tag_breed(golden.id, "Fast")?;
    taxonomy.tag_breed(dalmatian.id, "Fast")?;
    taxonomy.tag_breed(labrador.id, "Fast")?;
    taxonomy.tag_breed(dalmatian.id, "Smart")?;
    taxonomy.ensure_trait("Drools")?;
    taxonomy.tag_breed(dalmatian.id, "Dog Friendly")?;
    taxonomy.tag_breed(labrador.id, "Dog Friendly")?;

    adoptions.give_nickname(sonya.id, karim.id, "Goofus")?;
    adoptions.give_nickname(sonya.id, karim.id, "Crazypants")?;
    adoptions.give_nickname(duke.id, gary.id, "Dukers")?;

    let spot_jr = pets.register_offspring(spot.id, "Spot Jr.", None)?;

    println!("petbook seed complete (core {})", petbook_core::core_version());

    println!("breeds:");
    for breed in taxonomy.list_breeds()? {
        println!("  {}", breed.name);
    }

    println!("traits available: {}", taxonomy.trait_count()?);
    let fast_breeds: Vec<String> = taxonomy
        .breeds_with_trait(fast.id)?
        .into_iter()
        .map(|breed| breed.name)
        .collect();
    println!("fast breeds: {}", fast_breeds.join(", "));

    let duke_owners: Vec<String> = adoptions
        .owners_of_pet(duke.id)?
        .into_iter()
        .map(|person| person.full_name())
        .collect();
    println!("{}'s people: {}", duke.name, duke_owners.join(", "));

    let sonya_nicknames: Vec<String> = adoptions
        .nicknames_for_pet(sonya.id)?
        .into_iter()
        .map(|entry| entry.nickname)
        .collect();
    println!("{}'s nicknames: {}", sonya.name, sonya_nicknames.join(", "));

    let family = pets.family_of(spot_jr.id)?;
    let parent_name = family
        .parent
        .map(|parent| parent.name)
        .unwrap_or_else(|| "none".to_string());
    println!("{} is a child of {}", family.pet.name, parent_name);

    let goldie_home = match goldie.shelter_id {
        Some(_) => shelter.name.as_str(),
        None => "no shelter",
    };
    println!("{} is waiting at {}", goldie.name, goldie_home);

    Ok(())
}
