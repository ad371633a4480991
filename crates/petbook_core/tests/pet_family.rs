use petbook_core::db::open_db_in_memory;
use petbook_core::{
    NewPet, PetRepository, PetService, RepoError, SqlitePetRepository, SqliteTaxonomyRepository,
    TaxonomyRepository,
};
use rusqlite::Connection;

#[test]
fn pet_creation_requires_existing_breed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::new(&conn);

    let err = repo.create_pet(&NewPet::named("Spot", 999)).unwrap_err();
    assert!(matches!(err, RepoError::BreedNotFound(999)));

    let breed_id = seed_breed(&conn);
    let spot = repo.create_pet(&NewPet::named("Spot", breed_id)).unwrap();
    assert_eq!(spot.breed_id, breed_id);
    assert_eq!(spot.shelter_id, None);
    assert_eq!(spot.parent_id, None);
}

#[test]
fn pet_creation_checks_shelter_and_parent_references() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::new(&conn);
    let breed_id = seed_breed(&conn);

    let mut draft = NewPet::named("Goldie", breed_id);
    draft.shelter_id = Some(999);
    assert!(matches!(
        repo.create_pet(&draft).unwrap_err(),
        RepoError::ShelterNotFound(999)
    ));

    let mut draft = NewPet::named("Spot Jr.", breed_id);
    draft.parent_id = Some(999);
    assert!(matches!(
        repo.create_pet(&draft).unwrap_err(),
        RepoError::PetNotFound(999)
    ));

    let shelter = repo.create_shelter("Happy Animal Place", None).unwrap();
    let mut draft = NewPet::named("Goldie", breed_id);
    draft.shelter_id = Some(shelter.id);
    let goldie = repo.create_pet(&draft).unwrap();
    assert_eq!(goldie.shelter_id, Some(shelter.id));
}

#[test]
fn create_and_get_roundtrip_preserves_optional_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::new(&conn);
    let breed_id = seed_breed(&conn);

    let created = repo
        .create_pet(&NewPet {
            name: "Sonya".to_string(),
            age: Some(7),
            adopted: Some(true),
            breed_id,
            shelter_id: None,
            parent_id: None,
        })
        .unwrap();

    let loaded = repo.get_pet(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.age, Some(7));
    assert_eq!(loaded.adopted, Some(true));

    let unknown = repo.create_pet(&NewPet::named("Stray", breed_id)).unwrap();
    let loaded = repo.get_pet(unknown.id).unwrap().unwrap();
    assert_eq!(loaded.adopted, None);
}

#[test]
fn children_of_returns_direct_children_in_name_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::new(&conn);
    let breed_id = seed_breed(&conn);

    let spot = repo.create_pet(&NewPet::named("Spot", breed_id)).unwrap();
    for name in ["Ziggy", "Alba", "Milo"] {
        let mut draft = NewPet::named(name, breed_id);
        draft.parent_id = Some(spot.id);
        repo.create_pet(&draft).unwrap();
    }

    let children = repo.children_of(spot.id).unwrap();
    let names: Vec<&str> = children.iter().map(|pet| pet.name.as_str()).collect();
    assert_eq!(names, vec!["Alba", "Milo", "Ziggy"]);
}

#[test]
fn ancestors_of_walks_the_chain_nearest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::new(&conn);
    let breed_id = seed_breed(&conn);

    let grandma = repo.create_pet(&NewPet::named("Grandma", breed_id)).unwrap();
    let mut draft = NewPet::named("Mother", breed_id);
    draft.parent_id = Some(grandma.id);
    let mother = repo.create_pet(&draft).unwrap();
    let mut draft = NewPet::named("Pup", breed_id);
    draft.parent_id = Some(mother.id);
    let pup = repo.create_pet(&draft).unwrap();

    let ancestors = repo.ancestors_of(pup.id).unwrap();
    let names: Vec<&str> = ancestors.iter().map(|pet| pet.name.as_str()).collect();
    assert_eq!(names, vec!["Mother", "Grandma"]);

    assert!(repo.ancestors_of(grandma.id).unwrap().is_empty());
}

#[test]
fn set_parent_rejects_self_and_cycles() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::new(&conn);
    let breed_id = seed_breed(&conn);

    let spot = repo.create_pet(&NewPet::named("Spot", breed_id)).unwrap();
    let mut draft = NewPet::named("Spot Jr.", breed_id);
    draft.parent_id = Some(spot.id);
    let junior = repo.create_pet(&draft).unwrap();

    assert!(matches!(
        repo.set_parent(spot.id, spot.id).unwrap_err(),
        RepoError::ParentageCycle { .. }
    ));
    assert!(matches!(
        repo.set_parent(spot.id, junior.id).unwrap_err(),
        RepoError::ParentageCycle { .. }
    ));

    // The failed attempts must not have written anything.
    let reloaded = repo.get_pet(spot.id).unwrap().unwrap();
    assert_eq!(reloaded.parent_id, None);

    let other = repo.create_pet(&NewPet::named("Rex", breed_id)).unwrap();
    repo.set_parent(other.id, spot.id).unwrap();
    let reloaded = repo.get_pet(other.id).unwrap().unwrap();
    assert_eq!(reloaded.parent_id, Some(spot.id));
}

#[test]
fn register_offspring_inherits_breed_and_starts_unadopted() {
    let conn = open_db_in_memory().unwrap();
    let breed_id = seed_breed(&conn);
    let service = PetService::new(SqlitePetRepository::new(&conn));

    let spot = service
        .intake_pet(&NewPet {
            name: "Spot".to_string(),
            age: Some(2),
            adopted: Some(true),
            breed_id,
            shelter_id: None,
            parent_id: None,
        })
        .unwrap();

    let junior = service
        .register_offspring(spot.id, "Spot Jr.", None)
        .unwrap();
    assert_eq!(junior.breed_id, spot.breed_id);
    assert_eq!(junior.parent_id, Some(spot.id));
    assert_eq!(junior.adopted, Some(false));

    let family = service.family_of(junior.id).unwrap();
    assert_eq!(family.parent.map(|parent| parent.id), Some(spot.id));
    assert!(family.children.is_empty());

    let family = service.family_of(spot.id).unwrap();
    assert_eq!(family.children.len(), 1);
    assert_eq!(family.children[0].name, "Spot Jr.");
}

#[test]
fn list_pets_filters_by_breed_shelter_and_adoption() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::new(&conn);
    let taxonomy = SqliteTaxonomyRepository::new(&conn);

    let dog = taxonomy.create_species("Dog").unwrap();
    let boxer = taxonomy.create_breed("Boxer", dog.id).unwrap();
    let dalmatian = taxonomy.create_breed("Dalmatian", dog.id).unwrap();
    let shelter = repo.create_shelter("Happy Animal Place", None).unwrap();

    let mut draft = NewPet::named("Sonya", boxer.id);
    draft.adopted = Some(true);
    repo.create_pet(&draft).unwrap();

    let mut draft = NewPet::named("Goldie", dalmatian.id);
    draft.shelter_id = Some(shelter.id);
    draft.adopted = Some(false);
    repo.create_pet(&draft).unwrap();

    let boxers = repo
        .list_pets(&petbook_core::PetListQuery {
            breed_id: Some(boxer.id),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(boxers.len(), 1);
    assert_eq!(boxers[0].name, "Sonya");

    let sheltered = repo
        .list_pets(&petbook_core::PetListQuery {
            shelter_id: Some(shelter.id),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(sheltered.len(), 1);
    assert_eq!(sheltered[0].name, "Goldie");

    let adopted = repo
        .list_pets(&petbook_core::PetListQuery {
            adopted: Some(true),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(adopted.len(), 1);
    assert_eq!(adopted[0].name, "Sonya");
}

fn seed_breed(conn: &Connection) -> i64 {
    let taxonomy = SqliteTaxonomyRepository::new(conn);
    let dog = taxonomy.create_species("Dog").unwrap();
    taxonomy.create_breed("Dalmatian", dog.id).unwrap().id
}
