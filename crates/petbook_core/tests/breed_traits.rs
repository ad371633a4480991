use petbook_core::db::open_db_in_memory;
use petbook_core::{
    RepoError, SqliteTaxonomyRepository, TaxonomyRepository, TaxonomyService,
};

#[test]
fn breed_creation_requires_existing_species() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaxonomyRepository::new(&conn);

    let err = repo.create_breed("Dalmatian", 999).unwrap_err();
    assert!(matches!(err, RepoError::SpeciesNotFound(999)));

    let dog = repo.create_species("Dog").unwrap();
    let dalmatian = repo.create_breed("Dalmatian", dog.id).unwrap();
    assert_eq!(dalmatian.species_id, dog.id);
}

#[test]
fn breeds_of_species_lists_only_that_species() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaxonomyRepository::new(&conn);

    let dog = repo.create_species("Dog").unwrap();
    let cat = repo.create_species("Cat").unwrap();
    repo.create_breed("Boxer", dog.id).unwrap();
    repo.create_breed("Dalmatian", dog.id).unwrap();
    repo.create_breed("Siamese", cat.id).unwrap();

    let dog_breeds = repo.breeds_of_species(dog.id).unwrap();
    let names: Vec<&str> = dog_breeds.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Boxer", "Dalmatian"]);
}

#[test]
fn linking_is_idempotent_for_the_same_pair() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaxonomyRepository::new(&conn);

    let dog = repo.create_species("Dog").unwrap();
    let breed = repo.create_breed("Labrador Retriever", dog.id).unwrap();
    let fast = repo.create_trait("Fast").unwrap();

    repo.link_breed_trait(breed.id, fast.id).unwrap();
    repo.link_breed_trait(breed.id, fast.id).unwrap();

    let traits = repo.traits_of_breed(breed.id).unwrap();
    assert_eq!(traits.len(), 1);
    assert_eq!(traits[0].name, "Fast");
}

#[test]
fn link_rejects_missing_breed_or_trait() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaxonomyRepository::new(&conn);

    let dog = repo.create_species("Dog").unwrap();
    let breed = repo.create_breed("Boxer", dog.id).unwrap();
    let fast = repo.create_trait("Fast").unwrap();

    assert!(matches!(
        repo.link_breed_trait(999, fast.id).unwrap_err(),
        RepoError::BreedNotFound(999)
    ));
    assert!(matches!(
        repo.link_breed_trait(breed.id, 999).unwrap_err(),
        RepoError::TraitNotFound(999)
    ));
}

#[test]
fn set_breed_traits_replaces_the_full_set() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaxonomyRepository::new(&conn);

    let dog = repo.create_species("Dog").unwrap();
    let breed = repo.create_breed("Dalmatian", dog.id).unwrap();
    let fast = repo.create_trait("Fast").unwrap();
    let smart = repo.create_trait("Smart").unwrap();
    let drools = repo.create_trait("Drools").unwrap();

    repo.set_breed_traits(breed.id, &[fast.id, smart.id]).unwrap();
    let first = repo.traits_of_breed(breed.id).unwrap();
    let names: Vec<&str> = first.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Fast", "Smart"]);

    repo.set_breed_traits(breed.id, &[drools.id]).unwrap();
    let replaced = repo.traits_of_breed(breed.id).unwrap();
    assert_eq!(replaced.len(), 1);
    assert_eq!(replaced[0].name, "Drools");
}

#[test]
fn breeds_with_trait_reads_the_reverse_direction() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaxonomyRepository::new(&conn);

    let dog = repo.create_species("Dog").unwrap();
    let golden = repo.create_breed("Golden Retriever", dog.id).unwrap();
    let labrador = repo.create_breed("Labrador Retriever", dog.id).unwrap();
    let boxer = repo.create_breed("Boxer", dog.id).unwrap();
    let fast = repo.create_trait("Fast").unwrap();

    repo.link_breed_trait(golden.id, fast.id).unwrap();
    repo.link_breed_trait(labrador.id, fast.id).unwrap();

    let fast_breeds = repo.breeds_with_trait(fast.id).unwrap();
    let names: Vec<&str> = fast_breeds.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Golden Retriever", "Labrador Retriever"]);
    assert!(!names.contains(&boxer.name.as_str()));
}

#[test]
fn trait_count_tracks_created_traits() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaxonomyRepository::new(&conn);
    let service = TaxonomyService::new(repo);

    assert_eq!(service.trait_count().unwrap(), 0);
    service.ensure_trait("Fast").unwrap();
    service.ensure_trait("Smart").unwrap();
    service.ensure_trait("Drools").unwrap();
    service.ensure_trait("Dog Friendly").unwrap();
    assert_eq!(service.trait_count().unwrap(), 4);
}

#[test]
fn ensure_operations_reuse_existing_rows_by_name() {
    let conn = open_db_in_memory().unwrap();
    let service = TaxonomyService::new(SqliteTaxonomyRepository::new(&conn));

    let dog_first = service.ensure_species("Dog").unwrap();
    let dog_second = service.ensure_species("Dog").unwrap();
    assert_eq!(dog_first.id, dog_second.id);

    let breed_first = service.ensure_breed("Boxer", dog_first.id).unwrap();
    let breed_second = service.ensure_breed("Boxer", dog_first.id).unwrap();
    assert_eq!(breed_first.id, breed_second.id);

    let trait_first = service.ensure_trait("Fast").unwrap();
    let trait_second = service.ensure_trait("Fast").unwrap();
    assert_eq!(trait_first.id, trait_second.id);
    assert_eq!(service.trait_count().unwrap(), 1);
}

#[test]
fn tag_breed_ensures_the_trait_and_links_it() {
    let conn = open_db_in_memory().unwrap();
    let service = TaxonomyService::new(SqliteTaxonomyRepository::new(&conn));

    let dog = service.ensure_species("Dog").unwrap();
    let breed = service.ensure_breed("Dalmatian", dog.id).unwrap();

    let tagged = service.tag_breed(breed.id, "Dog Friendly").unwrap();
    let again = service.tag_breed(breed.id, "Dog Friendly").unwrap();
    assert_eq!(tagged.id, again.id);

    let traits = service.traits_of_breed(breed.id).unwrap();
    assert_eq!(traits.len(), 1);
    assert_eq!(traits[0].name, "Dog Friendly");
}
