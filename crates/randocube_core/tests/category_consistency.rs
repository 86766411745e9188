use randocube_core::{
    CatalogState, CategoryList, CategoryService, ErrorKind, Item, ItemStore,
    MemoryCatalogRepository, Priority, RandomSetService,
};

fn item(id: u32, title: &str, category: &str) -> Item {
    let mut item = Item::draft(title, category, Priority::Medium);
    item.id = Some(id);
    item
}

fn seeded_store() -> ItemStore<MemoryCatalogRepository> {
    let mut state = CatalogState::default();
    state.categories = CategoryList::new(vec![
        "Books".to_string(),
        "Movies".to_string(),
        "Film".to_string(),
    ]);
    for id in 1..=5 {
        state.active.push(item(id, &format!("Book {id}"), "Books"));
    }
    state.active.push(item(6, "Heat", "Movies"));
    state.active.push(item(7, "Alien", "Movies"));
    state.active.push(item(8, "Vertigo", "Film"));

    let mut finished = item(9, "Jaws", "Movies");
    finished.completed = Some(chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    state.history.push(finished);

    state
        .last_sets
        .insert("Books".to_string(), vec![item(1, "Book 1", "Books")]);
    state
        .last_sets
        .insert("Movies".to_string(), vec![item(6, "Heat", "Movies")]);
    state.next_id = 10;

    ItemStore::with_state(MemoryCatalogRepository::new(), state)
}

#[test]
fn add_appends_and_persists() {
    let store = seeded_store();
    let service = CategoryService::new(&store);

    service.add("Board Games").unwrap();

    assert_eq!(
        service.list().unwrap(),
        vec!["Books", "Movies", "Film", "Board Games"]
    );
    let saved = store.repository().saved().unwrap();
    assert!(saved.categories.contains("board games"));
}

#[test]
fn add_rejects_case_insensitive_duplicate() {
    let store = seeded_store();
    let service = CategoryService::new(&store);

    let err = service.add("BOOKS").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CategoryDuplicate);
    assert_eq!(err.to_string(), "Category already exists: BOOKS");
    assert_eq!(service.list().unwrap().len(), 3);
    assert_eq!(store.repository().persist_count(), 0);
}

#[test]
fn rename_cascades_to_items_and_drops_cached_set() {
    let store = seeded_store();
    let service = CategoryService::new(&store);

    service.rename("books", "Novels").unwrap();

    let state = store.snapshot().unwrap();
    assert_eq!(state.categories.as_slice(), ["Novels", "Movies", "Film"]);
    assert_eq!(state.active_in("Novels").count(), 5);
    assert_eq!(state.active_in("Books").count(), 0);
    assert!(!state.last_sets.contains_key("Books"));
    assert!(state.last_sets.contains_key("Movies"));
}

#[test]
fn rename_rewrites_history_items() {
    let store = seeded_store();
    let service = CategoryService::new(&store);

    service.rename("Movies", "Cinema").unwrap();

    let state = store.snapshot().unwrap();
    assert_eq!(state.history[0].category, "Cinema");
    assert_eq!(state.active_in("Cinema").count(), 2);
}

#[test]
fn rename_to_existing_or_same_name_is_duplicate() {
    let store = seeded_store();
    let service = CategoryService::new(&store);

    let err = service.rename("Books", "film").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CategoryDuplicate);

    let err = service.rename("Books", "Books").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CategoryDuplicate);

    let err = service.rename("Books", "BOOKS").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CategoryDuplicate);

    assert_eq!(store.snapshot().unwrap().active_in("Books").count(), 5);
}

#[test]
fn rename_unknown_category_is_not_found() {
    let store = seeded_store();
    let err = CategoryService::new(&store)
        .rename("Podcasts", "Audio")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CategoryNotFound);
    assert_eq!(err.to_string(), "Could not find category: Podcasts");
}

#[test]
fn remove_with_migration_moves_items() {
    let store = seeded_store();
    let service = CategoryService::new(&store);

    service.remove("movies", Some("FILM")).unwrap();

    let state = store.snapshot().unwrap();
    assert_eq!(state.categories.as_slice(), ["Books", "Film"]);
    assert_eq!(state.active_in("Film").count(), 3);
    assert_eq!(state.active_in("Movies").count(), 0);
    assert_eq!(state.history[0].category, "Film");
    assert!(!state.last_sets.contains_key("Movies"));
}

#[test]
fn remove_without_migration_deletes_active_items_only() {
    let store = seeded_store();
    let service = CategoryService::new(&store);

    service.remove("Movies", None).unwrap();

    let state = store.snapshot().unwrap();
    assert_eq!(state.active.len(), 6);
    assert!(state.active.iter().all(|item| item.category != "Movies"));
    assert_eq!(state.history.len(), 1);
    assert!(!state.last_sets.contains_key("Movies"));
}

#[test]
fn remove_treats_blank_migration_target_as_absent() {
    let store = seeded_store();
    CategoryService::new(&store).remove("Movies", Some("  ")).unwrap();
    assert_eq!(store.snapshot().unwrap().active.len(), 6);
}

#[test]
fn remove_rejects_missing_or_self_migration_target() {
    let store = seeded_store();
    let service = CategoryService::new(&store);

    let err = service.remove("Movies", Some("Podcasts")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CategoryNotFound);
    assert_eq!(err.to_string(), "Could not find category: Podcasts");

    let err = service.remove("Movies", Some("MOVIES")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CategoryNotFound);
    assert_eq!(err.to_string(), "Could not find category: MOVIES");

    let err = service.remove("Podcasts", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CategoryNotFound);

    let state = store.snapshot().unwrap();
    assert_eq!(state.categories.len(), 3);
    assert_eq!(state.active.len(), 8);
    assert_eq!(store.repository().persist_count(), 0);
}

#[test]
fn persist_failure_surfaces_but_keeps_rename_applied() {
    let store = seeded_store();
    store.repository().fail_next_persists(1);

    let err = CategoryService::new(&store)
        .rename("Books", "Novels")
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
    let state = store.snapshot().unwrap();
    assert!(state.categories.contains("Novels"));
    assert_eq!(state.active_in("Novels").count(), 5);
}

#[test]
fn renamed_category_starts_a_fresh_last_set() {
    let store = seeded_store();
    CategoryService::new(&store).rename("Books", "Novels").unwrap();

    let set = RandomSetService::new(&store)
        .random_set("novels", true)
        .unwrap();

    assert_eq!(set.len(), 3);
    assert!(set.iter().all(|item| item.category == "Novels"));
    let state = store.snapshot().unwrap();
    assert_eq!(state.last_sets["Novels"], set);
}
