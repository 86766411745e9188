use randocube_core::repo::sqlite_schema::{
    open_catalog_db, open_catalog_db_in_memory, schema_version, SCHEMA_VERSION,
};
use randocube_core::{
    CatalogRepository, CatalogState, CategoryList, CategoryService, Item, ItemService, ItemStore,
    JsonFileRepository, Priority, RandomSetService, RepoError, SqliteCatalogRepository,
};
use rusqlite::Connection;

fn sample_state() -> CatalogState {
    let mut state = CatalogState::default();
    state.categories = CategoryList::new(vec!["Books".to_string(), "Video Games".to_string()]);

    let mut dune = Item::draft("Dune", "Books", Priority::High);
    dune.id = Some(1);
    dune.added = chrono::NaiveDate::from_ymd_opt(2024, 2, 10);
    let mut celeste = Item::draft("Celeste", "Video Games", Priority::Low);
    celeste.id = Some(2);
    celeste.added = chrono::NaiveDate::from_ymd_opt(2024, 2, 11);
    let mut emma = Item::draft("Emma", "Books", Priority::Medium);
    emma.id = Some(3);
    emma.added = chrono::NaiveDate::from_ymd_opt(2023, 12, 1);
    emma.completed = chrono::NaiveDate::from_ymd_opt(2024, 1, 5);

    state.last_sets.insert("Books".to_string(), vec![dune.clone(), emma.clone()]);
    state.active = vec![dune, celeste];
    state.history = vec![emma];
    state.default_set_size = 4;
    state.next_id = 4;
    state
}

#[test]
fn json_repository_roundtrips_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("nested").join("randocube.json"));

    let state = sample_state();
    repo.persist(&state).unwrap();

    assert_eq!(repo.load().unwrap(), state);
    assert!(!dir.path().join("nested").join("randocube.json.tmp").exists());
}

#[test]
fn json_repository_reports_missing_file_as_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("missing.json"));
    assert!(matches!(repo.load(), Err(RepoError::NotFound(_))));
}

#[test]
fn json_repository_reads_legacy_save_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    std::fs::write(
        &path,
        r#"{
            "data": [
                {"id": 1, "title": "Catan", "category": "Board Games", "priority": "MEDIUM",
                 "added": "2022-05-01", "completed": null}
            ],
            "history": [],
            "categories": ["Board Games"],
            "lastSets": {"Board Games": [
                {"id": 1, "title": "Catan", "category": "Board Games", "priority": "MEDIUM",
                 "added": "2022-05-01", "completed": null}
            ]},
            "defaultSetSize": 3,
            "nextId": 2
        }"#,
    )
    .unwrap();

    let state = JsonFileRepository::new(&path).load().unwrap();
    assert_eq!(state.active[0].priority, Priority::Medium);
    assert_eq!(state.last_sets["Board Games"].len(), 1);
    assert_eq!(state.next_id, 2);
}

fn legacy_item(id: u32, title: &str, category: &str) -> String {
    format!(
        r#"{{"id": {id}, "title": "{title}", "category": "{category}", "priority": "LOW",
            "added": "2021-03-04", "completed": null}}"#
    )
}

#[test]
fn legacy_last_set_keys_follow_category_spelling() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    let books = [
        legacy_item(1, "Dune", "Books"),
        legacy_item(2, "Emma", "Books"),
        legacy_item(3, "Ulysses", "Books"),
    ];
    let heat = legacy_item(4, "Heat", "Movies");
    std::fs::write(
        &path,
        format!(
            r#"{{
                "data": [{}, {heat}],
                "history": [],
                "categories": ["Books", "Movies"],
                "lastSets": {{"books": [{}], "movies": [{heat}], "Games": []}},
                "defaultSetSize": 1,
                "nextId": 5
            }}"#,
            books.join(", "),
            books[1]
        ),
    )
    .unwrap();

    let store = ItemStore::open(JsonFileRepository::new(&path)).unwrap();
    let mut keys: Vec<String> = store.snapshot().unwrap().last_sets.into_keys().collect();
    keys.sort();
    assert_eq!(keys, ["Books", "Movies"]);

    let set = RandomSetService::new(&store).random_set("Books", true).unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set[0].id, Some(2));

    CategoryService::new(&store).rename("Books", "Novels").unwrap();
    CategoryService::new(&store).remove("Movies", None).unwrap();
    RandomSetService::new(&store).random_set("Novels", true).unwrap();

    let keys: Vec<String> = store.snapshot().unwrap().last_sets.into_keys().collect();
    assert_eq!(keys, ["Novels"]);
    let saved = JsonFileRepository::new(&path).load().unwrap();
    assert_eq!(saved.last_sets.keys().collect::<Vec<_>>(), ["Novels"]);
}

#[test]
fn json_repository_rejects_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = JsonFileRepository::new(&path).load().unwrap_err();
    assert!(matches!(err, RepoError::Json(_)));
}

#[test]
fn sqlite_repository_roundtrips_catalog() {
    let repo = SqliteCatalogRepository::in_memory().unwrap();
    let state = sample_state();

    repo.persist(&state).unwrap();
    assert_eq!(repo.load().unwrap(), state);

    let mut smaller = state.clone();
    smaller.active.truncate(1);
    smaller.last_sets.clear();
    repo.persist(&smaller).unwrap();
    assert_eq!(repo.load().unwrap(), smaller);
}

#[test]
fn sqlite_repository_fresh_database_loads_default_catalog() {
    let repo = SqliteCatalogRepository::in_memory().unwrap();
    assert_eq!(repo.load().unwrap(), CatalogState::default());
}

#[test]
fn store_survives_reopen_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.sqlite3");

    {
        let store =
            ItemStore::open_or_default(SqliteCatalogRepository::open(&path).unwrap()).unwrap();
        CategoryService::new(&store).add("Books").unwrap();
        ItemService::new(&store)
            .save(&Item::draft("Dune", "Books", Priority::High), false)
            .unwrap();
        RandomSetService::new(&store).random_set("Books", true).unwrap();
    }

    let reopened = ItemStore::open(SqliteCatalogRepository::open(&path).unwrap()).unwrap();
    let state = reopened.snapshot().unwrap();
    assert_eq!(state.categories.as_slice(), ["Books"]);
    assert_eq!(state.active.len(), 1);
    assert_eq!(state.last_sets["Books"], state.active);
    assert_eq!(state.next_id, 2);
}

#[test]
fn store_open_or_default_with_json_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.json");
    let store = ItemStore::open_or_default(JsonFileRepository::new(&path)).unwrap();

    CategoryService::new(&store).add("Movies").unwrap();

    let saved = JsonFileRepository::new(&path).load().unwrap();
    assert_eq!(saved.categories.as_slice(), ["Movies"]);
}

#[test]
fn in_memory_catalog_db_has_current_schema() {
    let conn = open_catalog_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    for table in ["categories", "items", "history_items", "last_set_items", "settings"] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("randocube.db");

    drop(open_catalog_db(&path).unwrap());
    let conn = open_catalog_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
}

#[test]
fn version_one_database_is_upgraded_with_default_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v1.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE categories (position INTEGER NOT NULL PRIMARY KEY, name TEXT NOT NULL UNIQUE);
         CREATE TABLE items (id INTEGER NOT NULL PRIMARY KEY, title TEXT NOT NULL,
             category TEXT NOT NULL, priority TEXT NOT NULL, added TEXT, completed TEXT,
             position INTEGER NOT NULL);
         CREATE TABLE history_items (id INTEGER NOT NULL PRIMARY KEY, title TEXT NOT NULL,
             category TEXT NOT NULL, priority TEXT NOT NULL, added TEXT, completed TEXT,
             position INTEGER NOT NULL);
         CREATE TABLE last_set_items (category TEXT NOT NULL, position INTEGER NOT NULL,
             item_json TEXT NOT NULL, PRIMARY KEY (category, position));
         INSERT INTO categories (position, name) VALUES (0, 'Books');
         PRAGMA user_version = 1;",
    )
    .unwrap();
    drop(conn);

    let repo = SqliteCatalogRepository::open(&path).unwrap();
    let state = repo.load().unwrap();
    assert_eq!(state.categories.as_slice(), ["Books"]);
    assert_eq!(state.default_set_size, 3);
    assert_eq!(state.next_id, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_catalog_db(&path).unwrap_err() {
        RepoError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn current_version_without_catalog_tables_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stamped.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))
        .unwrap();
    drop(conn);

    match SqliteCatalogRepository::open(&path) {
        Err(RepoError::InvalidData(message)) => {
            assert!(message.contains("categories"), "{message}");
            assert!(message.contains("settings"), "{message}");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("stamped database without tables should be rejected"),
    }
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "expected table `{table_name}` to exist");
}
