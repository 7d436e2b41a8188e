use jotter_core::JotterError;
use jotter_core::config::NotesConfig;
use jotter_core::domain::{Note, NoteError};
use jotter_core::files::{DeclineShareSheet, FileService, OutboxShareSheet};
use jotter_core::locale::Locale;
use jotter_core::storage::{KeyValueStore, MemoryKeyValueStore};
use jotter_core::store::NoteStore;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const KEY: &str = "notes";

fn file_service(dir: &Path) -> Arc<FileService> {
    Arc::new(FileService::new(
        dir.join("notes"),
        Locale::En,
        Arc::new(OutboxShareSheet::new(dir.join("outbox"))),
    ))
}

async fn stored_notes(backend: &MemoryKeyValueStore) -> Vec<Note> {
    let raw = backend.get(KEY).await.unwrap().expect("collection persisted");
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn create_then_get_returns_same_note() {
    let tmpdir = TempDir::new().unwrap();
    let backend = Arc::new(MemoryKeyValueStore::new());
    let mut store = NoteStore::load(backend.clone(), file_service(tmpdir.path()), KEY).await;

    let note = store.create("Shopping List", "- milk\n- eggs").await;
    let fetched = store.get(&note.id).expect("note exists");

    assert_eq!(fetched.title, "Shopping List");
    assert_eq!(fetched.content, "- milk\n- eggs");
    assert_eq!(fetched.created_at, fetched.updated_at);
    assert_eq!(note.id, note.created_at.timestamp_millis().to_string());

    assert_eq!(stored_notes(&backend).await, vec![note]);
}

#[tokio::test]
async fn new_notes_go_first_and_ids_are_unique() {
    let tmpdir = TempDir::new().unwrap();
    let backend = Arc::new(MemoryKeyValueStore::new());
    let mut store = NoteStore::load(backend, file_service(tmpdir.path()), KEY).await;

    let mut ids = Vec::new();
    for i in 0..20 {
        ids.push(store.create(format!("Note {i}"), "body").await.id);
    }

    let listed: Vec<_> = store.notes().iter().map(|n| n.id.clone()).collect();
    ids.reverse();
    assert_eq!(listed, ids);

    let mut unique = listed.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 20);
}

#[tokio::test]
async fn update_keeps_position_and_advances_updated_at() -> Result<(), NoteError> {
    let tmpdir = TempDir::new().unwrap();
    let backend = Arc::new(MemoryKeyValueStore::new());
    let mut store = NoteStore::load(backend.clone(), file_service(tmpdir.path()), KEY).await;

    let first = store.create("First", "one").await;
    let second = store.create("Second", "two").await;

    let mut previous = first.updated_at;
    for round in 0..3 {
        let updated = store.update(&first.id, "First!", format!("one v{round}")).await?;
        assert!(updated.updated_at >= previous);
        assert!(updated.updated_at >= updated.created_at);
        assert_eq!(updated.created_at, first.created_at);
        previous = updated.updated_at;
    }

    let order: Vec<_> = store.notes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(order, vec![second.id.as_str(), first.id.as_str()]);

    let persisted = stored_notes(&backend).await;
    assert_eq!(persisted[1].title, "First!");
    assert_eq!(persisted[1].content, "one v2");

    Ok(())
}

#[tokio::test]
async fn update_of_unknown_id_is_not_found_and_not_persisted() {
    let tmpdir = TempDir::new().unwrap();
    let backend = Arc::new(MemoryKeyValueStore::new());
    let mut store = NoteStore::load(backend.clone(), file_service(tmpdir.path()), KEY).await;

    let result = store.update("missing", "T", "C").await;

    assert!(matches!(result, Err(NoteError::NotFound(id)) if id == "missing"));
    assert!(backend.get(KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_removes_note_even_without_exported_file() {
    let tmpdir = TempDir::new().unwrap();
    let backend = Arc::new(MemoryKeyValueStore::new());
    let mut store = NoteStore::load(backend.clone(), file_service(tmpdir.path()), KEY).await;

    let keep = store.create("Keep", "k").await;
    let gone = store.create("Gone", "g").await;

    assert!(store.delete(&gone.id).await);
    assert!(store.get(&gone.id).is_none());
    assert_eq!(store.len(), 1);
    assert_eq!(stored_notes(&backend).await, vec![keep]);

    assert!(!store.delete(&gone.id).await);
}

#[tokio::test]
async fn delete_removes_exported_file() -> Result<(), JotterError> {
    let tmpdir = TempDir::new().unwrap();
    let backend = Arc::new(MemoryKeyValueStore::new());
    let mut store = NoteStore::load(backend, file_service(tmpdir.path()), KEY).await;

    let note = store.create("Exported", "e").await;
    assert!(store.export_note(&note.id).await?);

    let path = store.files().note_file_path(&note);
    assert!(path.exists());

    store.delete(&note.id).await;
    assert!(!path.exists());

    Ok(())
}

#[tokio::test]
async fn collection_survives_reload() {
    let tmpdir = TempDir::new().unwrap();
    let backend = Arc::new(MemoryKeyValueStore::new());

    let (a, b) = {
        let mut store = NoteStore::load(backend.clone(), file_service(tmpdir.path()), KEY).await;
        let a = store.create("A", "alpha").await;
        let b = store.create("B", "beta").await;
        (a, b)
    };

    let mut reloaded = NoteStore::load(backend.clone(), file_service(tmpdir.path()), KEY).await;
    assert_eq!(reloaded.notes(), &[b.clone(), a.clone()]);

    // ids keep increasing across sessions
    let c = reloaded.create("C", "gamma").await;
    assert!(c.id.parse::<i64>().unwrap() > b.id.parse::<i64>().unwrap());
}

#[tokio::test]
async fn load_does_not_write_back() {
    let tmpdir = TempDir::new().unwrap();
    let backend = Arc::new(MemoryKeyValueStore::new());
    backend.set_fail_writes(true);

    let store = NoteStore::load(backend.clone(), file_service(tmpdir.path()), KEY).await;

    assert!(store.is_empty());
    assert!(store.last_persist_error().is_none());
    assert!(backend.keys().await.is_empty());
}

#[tokio::test]
async fn corrupt_blob_starts_empty_and_is_preserved() {
    let tmpdir = TempDir::new().unwrap();
    let backend = Arc::new(MemoryKeyValueStore::with_entry(KEY, "{not json"));

    let store = NoteStore::load(backend.clone(), file_service(tmpdir.path()), KEY).await;

    assert!(store.is_empty());
    let recovered = store.recovered_key().expect("blob preserved").to_owned();
    assert!(recovered.starts_with("notes.corrupt-"));
    assert_eq!(
        backend.get(&recovered).await.unwrap().as_deref(),
        Some("{not json")
    );
}

#[tokio::test]
async fn duplicate_stored_ids_collapse_to_first() {
    let tmpdir = TempDir::new().unwrap();
    let raw = r#"[
        {"id":"1","title":"first","content":"a","createdAt":"2024-01-05T10:00:00.000Z","updatedAt":"2024-01-05T10:00:00.000Z"},
        {"id":"1","title":"dupe","content":"b","createdAt":"2024-01-05T10:00:00.000Z","updatedAt":"2024-01-05T10:00:00.000Z"}
    ]"#;
    let backend = Arc::new(MemoryKeyValueStore::with_entry(KEY, raw));

    let store = NoteStore::load(backend, file_service(tmpdir.path()), KEY).await;

    assert_eq!(store.len(), 1);
    assert_eq!(store.get("1").unwrap().title, "first");
}

#[tokio::test]
async fn failed_persistence_keeps_mutation_in_memory() {
    let tmpdir = TempDir::new().unwrap();
    let backend = Arc::new(MemoryKeyValueStore::new());
    let mut store = NoteStore::load(backend.clone(), file_service(tmpdir.path()), KEY).await;

    backend.set_fail_writes(true);
    let note = store.create("Offline", "still here").await;

    assert!(store.get(&note.id).is_some());
    assert!(store.last_persist_error().is_some());
    assert!(store.flush().await.is_err());

    backend.set_fail_writes(false);
    store.update(&note.id, "Online", "saved").await.unwrap();
    assert!(store.last_persist_error().is_none());
    assert_eq!(stored_notes(&backend).await[0].title, "Online");
}

#[tokio::test]
async fn export_of_unknown_note_is_not_found() {
    let tmpdir = TempDir::new().unwrap();
    let store = NoteStore::load(
        Arc::new(MemoryKeyValueStore::new()),
        file_service(tmpdir.path()),
        KEY,
    )
    .await;

    let result = store.export_note("nope").await;
    assert!(matches!(result, Err(JotterError::Note(NoteError::NotFound(_)))));
}

#[tokio::test]
async fn export_all_with_no_notes_does_not_touch_filesystem() {
    let tmpdir = TempDir::new().unwrap();
    let store = NoteStore::load(
        Arc::new(MemoryKeyValueStore::new()),
        file_service(tmpdir.path()),
        KEY,
    )
    .await;

    let result = store.export_all().await;

    assert!(matches!(result, Err(JotterError::Note(NoteError::NothingToExport))));
    assert!(!tmpdir.path().join("notes").exists());
    assert!(!tmpdir.path().join("outbox").exists());
}

#[tokio::test]
async fn export_all_writes_and_shares_every_note() -> Result<(), JotterError> {
    let tmpdir = TempDir::new().unwrap();
    let mut store = NoteStore::load(
        Arc::new(MemoryKeyValueStore::new()),
        file_service(tmpdir.path()),
        KEY,
    )
    .await;

    let a = store.create("A", "alpha").await;
    let b = store.create("B", "beta").await;

    assert!(store.export_all().await?);
    let shared = tmpdir.path().join("outbox").join("notes");
    assert!(shared.join(format!("a-{}.md", a.id)).exists());
    assert!(shared.join(format!("b-{}.md", b.id)).exists());

    Ok(())
}

#[tokio::test]
async fn cancelled_export_returns_false() -> Result<(), JotterError> {
    let tmpdir = TempDir::new().unwrap();
    let files = Arc::new(FileService::new(
        tmpdir.path().join("notes"),
        Locale::En,
        Arc::new(DeclineShareSheet),
    ));
    let mut store = NoteStore::load(Arc::new(MemoryKeyValueStore::new()), files, KEY).await;

    let note = store.create("Maybe", "later").await;
    assert!(!store.export_note(&note.id).await?);

    Ok(())
}

#[tokio::test]
async fn import_creates_note_from_file() -> Result<(), JotterError> {
    let tmpdir = TempDir::new().unwrap();
    let mut store = NoteStore::load(
        Arc::new(MemoryKeyValueStore::new()),
        file_service(tmpdir.path()),
        KEY,
    )
    .await;

    let source = tmpdir.path().join("recipe.md");
    fs::write(
        &source,
        "# Recipe\n\nMix flour and water.\n\n---\n\n*Created: 1/5/2024*\n*Modified: 1/5/2024*",
    )?;

    let imported = store.import_note(&source).await?;
    assert_eq!(imported.title, "Recipe");
    assert_eq!(imported.content, "Mix flour and water.");
    assert_eq!(store.notes()[0], imported);

    let missing = store.import_note(&tmpdir.path().join("missing.md")).await;
    assert!(missing.is_err());
    assert_eq!(store.len(), 1);

    Ok(())
}

#[tokio::test]
async fn open_from_config_persists_to_sqlite() -> Result<(), JotterError> {
    let tmpdir = TempDir::new().unwrap();
    let config = NotesConfig::new(tmpdir.path().join("data"), Locale::Es);

    let note = {
        let mut store = NoteStore::open(&config, Arc::new(DeclineShareSheet)).await?;
        assert!(config.notes_dir().is_dir());
        store.create("Lista", "pan").await
    };

    assert!(config.database_path().exists());

    let store = NoteStore::open(&config, Arc::new(DeclineShareSheet)).await?;
    assert_eq!(store.notes(), &[note]);
    assert_eq!(store.files().notes_dir(), config.notes_dir());

    Ok(())
}

#[tokio::test]
async fn create_after_largest_possible_id_does_not_overflow() {
    let tmpdir = TempDir::new().unwrap();
    let raw = r#"[{"id":"9223372036854775807","title":"edge","content":"x","createdAt":"2024-01-05T10:00:00.000Z","updatedAt":"2024-01-05T10:00:00.000Z"}]"#;
    let backend = Arc::new(MemoryKeyValueStore::with_entry(KEY, raw));
    let mut store = NoteStore::load(backend.clone(), file_service(tmpdir.path()), KEY).await;

    let first = store.create("a", "b").await;
    let second = store.create("c", "d").await;

    assert_ne!(first.id, "9223372036854775807");
    assert!(first.id.parse::<i64>().unwrap() > 0);
    assert_ne!(first.id, second.id);
    assert_eq!(store.len(), 3);
    assert_eq!(stored_notes(&backend).await.len(), 3);
}

#[tokio::test]
async fn spanish_collection_field_names_load() {
    let tmpdir = TempDir::new().unwrap();
    let raw = r#"[{"id":"1704447000000","titulo":"Lista","contenido":"pan","creadoEn":"2024-01-05T09:30:00.000Z","actualizadoEn":"2024-01-06T09:30:00.000Z"}]"#;
    let backend = Arc::new(MemoryKeyValueStore::with_entry("notas", raw));
    let files = Arc::new(FileService::new(
        tmpdir.path().join("notas"),
        Locale::Es,
        Arc::new(DeclineShareSheet),
    ));

    let mut store = NoteStore::load(backend.clone(), files, Locale::Es.storage_key()).await;

    assert!(store.recovered_key().is_none());
    let note = store.get("1704447000000").expect("spanish note loaded");
    assert_eq!(note.title, "Lista");
    assert_eq!(note.content, "pan");
    assert!(note.created_at < note.updated_at);

    // the next write uses the common field names
    store.create("Otra", "nota").await;
    let persisted = backend.get("notas").await.unwrap().unwrap();
    assert!(persisted.contains(r#""title":"Lista""#));
    assert!(persisted.contains(r#""createdAt":"2024-01-05T09:30:00.000Z""#));
    assert!(!persisted.contains("titulo"));
}
