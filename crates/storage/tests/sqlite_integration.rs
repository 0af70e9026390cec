use storage::repository::{KeyValueStore, ProfileRepository, Storage, StorageError};
use storage::sqlite::SqliteRepository;
use storage::PROFILE_KEY;
use wellness_core::model::{ProfileEdits, UserProfile};

#[tokio::test]
async fn sqlite_kv_put_overwrites_value() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_overwrite?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("greeting").await.unwrap(), None);

    repo.put("greeting", "namaste").await.unwrap();
    repo.put("greeting", "hello").await.unwrap();

    assert_eq!(repo.get("greeting").await.unwrap().as_deref(), Some("hello"));
}

#[tokio::test]
async fn sqlite_migrate_is_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate_twice?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    repo.put("k", "v").await.unwrap();
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn sqlite_storage_round_trips_profile() {
    let storage = Storage::sqlite("sqlite:file:memdb_profile_roundtrip?mode=memory&cache=shared")
        .await
        .expect("storage");

    assert!(storage.profiles.load_profile().await.unwrap().is_none());

    let profile = UserProfile::default()
        .apply_edits(ProfileEdits::new().with_name("Devi").with_age(Some(52)));
    storage.profiles.save_profile(&profile).await.unwrap();

    let raw = storage.kv.get(PROFILE_KEY).await.unwrap().expect("stored");
    assert!(raw.contains("\"name\":\"Devi\""));

    let loaded = storage.profiles.load_profile().await.unwrap();
    assert_eq!(loaded, Some(profile));
}

#[tokio::test]
async fn sqlite_corrupt_profile_surfaces_serialization_error() {
    let storage = Storage::sqlite("sqlite:file:memdb_profile_corrupt?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.kv.put(PROFILE_KEY, "[1, 2, 3]").await.unwrap();

    let err = storage.profiles.load_profile().await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}
