use lifeos_core::{
    HabitSession, HabitStore, NewHabit, StorageError, storage::memory::MemoryHabitStore,
};

#[tokio::test]
async fn created_habit_comes_back_from_list() {
    let store = MemoryHabitStore::new();

    let created = store
        .create(NewHabit::new("Meditate (10m)", true))
        .await
        .expect("create should succeed");

    let listed = store.list().await.expect("list should succeed");
    let found = listed.iter().find(|h| h.id == created.id).expect("created habit listed");

    assert_eq!(found.label, "Meditate (10m)");
    assert!(found.completed);
    assert_eq!(found, &created);
}

#[tokio::test]
async fn list_is_newest_first() {
    let store = MemoryHabitStore::new();
    for label in ["Meditate (10m)", "Read 20 Pages", "No Sugar", "Hydrate 3L"] {
        store.create(NewHabit::new(label, false)).await.unwrap();
    }

    let listed = store.list().await.unwrap();
    let labels: Vec<_> = listed.iter().map(|h| h.label.as_str()).collect();
    assert_eq!(labels, ["Hydrate 3L", "No Sugar", "Read 20 Pages", "Meditate (10m)"]);
    assert!(listed.windows(2).all(|w| w[0].created_at > w[1].created_at));
}

#[tokio::test]
async fn ids_are_unique() {
    let store = MemoryHabitStore::new();
    let a = store.create(NewHabit::new("a", false)).await.unwrap();
    let b = store.create(NewHabit::new("a", false)).await.unwrap();
    assert_ne!(a.id, b.id);

    assert!(HabitSession::load(&store).await.is_ok());
}

#[tokio::test]
async fn storage_failure_propagates() {
    let store = MemoryHabitStore::new();
    store.set_failing(true);

    let err = store.create(NewHabit::new("x", false)).await.unwrap_err();
    assert!(matches!(err, StorageError::Status { status: 503, .. }));
    assert!(HabitSession::load(&store).await.is_err());

    store.set_failing(false);
    assert!(store.is_empty());
}
