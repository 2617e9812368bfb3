//! Integration tests for the note repository against in-memory SQLite.

use notesync_core::{CreateNoteRequest, Error, NoteRepository, UpdateNoteRequest, UserRepository};
use notesync_db::test_fixtures::TestDatabase;
use notesync_db::{Database, PoolConfig};

fn create_req(owner_id: i64, title: Option<&str>, content: Option<&str>) -> CreateNoteRequest {
    CreateNoteRequest {
        owner_id,
        title: title.map(String::from),
        content: content.map(String::from),
    }
}

#[tokio::test]
async fn test_create_then_fetch_returns_same_fields() {
    let t = TestDatabase::new().await;
    let alice = t.user("alice").await;

    let created = t
        .db
        .notes
        .insert(create_req(alice.id, Some("Shopping"), Some("milk, eggs")))
        .await
        .unwrap();

    assert_eq!(created.created_at, created.updated_at);

    let fetched = t.db.notes.fetch(&created.id, alice.id).await.unwrap();
    assert_eq!(fetched.title, "Shopping");
    assert_eq!(fetched.content, "milk, eggs");
    assert_eq!(fetched.owner_id, alice.id);
    assert_eq!(fetched.created_at, fetched.updated_at);
}

#[tokio::test]
async fn test_create_defaults_title_and_content() {
    let t = TestDatabase::new().await;
    let alice = t.user("alice").await;

    let note = t
        .db
        .notes
        .insert(create_req(alice.id, None, None))
        .await
        .unwrap();
    assert_eq!(note.title, "Untitled");
    assert_eq!(note.content, "");

    // Empty title at creation also falls back to the default.
    let note = t
        .db
        .notes
        .insert(create_req(alice.id, Some(""), Some("body")))
        .await
        .unwrap();
    assert_eq!(note.title, "Untitled");
    assert_eq!(note.content, "body");
}

#[tokio::test]
async fn test_ids_are_opaque_and_distinct() {
    let t = TestDatabase::new().await;
    let alice = t.user("alice").await;

    let a = t.db.notes.insert(create_req(alice.id, None, None)).await.unwrap();
    let b = t.db.notes.insert(create_req(alice.id, None, None)).await.unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(a.id.len(), 32);
}

#[tokio::test]
async fn test_fetch_foreign_note_is_not_found() {
    let t = TestDatabase::new().await;
    let alice = t.user("alice").await;
    let bob = t.user("bob").await;

    let note = t
        .db
        .notes
        .insert(create_req(alice.id, Some("private"), None))
        .await
        .unwrap();

    let absent = t.db.notes.fetch("00".repeat(16).as_str(), bob.id).await.unwrap_err();
    let foreign = t.db.notes.fetch(&note.id, bob.id).await.unwrap_err();

    // Ownership mismatch must be indistinguishable from absence.
    assert!(matches!(absent, Error::NotFound(_)));
    assert!(matches!(foreign, Error::NotFound(_)));

    // The rightful owner still sees it.
    assert!(t.db.notes.fetch(&note.id, alice.id).await.is_ok());
}

#[tokio::test]
async fn test_partial_update_keeps_omitted_fields() {
    let t = TestDatabase::new().await;
    let alice = t.user("alice").await;

    let note = t
        .db
        .notes
        .insert(create_req(alice.id, Some("Shopping"), Some("milk, eggs")))
        .await
        .unwrap();

    let updated = t
        .db
        .notes
        .update(
            &note.id,
            alice.id,
            UpdateNoteRequest {
                title: Some("Groceries".to_string()),
                content: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Groceries");
    assert_eq!(updated.content, "milk, eggs");
    assert_eq!(updated.created_at, note.created_at);
    assert!(updated.updated_at > note.updated_at);
}

#[tokio::test]
async fn test_update_with_empty_string_clears_field() {
    let t = TestDatabase::new().await;
    let alice = t.user("alice").await;

    let note = t
        .db
        .notes
        .insert(create_req(alice.id, Some("Shopping"), Some("milk")))
        .await
        .unwrap();

    let updated = t
        .db
        .notes
        .update(
            &note.id,
            alice.id,
            UpdateNoteRequest {
                title: None,
                content: Some(String::new()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Shopping");
    assert_eq!(updated.content, "");
}

#[tokio::test]
async fn test_update_without_fields_still_refreshes_timestamp() {
    let t = TestDatabase::new().await;
    let alice = t.user("alice").await;

    let note = t
        .db
        .notes
        .insert(create_req(alice.id, Some("t"), Some("c")))
        .await
        .unwrap();

    let updated = t
        .db
        .notes
        .update(&note.id, alice.id, UpdateNoteRequest::default())
        .await
        .unwrap();

    assert_eq!(updated.title, "t");
    assert_eq!(updated.content, "c");
    assert!(updated.updated_at > note.updated_at);
}

#[tokio::test]
async fn test_update_foreign_or_absent_is_not_found() {
    let t = TestDatabase::new().await;
    let alice = t.user("alice").await;
    let bob = t.user("bob").await;

    let note = t
        .db
        .notes
        .insert(create_req(alice.id, None, None))
        .await
        .unwrap();

    let err = t
        .db
        .notes
        .update(&note.id, bob.id, UpdateNoteRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    // Foreign update must not have touched the record.
    let unchanged = t.db.notes.fetch(&note.id, alice.id).await.unwrap();
    assert_eq!(unchanged.updated_at, note.updated_at);
}

#[tokio::test]
async fn test_delete_is_permanent_and_not_idempotent() {
    let t = TestDatabase::new().await;
    let alice = t.user("alice").await;

    let note = t
        .db
        .notes
        .insert(create_req(alice.id, None, None))
        .await
        .unwrap();

    t.db.notes.delete(&note.id, alice.id).await.unwrap();

    let get_err = t.db.notes.fetch(&note.id, alice.id).await.unwrap_err();
    assert!(matches!(get_err, Error::NotFound(_)));

    let second = t.db.notes.delete(&note.id, alice.id).await.unwrap_err();
    assert!(matches!(second, Error::NotFound(_)));
}

#[tokio::test]
async fn test_delete_foreign_note_is_not_found() {
    let t = TestDatabase::new().await;
    let alice = t.user("alice").await;
    let bob = t.user("bob").await;

    let note = t
        .db
        .notes
        .insert(create_req(alice.id, None, None))
        .await
        .unwrap();

    let err = t.db.notes.delete(&note.id, bob.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(t.db.notes.fetch(&note.id, alice.id).await.is_ok());
}

#[tokio::test]
async fn test_list_orders_by_recency() {
    let t = TestDatabase::new().await;
    let alice = t.user("alice").await;

    let a = t
        .db
        .notes
        .insert(create_req(alice.id, Some("A"), None))
        .await
        .unwrap();
    let b = t
        .db
        .notes
        .insert(create_req(alice.id, Some("B"), None))
        .await
        .unwrap();

    let listed = t.db.notes.list(alice.id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, b.id);
    assert_eq!(listed[1].id, a.id);

    // Updating A moves it back to the front.
    t.db.notes
        .update(&a.id, alice.id, UpdateNoteRequest::default())
        .await
        .unwrap();

    let listed = t.db.notes.list(alice.id).await.unwrap();
    assert_eq!(listed[0].id, a.id);
    assert_eq!(listed[1].id, b.id);
}

#[tokio::test]
async fn test_list_is_owner_scoped_and_empty_for_new_owner() {
    let t = TestDatabase::new().await;
    let alice = t.user("alice").await;
    let bob = t.user("bob").await;

    t.db.notes
        .insert(create_req(alice.id, Some("mine"), None))
        .await
        .unwrap();

    let bobs = t.db.notes.list(bob.id).await.unwrap();
    assert!(bobs.is_empty());

    let alices = t.db.notes.list(alice.id).await.unwrap();
    assert_eq!(alices.len(), 1);
}

#[tokio::test]
async fn test_concurrent_updates_resolve_to_one_writer() {
    let t = TestDatabase::new().await;
    let alice = t.user("alice").await;

    let note = t
        .db
        .notes
        .insert(create_req(alice.id, Some("base"), Some("base")))
        .await
        .unwrap();

    let first = t.db.notes.update(
        &note.id,
        alice.id,
        UpdateNoteRequest {
            title: Some("writer-1".to_string()),
            content: Some("one".to_string()),
        },
    );
    let second = t.db.notes.update(
        &note.id,
        alice.id,
        UpdateNoteRequest {
            title: Some("writer-2".to_string()),
            content: Some("two".to_string()),
        },
    );

    let (a, b) = futures::join!(first, second);
    let (a, b) = (a.unwrap(), b.unwrap());

    // Last-write-wins: the stored state is exactly one writer's
    // intended state, never a merge of both.
    let stored = t.db.notes.fetch(&note.id, alice.id).await.unwrap();
    let winner = if stored.updated_at == a.updated_at { &a } else { &b };
    assert_eq!(stored.title, winner.title);
    assert_eq!(stored.content, winner.content);
    assert!(
        (stored.title == "writer-1" && stored.content == "one")
            || (stored.title == "writer-2" && stored.content == "two")
    );
}

#[tokio::test]
async fn test_contending_writers_on_shared_pool_both_succeed() {
    // A file-backed database with several pool connections, so the two
    // writers really run on separate SQLite connections and contend
    // for the writer lock instead of sharing one pinned connection.
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("notes.db").display());
    let db = Database::connect_with_config(&url, PoolConfig::default().max_connections(4))
        .await
        .unwrap();
    db.migrate().await.unwrap();

    let alice = db.users.insert("alice", "test-hash").await.unwrap();
    let note = db
        .notes
        .insert(create_req(alice.id, Some("base"), Some("base")))
        .await
        .unwrap();

    for round in 0..20 {
        let first = db.notes.update(
            &note.id,
            alice.id,
            UpdateNoteRequest {
                title: Some("writer-1".to_string()),
                content: Some(format!("one {round}")),
            },
        );
        let second = db.notes.update(
            &note.id,
            alice.id,
            UpdateNoteRequest {
                title: Some("writer-2".to_string()),
                content: Some(format!("two {round}")),
            },
        );

        // Both writers must queue on the busy timeout and succeed;
        // neither may surface a database error.
        let (a, b) = futures::join!(first, second);
        let a = a.unwrap_or_else(|e| panic!("first writer failed in round {round}: {e}"));
        let b = b.unwrap_or_else(|e| panic!("second writer failed in round {round}: {e}"));

        let stored = db.notes.fetch(&note.id, alice.id).await.unwrap();
        assert!(
            (stored.title == a.title && stored.content == a.content)
                || (stored.title == b.title && stored.content == b.content),
            "stored row must match exactly one writer, got {stored:?}"
        );
    }
}

#[tokio::test]
async fn test_sequential_updates_keep_timestamps_strictly_ordered() {
    let t = TestDatabase::new().await;
    let alice = t.user("alice").await;

    let note = t
        .db
        .notes
        .insert(create_req(alice.id, None, None))
        .await
        .unwrap();

    let mut prev = note.updated_at;
    for i in 0..5 {
        let updated = t
            .db
            .notes
            .update(
                &note.id,
                alice.id,
                UpdateNoteRequest {
                    title: None,
                    content: Some(format!("rev {i}")),
                },
            )
            .await
            .unwrap();
        assert!(updated.updated_at > prev);
        assert!(updated.updated_at >= updated.created_at);
        prev = updated.updated_at;
    }
}
