use bson::{Bson, doc};
use mockfire::{InMemoryFirestore, prelude::*};
use serde::{Deserialize, Serialize};

// Setup only one time throughout the test binary.
#[ctor::ctor]
fn init() {
    colog::init();
}

fn client() -> InMemoryFirestore {
    MockFirestore::builder(InMemoryStore::new())
        .id_generator(SequenceIdGenerator::new("auto-"))
        .build()
}

fn seed_scores(client: &InMemoryFirestore) {
    let scores = client.collection("scores").unwrap();
    for (id, n) in [("d", 10), ("a", 3), ("c", 8), ("b", 5)] {
        scores.add(doc! { "n": n }, id).unwrap();
    }
}

fn values(snapshots: impl IntoIterator<Item = DocumentSnapshot>, field: &str) -> Vec<Bson> {
    snapshots
        .into_iter()
        .filter_map(|snapshot| snapshot.get(field).cloned())
        .collect()
}

#[test]
fn test_set_then_get_round_trips() {
    let client = client();
    let alice = client.collection("users").unwrap().document("alice").unwrap();
    let data = doc! { "name": "Alice", "age": 30, "tags": ["a", "b"], "address": { "city": "Oslo" } };

    alice.set(data.clone(), false).unwrap();

    let snapshot = alice.get().unwrap();
    assert!(snapshot.exists());
    assert_eq!(snapshot.id(), "alice");
    assert_eq!(snapshot.to_dict(), data);
}

#[test]
fn test_set_replaces_wholesale() {
    let client = client();
    let doc = client.collection("c").unwrap().document("d").unwrap();

    doc.set(doc! { "a": 1, "b": 2 }, false).unwrap();
    doc.set(doc! { "c": 3 }, false).unwrap();

    assert_eq!(doc.get().unwrap().to_dict(), doc! { "c": 3 });
}

#[test]
fn test_set_with_merge() {
    let client = client();
    let doc = client.collection("c").unwrap().document("d").unwrap();

    doc.set(doc! { "a": 1, "b": 2 }, false).unwrap();
    doc.set(doc! { "b": 3, "c": 4 }, true).unwrap();

    assert_eq!(doc.get().unwrap().to_dict(), doc! { "a": 1, "b": 3, "c": 4 });
}

#[test]
fn test_set_with_merge_requires_document() {
    let client = client();
    let doc = client.collection("c").unwrap().document("d").unwrap();

    doc.delete().unwrap();
    let result = doc.set(doc! { "a": 1 }, true);

    assert!(matches!(result, Err(ClientError::NotFound(_))));
    assert!(!doc.get().unwrap().exists());
}

#[test]
fn test_update_merges_and_requires_document() {
    let client = client();
    let doc = client.collection("c").unwrap().document("d").unwrap();

    doc.set(doc! { "a": 1, "b": 2 }, false).unwrap();
    doc.update(doc! { "b": 3, "c": 4 }).unwrap();
    assert_eq!(doc.get().unwrap().to_dict(), doc! { "a": 1, "b": 3, "c": 4 });

    doc.delete().unwrap();
    let err = doc.update(doc! { "a": 2 }).unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
    assert_eq!(err.code(), 404);
}

#[test]
fn test_delete_then_get_is_empty() {
    let client = client();
    let doc = client.collection("c").unwrap().document("d").unwrap();
    doc.set(doc! { "a": 1 }, false).unwrap();

    doc.delete().unwrap();

    let snapshot = doc.get().unwrap();
    assert!(!snapshot.exists());
    assert_eq!(snapshot.to_dict(), doc! {});
    assert!(matches!(doc.delete(), Err(ClientError::NotFound(_))));
}

#[test]
fn test_referenced_document_exists_structurally_but_not_logically() {
    let client = client();
    let users = client.collection("users").unwrap();
    let ghost = users.document("ghost").unwrap();

    assert!(!ghost.get().unwrap().exists());
    assert_eq!(users.list_documents(None).unwrap(), vec![ghost]);
}

#[test]
fn test_document_handles_are_idempotent_references() {
    let client = client();
    let users = client.collection("users").unwrap();
    let first = users.document("alice").unwrap();
    first.set(doc! { "age": 30 }, false).unwrap();

    let second = users.document("alice").unwrap();
    assert_eq!(first, second);
    assert_eq!(second.get().unwrap().get("age"), Some(&Bson::Int32(30)));
}

#[test]
fn test_document_without_name_gets_generated_id() {
    let client = client();
    let users = client.collection("users").unwrap();

    let first = users.document(None).unwrap();
    let second = users.document(None).unwrap();

    assert_eq!(first.id(), "auto-0");
    assert_eq!(second.id(), "auto-1");
}

#[test]
fn test_random_ids_by_default() {
    let client = mockfire::in_memory();
    let users = client.collection("users").unwrap();

    let (_, first) = users.add(doc! { "x": 1 }, None).unwrap();
    let (_, second) = users.add(doc! { "x": 1 }, None).unwrap();

    assert_eq!(first.id().len(), 20);
    assert!(first.id().chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(first.id(), second.id());
    assert_eq!(users.get().unwrap().len(), 2);
}

#[test]
fn test_add_with_explicit_id_conflicts() {
    let client = client();
    let users = client.collection("users").unwrap();

    users.add(doc! { "x": 1 }, "a").unwrap();
    let err = users.add(doc! { "x": 2 }, "a").unwrap_err();

    assert!(matches!(err, ClientError::AlreadyExists(_)));
    assert!(err.is_conflict());
    assert_eq!(err.code(), 409);
    assert_eq!(users.document("a").unwrap().get().unwrap().to_dict(), doc! { "x": 1 });
}

#[test]
fn test_add_uses_id_field() {
    let client = client();
    let users = client.collection("users").unwrap();

    let (_, named) = users.add(doc! { "id": "bob", "x": 1 }, None).unwrap();
    let (_, numbered) = users.add(doc! { "id": 7, "x": 2 }, None).unwrap();

    assert_eq!(named.id(), "bob");
    assert_eq!(numbered.id(), "7");
    assert!(matches!(
        users.add(doc! { "id": true }, None),
        Err(ClientError::InvalidArgument(_))
    ));
}

#[test]
fn test_add_conflicts_with_materialized_placeholder() {
    let client = client();
    let users = client.collection("users").unwrap();
    users.document("a").unwrap();

    assert!(matches!(users.add(doc! { "x": 1 }, "a"), Err(ClientError::AlreadyExists(_))));
}

#[test]
fn test_add_returns_creation_time() {
    let client = client();
    let (created, _) = client
        .collection("users")
        .unwrap()
        .add(doc! { "x": 1 }, "a")
        .unwrap();

    assert!(created.seconds() > 0);
    assert!(created.to_datetime().is_some());
}

#[test]
fn test_collection_get_orders_by_id() {
    let client = client();
    seed_scores(&client);

    let ids = client
        .collection("scores")
        .unwrap()
        .get()
        .unwrap()
        .iter()
        .map(|snapshot| snapshot.id().to_string())
        .collect::<Vec<_>>();

    assert_eq!(ids, vec!["a", "b", "c", "d"]);
}

#[test]
fn test_list_documents_uses_native_order() {
    let client = client();
    seed_scores(&client);

    let ids = client
        .collection("scores")
        .unwrap()
        .list_documents(Some(1))
        .unwrap()
        .iter()
        .map(|reference| reference.id().to_string())
        .collect::<Vec<_>>();

    assert_eq!(ids, vec!["d", "a", "c", "b"]);
}

#[test]
fn test_where_filters() {
    let client = client();
    seed_scores(&client);

    let query = client.collection("scores").unwrap().where_("n", ">", 5).unwrap();

    assert_eq!(values(query.get(), "n"), vec![Bson::Int32(8), Bson::Int32(10)]);
}

#[test]
fn test_where_and_order_by_keep_large_integers_exact() {
    let client = client();
    let big = client.collection("big").unwrap();
    big.add(doc! { "n": 9_007_199_254_740_992_i64 }, "a").unwrap();
    big.add(doc! { "n": 9_007_199_254_740_993_i64 }, "b").unwrap();

    let ids = |query: Query| query.get().map(|s| s.id().to_string()).collect::<Vec<_>>();

    assert_eq!(ids(big.where_("n", "==", 9_007_199_254_740_993_i64).unwrap()), vec!["b"]);
    assert_eq!(ids(big.where_("n", ">", 9_007_199_254_740_992_i64).unwrap()), vec!["b"]);
    assert_eq!(ids(big.order_by("n", SortDirection::Descending).unwrap()), vec!["b", "a"]);
}

#[test]
fn test_where_matches_object_ids_exactly() {
    let client = client();
    let items = client.collection("items").unwrap();
    let owner = bson::oid::ObjectId::from_bytes([1; 12]);
    items.add(doc! { "owner": owner }, "a").unwrap();
    items.add(doc! { "owner": bson::oid::ObjectId::from_bytes([2; 12]) }, "b").unwrap();
    items.add(doc! { "owner": Bson::Null }, "c").unwrap();

    let matched = items.where_("owner", "==", owner).unwrap();

    assert_eq!(matched.get().map(|s| s.id().to_string()).collect::<Vec<_>>(), vec!["a"]);
}

#[test]
fn test_order_by_descending_then_limit() {
    let client = client();
    seed_scores(&client);

    let query = client
        .collection("scores")
        .unwrap()
        .order_by("n", SortDirection::Descending)
        .unwrap()
        .limit(2);

    assert_eq!(values(query.get(), "n"), vec![Bson::Int32(10), Bson::Int32(8)]);
}

#[test]
fn test_collection_limit() {
    let client = client();
    seed_scores(&client);

    let query = client.collection("scores").unwrap().limit(3).unwrap();

    assert_eq!(values(query.get(), "n"), vec![Bson::Int32(3), Bson::Int32(5), Bson::Int32(8)]);
}

#[test]
fn test_query_is_a_point_in_time_capture() {
    let client = client();
    seed_scores(&client);
    let scores = client.collection("scores").unwrap();

    let query = scores.where_("n", ">=", 5).unwrap();
    scores.add(doc! { "n": 100 }, "e").unwrap();

    assert_eq!(query.len(), 3);
    assert_eq!(query.get().count(), query.get().count());
}

#[test]
fn test_where_rejects_unsupported_operator() {
    let client = client();
    seed_scores(&client);

    let err = client
        .collection("scores")
        .unwrap()
        .where_("n", "in", 5)
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidArgument(_)));
    assert_eq!(err.code(), 400);
}

#[test]
fn test_where_on_missing_field_errors() {
    let client = client();
    let scores = client.collection("scores").unwrap();
    scores.add(doc! { "n": 1 }, "a").unwrap();
    scores.add(doc! { "m": 1 }, "b").unwrap();

    assert!(matches!(
        scores.where_("n", "==", 1),
        Err(ClientError::FieldNotFound { .. })
    ));
}

#[test]
fn test_where_on_missing_field_skips_when_configured() {
    let client = MockFirestore::builder(InMemoryStore::new())
        .missing_fields(MissingFieldPolicy::Skip)
        .build();
    let scores = client.collection("scores").unwrap();
    scores.add(doc! { "n": 1 }, "a").unwrap();
    scores.add(doc! { "m": 1 }, "b").unwrap();

    let query = scores.where_("n", "==", 1).unwrap();

    assert_eq!(query.len(), 1);
    assert_eq!(query.get().next().unwrap().id(), "a");
}

#[test]
fn test_sub_collections() {
    let client = client();
    let alice = client.collection("users").unwrap().document("alice").unwrap();
    alice.set(doc! { "name": "Alice" }, false).unwrap();

    let posts = alice.collection("posts").unwrap();
    posts.add(doc! { "title": "Hello" }, "p1").unwrap();

    assert_eq!(posts.path().to_string(), "users/alice/posts");
    assert_eq!(posts.parent(), Some(alice.clone()));
    assert_eq!(posts.get().unwrap().len(), 1);
    assert_eq!(
        posts.document("p1").unwrap().get().unwrap().get("title"),
        Some(&Bson::String("Hello".into()))
    );

    // A sub-collection is just another key of its document.
    assert!(alice.get().unwrap().get("posts").is_some());
}

#[test]
fn test_sub_collection_of_deleted_document() {
    let client = client();
    let doc = client.collection("c").unwrap().document("d").unwrap();
    doc.delete().unwrap();

    assert!(matches!(doc.collection("sub"), Err(ClientError::NotFound(_))));
}

#[test]
fn test_parent_handles() {
    let client = client();
    let users = client.collection("users").unwrap();
    let alice = users.document("alice").unwrap();

    assert_eq!(alice.parent(), users);
    assert_eq!(users.parent(), None);
    assert_eq!(users.id(), "users");
}

#[test]
fn test_invalid_names() {
    let client = client();

    assert!(matches!(client.collection(""), Err(ClientError::InvalidArgument(_))));
    assert!(matches!(
        client.collection("users").unwrap().document("a/b"),
        Err(ClientError::InvalidArgument(_))
    ));
}

#[test]
fn test_reset_clears_everything() {
    let client = client();
    seed_scores(&client);
    let stale = client.collection("scores").unwrap();

    client.reset();

    assert!(client.collection("scores").unwrap().get().unwrap().is_empty());
    assert!(client.collection("other").unwrap().get().unwrap().is_empty());
    assert_eq!(client.collections().unwrap().len(), 2);
    assert_eq!(stale.get().unwrap().len(), 0);
}

#[test]
fn test_stale_handle_after_reset() {
    let client = client();
    let users = client.collection("users").unwrap();

    client.reset();

    assert!(matches!(users.get(), Err(ClientError::NotFound(_))));
}

#[test]
fn test_collections_lists_top_level() {
    let client = client();
    client.collection("b").unwrap();
    client.collection("a").unwrap();

    let names = client
        .collections()
        .unwrap()
        .iter()
        .map(|collection| collection.id().to_string())
        .collect::<Vec<_>>();

    assert_eq!(names, vec!["b", "a"]);
}

#[test]
fn test_snapshot_is_isolated_from_later_writes() {
    let client = client();
    let doc = client.collection("c").unwrap().document("d").unwrap();
    doc.set(doc! { "a": 1 }, false).unwrap();

    let snapshot = doc.get().unwrap();
    doc.set(doc! { "a": 2 }, false).unwrap();

    assert_eq!(snapshot.get("a"), Some(&Bson::Int32(1)));
    assert!(snapshot.create_time().seconds() > 0);
}

#[test]
fn test_typed_documents() {
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct User {
        name: String,
        age: i32,
    }

    let client = client();
    let doc = client.collection("users").unwrap().document("alice").unwrap();
    let alice = User { name: "Alice".to_string(), age: 30 };

    doc.set_from(&alice, false).unwrap();

    let snapshot = doc.get().unwrap();
    assert_eq!(snapshot.deserialize::<User>().unwrap(), alice);
    assert_eq!(snapshot.to_json().unwrap(), serde_json::json!({ "name": "Alice", "age": 30 }));
    assert!(matches!(doc.set_from(&5, false), Err(ClientError::Serialization(_))));
}
