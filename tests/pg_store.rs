//! PostgreSQL annotation store tests
//!
//! Ignored by default; see `common::pg` for the required `DATABASE_URL`.

mod common;

use assert_matches::assert_matches;
use serial_test::serial;

use lecotes::backend::annotations::EngineError;

use common::pg::{seed_text, seed_user, setup};

#[tokio::test]
#[ignore]
#[serial]
async fn test_merge_widens_range() {
    let (pool, engine) = setup().await;
    let owner = seed_user(&pool, "owner").await;
    let other = seed_user(&pool, "other").await;
    let text_id = seed_text(&pool, owner.id).await;

    let first = engine.create(text_id, owner.id, "anger", 10, 20).await.unwrap();
    assert!(!first.is_merged());

    let second = engine.create(text_id, other.id, "goddess", 5, 15).await.unwrap();
    assert!(second.is_merged());
    assert_eq!(second.annotation().id, first.annotation().id);
    assert_eq!(second.annotation().range_start, 5);
    assert_eq!(second.annotation().range_end, 20);

    let listing = engine.list_for_text(text_id).await.unwrap();
    assert_eq!(listing.annotations.len(), 1);
    assert_eq!(listing.replies.len(), 1);
    assert_eq!(listing.replies[0].reply.content, "goddess");
    assert_eq!(listing.replies[0].username, other.username);
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_adjacent_ranges_do_not_merge() {
    let (pool, engine) = setup().await;
    let owner = seed_user(&pool, "owner").await;
    let text_id = seed_text(&pool, owner.id).await;

    engine.create(text_id, owner.id, "a", 0, 5).await.unwrap();
    let second = engine.create(text_id, owner.id, "b", 5, 9).await.unwrap();
    assert!(!second.is_merged());
    assert_eq!(engine.list_for_text(text_id).await.unwrap().annotations.len(), 2);
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_votes_are_unique_per_user() {
    let (pool, engine) = setup().await;
    let owner = seed_user(&pool, "owner").await;
    let voter = seed_user(&pool, "voter").await;
    let text_id = seed_text(&pool, owner.id).await;
    let annotation = engine.create(text_id, owner.id, "a", 0, 5).await.unwrap();
    let annotation_id = annotation.annotation().id;

    let receipt = engine.vote(annotation_id, voter.id, -1).await.unwrap();
    assert_eq!(receipt.votes, -1);

    assert_matches!(
        engine.vote(annotation_id, voter.id, 1).await,
        Err(EngineError::AlreadyVoted)
    );

    let listing = engine.list_for_text(text_id).await.unwrap();
    assert_eq!(listing.annotations[0].annotation.votes, -1);
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_delete_cascades_replies() {
    let (pool, engine) = setup().await;
    let owner = seed_user(&pool, "owner").await;
    let author = seed_user(&pool, "author").await;
    let text_id = seed_text(&pool, owner.id).await;

    let created = engine.create(text_id, author.id, "a", 0, 10).await.unwrap();
    engine.create(text_id, owner.id, "b", 3, 6).await.unwrap();

    engine
        .delete_annotation(created.annotation().id, owner.id)
        .await
        .unwrap();

    let listing = engine.list_for_text(text_id).await.unwrap();
    assert!(listing.annotations.is_empty());
    assert!(listing.replies.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
#[serial]
async fn test_concurrent_overlapping_creates_merge_without_conflicts() {
    let (pool, engine) = setup().await;
    let owner = seed_user(&pool, "owner").await;
    let text_id = seed_text(&pool, owner.id).await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let engine = engine.clone();
        let user_id = owner.id;
        handles.push(tokio::spawn(async move {
            engine
                .create(text_id, user_id, &format!("note {}", i), i, i + 10)
                .await
        }));
    }
    for handle in handles {
        let outcome = handle.await.unwrap();
        assert!(outcome.is_ok(), "create failed: {:?}", outcome.err());
    }

    let listing = engine.list_for_text(text_id).await.unwrap();
    assert_eq!(listing.annotations.len(), 1);
    assert_eq!(listing.replies.len(), 7);
    let annotation = &listing.annotations[0].annotation;
    assert_eq!((annotation.range_start, annotation.range_end), (0, 17));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
#[serial]
async fn test_concurrent_disjoint_creates_stay_separate() {
    let (pool, engine) = setup().await;
    let owner = seed_user(&pool, "owner").await;
    let text_id = seed_text(&pool, owner.id).await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let engine = engine.clone();
        let user_id = owner.id;
        handles.push(tokio::spawn(async move {
            engine.create(text_id, user_id, "note", i * 5, i * 5 + 5).await
        }));
    }
    for handle in handles {
        assert!(!handle.await.unwrap().unwrap().is_merged());
    }

    assert_eq!(engine.list_for_text(text_id).await.unwrap().annotations.len(), 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
#[serial]
async fn test_concurrent_duplicate_votes_report_already_voted() {
    let (pool, engine) = setup().await;
    let owner = seed_user(&pool, "owner").await;
    let voter = seed_user(&pool, "voter").await;
    let text_id = seed_text(&pool, owner.id).await;
    let annotation_id = engine
        .create(text_id, owner.id, "a", 0, 5)
        .await
        .unwrap()
        .annotation()
        .id;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = engine.clone();
        let voter_id = voter.id;
        handles.push(tokio::spawn(async move {
            engine.vote(annotation_id, voter_id, 1).await
        }));
    }

    let mut recorded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => recorded += 1,
            Err(err) => assert_matches!(err, EngineError::AlreadyVoted),
        }
    }
    assert_eq!(recorded, 1);

    let listing = engine.list_for_text(text_id).await.unwrap();
    assert_eq!(listing.annotations[0].annotation.votes, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
#[serial]
async fn test_merge_racing_delete_leaves_consistent_rows() {
    let (pool, engine) = setup().await;
    let owner = seed_user(&pool, "owner").await;
    let text_id = seed_text(&pool, owner.id).await;
    let target = engine
        .create(text_id, owner.id, "target", 10, 20)
        .await
        .unwrap()
        .annotation()
        .id;

    let merging = {
        let engine = engine.clone();
        let user_id = owner.id;
        tokio::spawn(async move { engine.create(text_id, user_id, "late", 15, 25).await })
    };
    let deleting = {
        let engine = engine.clone();
        let user_id = owner.id;
        tokio::spawn(async move { engine.delete_annotation(target, user_id).await })
    };

    let merged = merging.await.unwrap().unwrap();
    deleting.await.unwrap().unwrap();

    // Either the merge landed first and was deleted with its target, or the
    // submission arrived after the delete and became a new annotation.
    let listing = engine.list_for_text(text_id).await.unwrap();
    if merged.is_merged() {
        assert!(listing.annotations.is_empty());
        assert!(listing.replies.is_empty());
    } else {
        assert_eq!(listing.annotations.len(), 1);
        assert_eq!(listing.annotations[0].annotation.range_start, 15);
    }
}
