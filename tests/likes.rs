//! Likes are idempotent per user and target.

mod support;

use quire::application::comments::CreateCommentCommand;
use quire::application::likes::LikeError;
use quire::application::posts::CreatePostCommand;
use quire::domain::error::DomainError;
use quire::domain::types::LikeTarget;
use uuid::Uuid;

use support::{CacheMode, build_app};

#[tokio::test]
async fn repeated_like_is_a_no_op_success() {
    let app = build_app(CacheMode::Memory);
    let author = app.user("ada").await;
    let reader = app.user("grace").await;
    let post = app
        .state
        .posts
        .create(
            author,
            CreatePostCommand {
                title: "likeable".into(),
                content: "body".into(),
                ..CreatePostCommand::default()
            },
        )
        .await
        .unwrap();

    let first = app.state.likes.like(reader, post.id, LikeTarget::Post).await.unwrap();
    let second = app.state.likes.like(reader, post.id, LikeTarget::Post).await.unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(app.state.likes.count(post.id, LikeTarget::Post).await.unwrap(), 1);
    assert_eq!(app.store.live_like_rows(), 1);

    app.state.likes.like(author, post.id, LikeTarget::Post).await.unwrap();
    assert_eq!(app.state.likes.count(post.id, LikeTarget::Post).await.unwrap(), 2);
}

#[tokio::test]
async fn likes_are_scoped_by_target_kind() {
    let app = build_app(CacheMode::Memory);
    let author = app.user("ada").await;
    let post = app
        .state
        .posts
        .create(
            author,
            CreatePostCommand {
                title: "post".into(),
                content: "body".into(),
                ..CreatePostCommand::default()
            },
        )
        .await
        .unwrap();
    let comment = app
        .state
        .comments
        .create(
            author,
            CreateCommentCommand {
                post_id: post.id,
                parent_id: None,
                content: "nice".into(),
            },
        )
        .await
        .unwrap();

    app.state
        .likes
        .like(author, comment.comment.id, LikeTarget::Comment)
        .await
        .unwrap();

    assert!(
        app.state
            .likes
            .has_liked(author, comment.comment.id, LikeTarget::Comment)
            .await
            .unwrap()
    );
    assert!(
        !app.state
            .likes
            .has_liked(author, post.id, LikeTarget::Post)
            .await
            .unwrap()
    );
    assert_eq!(
        app.state.likes.count(post.id, LikeTarget::Post).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn liking_a_missing_target_is_not_found() {
    let app = build_app(CacheMode::Memory);
    let reader = app.user("grace").await;

    let err = app
        .state
        .likes
        .like(reader, Uuid::new_v4(), LikeTarget::Comment)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LikeError::Domain(DomainError::NotFound { entity: "comment" })
    ));
    assert_eq!(app.store.live_like_rows(), 0);
}
