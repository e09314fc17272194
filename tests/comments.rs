//! Threaded comment listing and reply integrity.

mod support;

use quire::application::comments::{CommentError, CreateCommentCommand};
use quire::application::posts::CreatePostCommand;
use quire::domain::error::DomainError;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use support::{CacheMode, TestApp, build_app};

async fn post_by(app: &TestApp, name: &str) -> (quire::application::auth::Principal, Uuid) {
    let author = app.user(name).await;
    let post = app
        .state
        .posts
        .create(
            author,
            CreatePostCommand {
                title: format!("{name}'s post"),
                content: "body".into(),
                ..CreatePostCommand::default()
            },
        )
        .await
        .unwrap();
    (author, post.id)
}

fn command(post_id: Uuid, parent_id: Option<Uuid>, content: &str) -> CreateCommentCommand {
    CreateCommentCommand {
        post_id,
        parent_id,
        content: content.to_string(),
    }
}

#[tokio::test]
async fn threads_are_oldest_first_regardless_of_row_order() {
    let app = build_app(CacheMode::Memory);
    let (author, post_id) = post_by(&app, "ada").await;
    let comments = &app.state.comments;

    let c = comments.create(author, command(post_id, None, "C")).await.unwrap();
    let a = comments.create(author, command(post_id, None, "A")).await.unwrap();
    let b = comments
        .create(author, command(post_id, Some(a.comment.id), "B"))
        .await
        .unwrap();

    let base = OffsetDateTime::UNIX_EPOCH + Duration::days(1);
    app.store.set_comment_created_at(a.comment.id, base);
    app.store.set_comment_created_at(b.comment.id, base + Duration::minutes(1));
    app.store.set_comment_created_at(c.comment.id, base + Duration::minutes(2));

    let threads = comments.list_for_post(post_id).await.unwrap();

    let shape: Vec<(&str, Vec<&str>)> = threads
        .iter()
        .map(|thread| {
            (
                thread.comment.content.as_str(),
                thread.replies.iter().map(|reply| reply.content.as_str()).collect(),
            )
        })
        .collect();
    assert_eq!(shape, vec![("A", vec!["B"]), ("C", vec![])]);
}

#[tokio::test]
async fn replies_of_replies_are_not_expanded() {
    let app = build_app(CacheMode::Memory);
    let (author, post_id) = post_by(&app, "ada").await;
    let comments = &app.state.comments;

    let root = comments.create(author, command(post_id, None, "root")).await.unwrap();
    let reply = comments
        .create(author, command(post_id, Some(root.comment.id), "reply"))
        .await
        .unwrap();
    comments
        .create(author, command(post_id, Some(reply.comment.id), "nested"))
        .await
        .unwrap();

    let threads = comments.list_for_post(post_id).await.unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].replies.len(), 1);
    assert_eq!(threads[0].replies[0].content, "reply");
}

#[tokio::test]
async fn parent_from_another_post_is_rejected() {
    let app = build_app(CacheMode::Memory);
    let (author, first) = post_by(&app, "ada").await;
    let (_, second) = post_by(&app, "grace").await;
    let comments = &app.state.comments;

    let foreign = comments.create(author, command(second, None, "elsewhere")).await.unwrap();
    let err = comments
        .create(author, command(first, Some(foreign.comment.id), "reply"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CommentError::Domain(DomainError::Validation {
            field: "parent_id",
            ..
        })
    ));
    assert!(comments.list_for_post(first).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_parent_is_a_validation_error() {
    let app = build_app(CacheMode::Memory);
    let (author, post_id) = post_by(&app, "ada").await;

    let err = app
        .state
        .comments
        .create(author, command(post_id, Some(Uuid::new_v4()), "orphan"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CommentError::Domain(DomainError::Validation { .. })
    ));
}

#[tokio::test]
async fn comment_on_missing_post_is_not_found() {
    let app = build_app(CacheMode::Memory);
    let author = app.user("ada").await;

    let err = app
        .state
        .comments
        .create(author, command(Uuid::new_v4(), None, "hello"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CommentError::Domain(DomainError::NotFound { entity: "post" })
    ));
}

#[tokio::test]
async fn blank_content_is_rejected_before_lookup() {
    let app = build_app(CacheMode::Memory);
    let author = app.user("ada").await;

    let err = app
        .state
        .comments
        .create(author, command(Uuid::new_v4(), None, "   "))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CommentError::Domain(DomainError::Validation {
            field: "content",
            ..
        })
    ));
}

#[tokio::test]
async fn listing_for_unknown_post_is_empty() {
    let app = build_app(CacheMode::Memory);
    let threads = app.state.comments.list_for_post(Uuid::new_v4()).await.unwrap();
    assert!(threads.is_empty());
}

#[tokio::test]
async fn deleted_post_lists_no_threads() {
    let app = build_app(CacheMode::Memory);
    let (author, post_id) = post_by(&app, "ada").await;
    let comments = &app.state.comments;

    let top = comments.create(author, command(post_id, None, "first")).await.unwrap();
    comments
        .create(author, command(post_id, Some(top.comment.id), "reply"))
        .await
        .unwrap();
    assert_eq!(comments.list_for_post(post_id).await.unwrap().len(), 1);

    app.state.posts.delete(author, post_id).await.unwrap();
    assert!(app.state.posts.get(post_id).await.is_err());

    let threads = comments.list_for_post(post_id).await.unwrap();
    assert!(threads.is_empty());
}
