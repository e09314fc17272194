//! In-memory repositories and app builders shared by the integration tests.

#![allow(dead_code)]

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use bytes::Bytes;
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use quire::application::accounts::{AccountService, PasswordError, PasswordHasher};
use quire::application::auth::{AuthService, Principal};
use quire::application::comments::CommentService;
use quire::application::likes::LikeService;
use quire::application::listing::ListingService;
use quire::application::posts::PostService;
use quire::application::repos::{
    CommentsRepo, CreateCommentParams, CreatePostParams, CreateUserParams, HealthRepo, LikesRepo,
    NewLikeParams, PostsRepo, PostsWriteRepo, RepoError, TagsRepo, UsersRepo,
};
use quire::application::tags::TagService;
use quire::cache::{CacheBackend, CacheConfig, CacheError, JsonCache, MemoryCache};
use quire::config::{ListingSettings, ServerSettings};
use quire::domain::entities::{CommentRecord, PostRecord, TagRecord, UserRecord};
use quire::domain::posts::PostPatch;
use quire::domain::types::LikeTarget;
use quire::infra::http::{AppState, build_router};

pub const SECRET: &str = "integration-test-secret";

struct StoredPost {
    record: PostRecord,
    author_id: Uuid,
    deleted: bool,
}

struct StoredComment {
    record: CommentRecord,
    deleted: bool,
}

#[derive(Default)]
struct StoreState {
    users: Vec<UserRecord>,
    posts: Vec<StoredPost>,
    tags: Vec<TagRecord>,
    post_tags: Vec<(Uuid, Uuid)>,
    comments: Vec<StoredComment>,
    likes: Vec<NewLikeParams>,
    ticks: i64,
}

impl StoreState {
    /// Strictly increasing timestamps so ordering never depends on wall-clock resolution.
    fn tick(&mut self) -> OffsetDateTime {
        self.ticks += 1;
        OffsetDateTime::UNIX_EPOCH + time::Duration::days(20_000) + time::Duration::seconds(self.ticks)
    }

    fn post_with_tags(&self, stored: &StoredPost) -> PostRecord {
        let mut record = stored.record.clone();
        record.tags = self
            .post_tags
            .iter()
            .filter(|(post_id, _)| *post_id == record.id)
            .filter_map(|(_, tag_id)| self.tags.iter().find(|tag| tag.id == *tag_id).cloned())
            .collect();
        record.tags.sort_by(|a, b| a.name.cmp(&b.name));
        record
    }

    fn live_posts_newest_first(&self) -> Vec<PostRecord> {
        let mut posts: Vec<PostRecord> = self
            .posts
            .iter()
            .filter(|stored| !stored.deleted)
            .map(|stored| self.post_with_tags(stored))
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts
    }
}

/// Implements every repository trait over one mutex-guarded state.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
    list_calls: AtomicUsize,
}

impl MemoryStore {
    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap()
    }

    /// How many times the paginated listing query ran.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn set_comment_created_at(&self, id: Uuid, created_at: OffsetDateTime) {
        let mut state = self.state();
        let stored = state
            .comments
            .iter_mut()
            .find(|stored| stored.record.id == id)
            .expect("comment exists");
        stored.record.created_at = created_at;
    }

    pub fn post_snapshot(&self, id: Uuid) -> Option<PostRecord> {
        let state = self.state();
        state
            .posts
            .iter()
            .find(|stored| stored.record.id == id)
            .map(|stored| state.post_with_tags(stored))
    }

    pub fn live_like_rows(&self) -> usize {
        self.state().likes.len()
    }
}

#[async_trait]
impl UsersRepo for MemoryStore {
    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError> {
        let mut state = self.state();
        if state.users.iter().any(|user| user.username == params.username) {
            return Err(RepoError::Duplicate {
                constraint: "users_username_key".into(),
            });
        }
        if state.users.iter().any(|user| user.email == params.email) {
            return Err(RepoError::Duplicate {
                constraint: "users_email_key".into(),
            });
        }
        let now = state.tick();
        let user = UserRecord {
            id: Uuid::new_v4(),
            username: params.username,
            email: params.email,
            password_hash: params.password_hash,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError> {
        Ok(self.state().users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
        Ok(self.state().users.iter().find(|user| user.id == id).cloned())
    }
}

#[async_trait]
impl PostsRepo for MemoryStore {
    async fn list_posts(&self, offset: u64, limit: u32) -> Result<Vec<PostRecord>, RepoError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .state()
            .live_posts_newest_first()
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let state = self.state();
        Ok(state
            .posts
            .iter()
            .find(|stored| stored.record.id == id && !stored.deleted)
            .map(|stored| state.post_with_tags(stored)))
    }

    async fn list_posts_for_tag(&self, tag_id: Uuid) -> Result<Vec<PostRecord>, RepoError> {
        let state = self.state();
        Ok(state
            .live_posts_newest_first()
            .into_iter()
            .filter(|post| state.post_tags.contains(&(post.id, tag_id)))
            .collect())
    }
}

#[async_trait]
impl PostsWriteRepo for MemoryStore {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let mut state = self.state();
        let author = state
            .users
            .iter()
            .find(|user| user.id == params.author_id)
            .map(UserRecord::summary)
            .ok_or_else(|| RepoError::InvalidInput {
                message: "author does not exist".into(),
            })?;
        let now = state.tick();
        let id = Uuid::new_v4();

        for name in &params.tag_names {
            let existing = state.tags.iter().find(|tag| &tag.name == name).map(|tag| tag.id);
            let tag_id = match existing {
                Some(tag_id) => tag_id,
                None => {
                    let tag = TagRecord {
                        id: Uuid::new_v4(),
                        name: name.clone(),
                        created_at: now,
                        updated_at: now,
                    };
                    let tag_id = tag.id;
                    state.tags.push(tag);
                    tag_id
                }
            };
            if !state.post_tags.contains(&(id, tag_id)) {
                state.post_tags.push((id, tag_id));
            }
        }

        let stored = StoredPost {
            record: PostRecord {
                id,
                title: params.title,
                content: params.content,
                author,
                is_draft: params.is_draft,
                is_top: params.is_top,
                is_recommend: params.is_recommend,
                created_at: now,
                updated_at: now,
                tags: Vec::new(),
            },
            author_id: params.author_id,
            deleted: false,
        };
        let record = state.post_with_tags(&stored);
        state.posts.push(stored);
        Ok(record)
    }

    async fn update_post(&self, id: Uuid, patch: &PostPatch) -> Result<PostRecord, RepoError> {
        let mut state = self.state();
        let now = state.tick();
        let index = state
            .posts
            .iter()
            .position(|stored| stored.record.id == id && !stored.deleted)
            .ok_or(RepoError::NotFound)?;
        patch.apply_to(&mut state.posts[index].record, now);
        let snapshot = state.post_with_tags(&state.posts[index]);
        Ok(snapshot)
    }

    async fn soft_delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let mut state = self.state();
        let stored = state
            .posts
            .iter_mut()
            .find(|stored| stored.record.id == id && !stored.deleted)
            .ok_or(RepoError::NotFound)?;
        stored.deleted = true;
        Ok(())
    }
}

#[async_trait]
impl TagsRepo for MemoryStore {
    async fn find_tag_by_name(&self, name: &str) -> Result<Option<TagRecord>, RepoError> {
        Ok(self.state().tags.iter().find(|tag| tag.name == name).cloned())
    }
}

/// Rows come back in insertion order; callers are responsible for ordering.
#[async_trait]
impl CommentsRepo for MemoryStore {
    async fn create_comment(
        &self,
        params: CreateCommentParams,
    ) -> Result<CommentRecord, RepoError> {
        let mut state = self.state();
        let author = state
            .users
            .iter()
            .find(|user| user.id == params.author_id)
            .map(UserRecord::summary)
            .ok_or_else(|| RepoError::InvalidInput {
                message: "author does not exist".into(),
            })?;
        let record = CommentRecord {
            id: Uuid::new_v4(),
            content: params.content,
            author,
            post_id: params.post_id,
            parent_id: params.parent_id,
            created_at: state.tick(),
        };
        state.comments.push(StoredComment {
            record: record.clone(),
            deleted: false,
        });
        Ok(record)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<CommentRecord>, RepoError> {
        Ok(self
            .state()
            .comments
            .iter()
            .find(|stored| stored.record.id == id && !stored.deleted)
            .map(|stored| stored.record.clone()))
    }

    async fn list_top_level_comments(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<CommentRecord>, RepoError> {
        let state = self.state();
        let post_live = state
            .posts
            .iter()
            .any(|stored| stored.record.id == post_id && !stored.deleted);
        if !post_live {
            return Ok(Vec::new());
        }
        Ok(state
            .comments
            .iter()
            .filter(|stored| !stored.deleted)
            .filter(|stored| stored.record.post_id == post_id && stored.record.parent_id.is_none())
            .map(|stored| stored.record.clone())
            .collect())
    }

    async fn list_replies(&self, parent_ids: &[Uuid]) -> Result<Vec<CommentRecord>, RepoError> {
        Ok(self
            .state()
            .comments
            .iter()
            .filter(|stored| !stored.deleted)
            .filter(|stored| {
                stored
                    .record
                    .parent_id
                    .is_some_and(|parent| parent_ids.contains(&parent))
            })
            .map(|stored| stored.record.clone())
            .collect())
    }
}

#[async_trait]
impl LikesRepo for MemoryStore {
    async fn insert_like(&self, params: NewLikeParams) -> Result<bool, RepoError> {
        let mut state = self.state();
        let exists = state.likes.iter().any(|like| {
            like.user_id == params.user_id
                && like.target_id == params.target_id
                && like.target_type == params.target_type
        });
        if exists {
            return Ok(false);
        }
        state.likes.push(params);
        Ok(true)
    }

    async fn count_likes(
        &self,
        target_id: Uuid,
        target_type: LikeTarget,
    ) -> Result<u64, RepoError> {
        Ok(self
            .state()
            .likes
            .iter()
            .filter(|like| like.target_id == target_id && like.target_type == target_type)
            .count() as u64)
    }

    async fn has_liked(
        &self,
        user_id: Uuid,
        target_id: Uuid,
        target_type: LikeTarget,
    ) -> Result<bool, RepoError> {
        Ok(self.state().likes.iter().any(|like| {
            like.user_id == user_id && like.target_id == target_id && like.target_type == target_type
        }))
    }
}

#[async_trait]
impl HealthRepo for MemoryStore {
    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

/// Stores the password verbatim behind a marker; argon2 is covered by its own unit tests.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError> {
        Ok(digest.strip_prefix("plain:") == Some(password))
    }
}

/// Every operation fails as if the cache server were down.
pub struct UnreachableCache;

#[async_trait]
impl CacheBackend for UnreachableCache {
    async fn get(&self, _key: &str) -> Result<Option<Bytes>, CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn set(&self, _key: &str, _value: Bytes, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }
}

pub enum CacheMode {
    Memory,
    Unreachable,
    Disabled,
}

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    pub router: Router,
}

/// Invalidation runs inline so a write is fully applied before the next request.
pub fn cache_config() -> CacheConfig {
    CacheConfig {
        background_invalidation: false,
        ..CacheConfig::default()
    }
}

pub fn auth_service() -> AuthService {
    AuthService::new(&SecretString::new(SECRET.into()), time::Duration::hours(72))
}

pub fn build_app(mode: CacheMode) -> TestApp {
    build_app_with(mode, cache_config())
}

pub fn build_app_with(mode: CacheMode, config: CacheConfig) -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let cache = match mode {
        CacheMode::Memory => JsonCache::new(
            Arc::new(MemoryCache::new(config.capacity_non_zero())),
            config.operation_timeout,
        ),
        CacheMode::Unreachable => JsonCache::new(Arc::new(UnreachableCache), config.operation_timeout),
        CacheMode::Disabled => JsonCache::disabled(),
    };

    let auth = Arc::new(auth_service());
    let listing = ListingService::new(store.clone(), cache, &config);
    let state = AppState {
        accounts: Arc::new(AccountService::new(
            store.clone(),
            Arc::new(PlainHasher),
            auth.clone(),
        )),
        posts: Arc::new(PostService::new(store.clone(), store.clone(), listing.clone())),
        listing,
        comments: Arc::new(CommentService::new(store.clone(), store.clone())),
        likes: Arc::new(LikeService::new(store.clone(), store.clone(), store.clone())),
        tags: Arc::new(TagService::new(store.clone(), store.clone())),
        auth,
        health: store.clone(),
        listing_settings: ListingSettings {
            default_page_size: NonZeroU32::new(10).unwrap(),
            max_page_size: NonZeroU32::new(100).unwrap(),
        },
    };
    let server = ServerSettings {
        addr: "127.0.0.1:0".parse().unwrap(),
        base_path: String::new(),
        request_timeout: Duration::from_secs(5),
        graceful_shutdown: Duration::from_secs(1),
    };
    let router = build_router(state.clone(), &server);

    TestApp {
        store,
        state,
        router,
    }
}

impl TestApp {
    /// Register an account directly through the store and return its principal.
    pub async fn user(&self, name: &str) -> Principal {
        let user = self
            .store
            .create_user(CreateUserParams {
                username: name.to_string(),
                email: format!("{name}@example.com"),
                password_hash: format!("plain:{name}-password"),
            })
            .await
            .unwrap();
        Principal { user_id: user.id }
    }

    pub fn token_for(&self, principal: Principal) -> String {
        self.state.auth.issue(principal.user_id).unwrap().token
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
