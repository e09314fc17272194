use std::sync::Arc;

use crate::application::accounts::AccountService;
use crate::application::auth::AuthService;
use crate::application::comments::CommentService;
use crate::application::likes::LikeService;
use crate::application::listing::ListingService;
use crate::application::posts::PostService;
use crate::application::repos::HealthRepo;
use crate::application::tags::TagService;
use crate::config::ListingSettings;

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub posts: Arc<PostService>,
    pub listing: ListingService,
    pub comments: Arc<CommentService>,
    pub likes: Arc<LikeService>,
    pub tags: Arc<TagService>,
    pub auth: Arc<AuthService>,
    pub health: Arc<dyn HealthRepo>,
    pub listing_settings: ListingSettings,
}
