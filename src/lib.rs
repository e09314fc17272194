//! Blog backend: accounts, posts, tags, threaded comments and likes.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
