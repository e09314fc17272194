pub mod accounts;
pub mod auth;
pub mod comments;
pub mod error;
pub mod likes;
pub mod listing;
pub mod pagination;
pub mod posts;
pub mod repos;
pub mod tags;
