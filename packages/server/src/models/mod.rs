pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod health;
pub mod roku;
pub mod shared;
pub mod storage;
pub mod videos;
