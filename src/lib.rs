pub mod api;
pub mod cache;
pub mod config;
pub mod debounce;
pub mod error;
pub mod models;
pub mod observable;
pub mod services;
pub mod storage;
