// src/infrastructure/mod.rs
pub mod database;
pub mod redis_pool;
pub mod repositories;
pub mod security;
pub mod time;
