pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod normalize;
pub mod services;
pub mod utils;
