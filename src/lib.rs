pub mod app;
pub mod config;
pub mod details;
pub mod models;
pub mod render;
pub mod search;
pub mod tally;
pub mod tmdb;
pub mod trending;
pub mod utils;
