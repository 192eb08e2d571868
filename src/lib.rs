pub mod app;
pub mod auth;
pub mod comments;
pub mod config;
pub mod error;
pub mod favorites;
pub mod images;
pub mod llm;
pub mod meal_logs;
pub mod nutrition;
pub mod planner;
pub mod profile;
pub mod recipe_api;
pub mod recipes;
pub mod shopping;
pub mod state;
pub mod storage;
