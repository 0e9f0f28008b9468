//! Application services layer scaffolding.

pub mod auth;
pub mod error;
pub mod items;
pub mod repos;
pub mod tokens;
