//! Curio: a small self-hosted item catalog service.
//!
//! Bearer-token authenticated CRUD over a single `item` resource, with a
//! read-through, TTL-bounded cache in front of item retrieval.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
