//! Repository layer over the local SQLite schema

pub mod state_repo;

pub use state_repo::StateRepo;
