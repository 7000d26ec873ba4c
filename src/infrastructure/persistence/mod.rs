//! Persistence Layer

pub mod sqlite;
