// file: src/database/mod.rs
// description: database operations module exports
// reference: internal module structure

pub mod client;
pub mod insert;
pub mod rows;
pub mod schema;
pub mod sql;

pub use client::LanceDbClient;
pub use insert::BatchInserter;
pub use schema::SchemaManager;
