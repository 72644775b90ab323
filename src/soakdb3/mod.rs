// file: src/soakdb3/mod.rs
// description: soakdb3 client module exports
// reference: internal module structure

pub mod client;

pub use client::{BODY_TABLE, BodyField, Soakdb3Client};
