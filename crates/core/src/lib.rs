//! Domain logic for the yarn stash: entity field rules, label enums,
//! payload coercion, tag reconciliation, search keywords and file storage.
//!
//! This crate performs no database I/O so the rules can be exercised in
//! isolation and reused by the repository and HTTP layers.

pub mod error;
pub mod labels;
pub mod payload;
pub mod project;
pub mod search;
pub mod storage;
pub mod tags;
pub mod types;
pub mod yarn;
