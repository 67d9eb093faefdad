//! Row structs.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct matching a
//! database row, serialized with the field names the web client expects.
//! Request payloads are parsed by `yarnstash_core`, not deserialized here.

pub mod project;
pub mod project_image;
pub mod tag;
pub mod yarn;
