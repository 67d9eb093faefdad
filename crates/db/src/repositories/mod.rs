//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&SqlitePool` as the first argument. Multi-statement writes run
//! inside one transaction and commit once.

pub mod project_image_repo;
pub mod project_repo;
pub mod tag_repo;
pub mod yarn_repo;

pub use project_image_repo::ProjectImageRepo;
pub use project_repo::ProjectRepo;
pub use tag_repo::TagRepo;
pub use yarn_repo::YarnRepo;

/// SQL expression for the current time, in the layout used by column defaults.
pub(crate) const NOW_SQL: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// `?, ?, ?` with `n` placeholders, for `IN (...)` lists.
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
