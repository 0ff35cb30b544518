//! Repositories backed by the hosted record service.
//!
//! Filters use the record service's query dialect
//! (`column=op.value`, `order=column.desc`).

mod profile;
mod story;

pub use profile::RestProfileRepository;
pub use story::RestStoryRepository;

/// Ask the record service to answer writes with the written rows.
pub(crate) const RETURN_REPRESENTATION: &str = "return=representation";

pub(crate) fn table_path(table: &str) -> String {
    format!("/rest/v1/{}", table)
}
