//! Reference catalog module
//!
//! Entries are the reference content refdesk answers questions about.
//! The content itself is static; see the infrastructure layer for the
//! in-process catalog behind [`CatalogRepository`].

pub mod entities;
pub mod repository;

pub use entities::{Category, Entry, EntrySummary, RemoteDocument, SearchMatch, UnknownCategory};
pub use repository::CatalogRepository;
