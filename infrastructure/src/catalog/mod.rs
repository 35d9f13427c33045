//! Static reference catalog
//!
//! Implements the domain [`CatalogRepository`](refdesk_domain::CatalogRepository)
//! over a list of entries bundled with the binary.

mod static_catalog;

pub use static_catalog::{CatalogError, StaticCatalog};
