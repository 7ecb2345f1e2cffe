//! Paper search for literer
//!
//! This crate provides:
//! - Semantic Scholar search client
//! - Search query builder with filter validation
//! - BibTeX cleanup and bibliography assembly
//! - Curated top-journal lists per field

pub mod bibliography;
pub mod client;
pub mod error;
pub mod journals;
pub mod query;

pub use bibliography::{clean_bibtex, create_bibliography};
pub use client::{PaperSearch, SemanticScholarClient};
pub use error::{Result, ScholarError};
pub use journals::top_journals;
pub use query::{MAX_LIMIT, SearchQuery};
