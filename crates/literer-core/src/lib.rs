//! Core domain models and logic for literer
//!
//! This crate contains:
//! - Domain models (Publication, TargetJournal, Chunk)
//! - Token-budgeted paragraph chunking
//! - The feedback / revision loop over a completion service

pub mod chunk;
pub mod completion;
pub mod context;
pub mod error;
pub mod feedback;
pub mod publication;
pub mod target;

pub use chunk::{Chunk, Chunker, DEFAULT_DELIMITER, join_chunks, split};
pub use completion::CompletionService;
pub use context::ModelContext;
pub use error::{Error, Result};
pub use feedback::{DEFAULT_FEEDBACK_BUDGET, FeedbackLoop, FeedbackRecord, FeedbackRound};
pub use literer_tokens::{ModelId, TokenCount, TokenCounter};
pub use publication::Publication;
pub use target::TargetJournal;
