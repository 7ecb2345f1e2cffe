//! Literature review pipeline
//!
//! Derives search keywords for a topic, gathers publications, drafts one
//! review per publication and merges them into a combined review.

pub mod pipeline;
pub mod reviewer;

pub use pipeline::{LiteratureReview, ReviewOutput, ReviewRequest};
pub use reviewer::Reviewer;
