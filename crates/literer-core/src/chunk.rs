//! Token-budgeted paragraph chunking
//!
//! A text is cut into paragraphs at a delimiter and paragraphs are packed
//! greedily into chunks. Chunk boundaries only ever fall on delimiters, so
//! joining the chunks with the same delimiter restores the input exactly.

use std::ops::Range;

use literer_tokens::{ModelId, TokenCount, TokenCounter};
use serde::Serialize;

use crate::{Error, Result};

pub const DEFAULT_DELIMITER: &str = "\n\n";

/// Contiguous run of whole paragraphs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub index: usize,
    /// Paragraph indices covered by this chunk
    pub paragraphs: Range<usize>,
    pub text: String,
    pub tokens: usize,
}

impl AsRef<str> for Chunk {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

pub struct Chunker<C> {
    counter: C,
    delimiter: String,
}

impl<C: TokenCount> Chunker<C> {
    pub fn new(counter: C) -> Self {
        Self {
            counter,
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Split `text` into chunks of at most `budget` tokens.
    ///
    /// A chunk is closed right before the paragraph that would push its
    /// running total (paragraphs plus the separators between them) past
    /// the budget. Any single paragraph above the budget is an error.
    pub fn split(&self, text: &str, budget: usize) -> Result<Vec<Chunk>> {
        if budget == 0 {
            return Err(Error::InvalidBudget);
        }
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let spans = paragraph_spans(text, &self.delimiter);
        let counts: Vec<usize> = spans
            .iter()
            .map(|span| self.counter.count(&text[span.clone()]))
            .collect();

        if let Some((paragraph, &tokens)) = counts.iter().enumerate().find(|(_, t)| **t > budget)
        {
            return Err(Error::ChunkTooLarge {
                paragraph,
                tokens,
                budget,
            });
        }

        let separator = if self.delimiter.is_empty() {
            0
        } else {
            self.counter.count(&self.delimiter)
        };

        // prefix[i] = tokens in paragraphs 0..i
        let mut prefix = Vec::with_capacity(counts.len() + 1);
        prefix.push(0);
        for count in &counts {
            prefix.push(prefix[prefix.len() - 1] + count);
        }

        let chunk_tokens = |range: &Range<usize>| {
            prefix[range.end] - prefix[range.start] + separator * (range.len() - 1)
        };

        let mut chunks = Vec::new();
        let mut start = 0;
        for i in 1..counts.len() {
            if chunk_tokens(&(start..i + 1)) > budget {
                let range = start..i;
                let tokens = chunk_tokens(&range);
                chunks.push(self.make_chunk(text, &spans, chunks.len(), range, tokens));
                start = i;
            }
        }
        let range = start..counts.len();
        let tokens = chunk_tokens(&range);
        chunks.push(self.make_chunk(text, &spans, chunks.len(), range, tokens));

        tracing::debug!(
            paragraphs = counts.len(),
            chunks = chunks.len(),
            total_tokens = prefix[counts.len()],
            budget,
            "Split text into chunks"
        );

        Ok(chunks)
    }

    fn make_chunk(
        &self,
        text: &str,
        spans: &[Range<usize>],
        index: usize,
        paragraphs: Range<usize>,
        tokens: usize,
    ) -> Chunk {
        let bytes = spans[paragraphs.start].start..spans[paragraphs.end - 1].end;
        Chunk {
            index,
            paragraphs,
            text: text[bytes].to_string(),
            tokens,
        }
    }
}

/// Byte ranges of the paragraphs in `text`, same partition as `str::split`
fn paragraph_spans(text: &str, delimiter: &str) -> Vec<Range<usize>> {
    if delimiter.is_empty() {
        return vec![0..text.len()];
    }

    let mut spans = Vec::new();
    let mut start = 0;
    for (pos, _) in text.match_indices(delimiter) {
        spans.push(start..pos);
        start = pos + delimiter.len();
    }
    spans.push(start..text.len());
    spans
}

/// Chunk `text` with the tokenizer of `model` and the default delimiter
pub fn split(text: &str, budget: usize, model: &ModelId) -> Result<Vec<Chunk>> {
    let counter = TokenCounter::for_model(model)?;
    Chunker::new(counter).split(text, budget)
}

/// Reassemble chunks into the text they were cut from
pub fn join_chunks<S: AsRef<str>>(chunks: &[S], delimiter: &str) -> String {
    chunks
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(delimiter)
}
