//! Model-aware token counting using tiktoken

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tiktoken_rs::CoreBPE;
use tiktoken_rs::tokenizer::{Tokenizer, get_tokenizer};

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("No known tokenizer for model: {0}")]
    UnknownModel(String),

    #[error("Failed to load tokenizer for model {model}: {source}")]
    Load {
        model: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, TokenError>;

/// Identifier of a completion model, e.g. `gpt-3.5-turbo`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModelId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s.trim()))
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Anything that can measure text in tokens
pub trait TokenCount {
    fn count(&self, text: &str) -> usize;
}

impl<T: TokenCount + ?Sized> TokenCount for &T {
    fn count(&self, text: &str) -> usize {
        (**self).count(text)
    }
}

impl<T: TokenCount + ?Sized> TokenCount for Arc<T> {
    fn count(&self, text: &str) -> usize {
        (**self).count(text)
    }
}

/// Token counter bound to one model's BPE encoding
#[derive(Clone)]
pub struct TokenCounter {
    model: ModelId,
    tokenizer: Tokenizer,
    bpe: Arc<CoreBPE>,
}

impl TokenCounter {
    /// Resolve the tokenizer for `model`.
    ///
    /// Fails with [`TokenError::UnknownModel`] when tiktoken has no
    /// encoding registered for the identifier.
    pub fn for_model(model: &ModelId) -> Result<Self> {
        let tokenizer = Self::tokenizer_for(model)?;
        let bpe = tiktoken_rs::get_bpe_from_tokenizer(tokenizer).map_err(|source| {
            TokenError::Load {
                model: model.to_string(),
                source,
            }
        })?;

        Ok(Self {
            model: model.clone(),
            tokenizer,
            bpe: Arc::new(bpe),
        })
    }

    /// Look up the encoding family without loading it
    pub fn tokenizer_for(model: &ModelId) -> Result<Tokenizer> {
        get_tokenizer(model.as_str()).ok_or_else(|| TokenError::UnknownModel(model.to_string()))
    }

    pub fn model(&self) -> &ModelId {
        &self.model
    }

    pub fn tokenizer(&self) -> Tokenizer {
        self.tokenizer
    }

    /// Count tokens for a single string
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Count tokens for multiple strings
    pub fn count_batch(&self, texts: &[&str]) -> Vec<usize> {
        texts.iter().map(|text| self.count(text)).collect()
    }
}

impl TokenCount for TokenCounter {
    fn count(&self, text: &str) -> usize {
        TokenCounter::count(self, text)
    }
}

impl fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCounter")
            .field("model", &self.model)
            .field("tokenizer", &self.tokenizer)
            .finish()
    }
}

/// One-shot count of `text` under `model`'s tokenization
pub fn count_tokens(text: &str, model: &ModelId) -> Result<usize> {
    Ok(TokenCounter::for_model(model)?.count(text))
}
