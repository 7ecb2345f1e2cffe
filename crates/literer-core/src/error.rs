use literer_tokens::TokenError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No known tokenizer for model: {model}")]
    UnknownModel { model: String },

    #[error(
        "Paragraph {paragraph} has {tokens} tokens, over the budget of {budget}; \
         raise the budget or split it manually"
    )]
    ChunkTooLarge {
        paragraph: usize,
        tokens: usize,
        budget: usize,
    },

    #[error("Chunk/feedback mismatch: {chunks} chunks but {feedback} feedback entries")]
    Alignment { chunks: usize, feedback: usize },

    #[error("Completion service failed on item {index}: {source}")]
    CompletionService {
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("Token budget must be greater than zero")]
    InvalidBudget,

    #[error("Invalid target journal: {0}")]
    InvalidTarget(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl From<TokenError> for Error {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::UnknownModel(model) => Error::UnknownModel { model },
            other => Error::Other(other.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
