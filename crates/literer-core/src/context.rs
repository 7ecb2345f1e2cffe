//! Per-run model selection

use std::sync::RwLock;

use literer_tokens::{ModelId, TokenCounter};

use crate::Result;

/// Holds the model selected for one pipeline run.
///
/// Operations take a snapshot with [`ModelContext::selected`] once at entry,
/// so a concurrent [`ModelContext::select`] never mixes models inside a
/// single invocation.
#[derive(Debug)]
pub struct ModelContext {
    selected: RwLock<ModelId>,
}

impl ModelContext {
    pub fn new(model: ModelId) -> Result<Self> {
        TokenCounter::tokenizer_for(&model)?;
        Ok(Self {
            selected: RwLock::new(model),
        })
    }

    /// Snapshot of the currently selected model
    pub fn selected(&self) -> ModelId {
        self.selected
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Switch to another model; rejected if it has no known tokenizer
    pub fn select(&self, model: ModelId) -> Result<()> {
        TokenCounter::tokenizer_for(&model)?;
        let mut guard = self
            .selected
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        tracing::info!(from = %*guard, to = %model, "Switching model");
        *guard = model;
        Ok(())
    }
}
