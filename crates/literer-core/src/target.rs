//! Target venue(s) a draft is aimed at

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetJournal {
    Single(String),
    Multiple(Vec<String>),
}

impl TargetJournal {
    pub fn single(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidTarget("journal name is empty".to_string()));
        }
        Ok(Self::Single(name.to_string()))
    }

    /// Build from a list of names; a single name collapses to `Single`
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(|n| n.into().trim().to_string())
            .collect();

        if names.is_empty() {
            return Err(Error::InvalidTarget("no journal given".to_string()));
        }
        if names.iter().any(|n| n.is_empty()) {
            return Err(Error::InvalidTarget("journal name is empty".to_string()));
        }

        if names.len() == 1 {
            Ok(Self::Single(names.remove(0)))
        } else {
            Ok(Self::Multiple(names))
        }
    }

    /// Natural-language phrase used in prompts
    pub fn describe(&self) -> String {
        match self {
            Self::Single(name) => format!("the following journal: '{}'", name),
            Self::Multiple(names) => format!(
                "one of the following journals: '{}'",
                names.join("', '")
            ),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Single(name) => vec![name.as_str()],
            Self::Multiple(names) => names.iter().map(String::as_str).collect(),
        }
    }
}
