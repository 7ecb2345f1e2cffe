//! Publication record returned by paper search

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub paper_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub year: Option<u32>,
    pub venue: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub bibtex: Option<String>,
    pub url: Option<String>,
}

impl Publication {
    /// Render the record for a prompt. BibTeX is left out unless asked
    /// for, since it costs tokens and only matters for TeX citations.
    pub fn describe(&self, include_bibtex: bool) -> String {
        let mut out = format!("Title: {}\n", self.title);
        if !self.authors.is_empty() {
            out.push_str(&format!("Authors: {}\n", self.authors.join(", ")));
        }
        if let Some(year) = self.year {
            out.push_str(&format!("Year: {}\n", year));
        }
        if let Some(venue) = self.venue.as_deref().filter(|v| !v.is_empty()) {
            out.push_str(&format!("Venue: {}\n", venue));
        }
        if let Some(abstract_text) = &self.abstract_text {
            out.push_str(&format!("Abstract: {}\n", abstract_text));
        }
        if include_bibtex {
            if let Some(bibtex) = &self.bibtex {
                out.push_str(&format!("BibTeX: {}\n", bibtex));
            }
        }
        out
    }
}
