//! Search query builder

use tracing::warn;

use crate::{Result, ScholarError};

/// The public API refuses larger pages
pub const MAX_LIMIT: usize = 100;

pub const DEFAULT_LIMIT: usize = 30;

pub const PUBLICATION_TYPES: &[&str] = &[
    "Review",
    "JournalArticle",
    "CaseReport",
    "ClinicalTrial",
    "Dataset",
    "Editorial",
    "LettersAndComments",
    "MetaAnalysis",
    "News",
    "Study",
    "Book",
    "BookSection",
];

pub const FIELDS_OF_STUDY: &[&str] = &[
    "Computer Science",
    "Medicine",
    "Chemistry",
    "Biology",
    "Materials Science",
    "Physics",
    "Geology",
    "Psychology",
    "Art",
    "History",
    "Geography",
    "Sociology",
    "Business",
    "Political Science",
    "Economics",
    "Philosophy",
    "Mathematics",
    "Engineering",
    "Environmental Science",
    "Agricultural and Food Sciences",
    "Education",
    "Law",
    "Linguistics",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    pub limit: usize,
    pub year_start: Option<u32>,
    pub year_end: Option<u32>,
    pub venues: Vec<String>,
    pub fields_of_study: Vec<String>,
    pub publication_types: Vec<String>,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            limit: DEFAULT_LIMIT,
            year_start: None,
            year_end: None,
            venues: Vec::new(),
            fields_of_study: Vec::new(),
            publication_types: Vec::new(),
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        if limit > MAX_LIMIT {
            warn!(
                requested = limit,
                max = MAX_LIMIT,
                "Semantic Scholar returns at most {} papers per search; capping",
                MAX_LIMIT
            );
        }
        self.limit = limit.min(MAX_LIMIT);
        self
    }

    pub fn years(mut self, start: Option<u32>, end: Option<u32>) -> Self {
        self.year_start = start;
        self.year_end = end;
        self
    }

    pub fn venues<I, S>(mut self, venues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.venues = venues.into_iter().map(Into::into).collect();
        self
    }

    pub fn fields_of_study<I, S>(mut self, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields_of_study = validated(fields, FIELDS_OF_STUDY, "field of study")?;
        Ok(self)
    }

    pub fn publication_types<I, S>(mut self, types: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.publication_types = validated(types, PUBLICATION_TYPES, "publication type")?;
        Ok(self)
    }

    /// `2020`, `2018-2022`, `2018-` or `-2022`
    pub fn year_range(&self) -> Option<String> {
        match (self.year_start, self.year_end) {
            (None, None) => None,
            (Some(start), Some(end)) if start == end => Some(start.to_string()),
            (start, end) => Some(format!(
                "{}-{}",
                start.map(|y| y.to_string()).unwrap_or_default(),
                end.map(|y| y.to_string()).unwrap_or_default()
            )),
        }
    }

    /// Query-string pairs for `/paper/search`
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", self.keyword.clone()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(years) = self.year_range() {
            params.push(("year", years));
        }
        if !self.venues.is_empty() {
            params.push(("venue", self.venues.join(",")));
        }
        if !self.fields_of_study.is_empty() {
            params.push(("fieldsOfStudy", self.fields_of_study.join(",")));
        }
        if !self.publication_types.is_empty() {
            params.push(("publicationTypes", self.publication_types.join(",")));
        }
        params
    }
}

fn validated<I, S>(values: I, allowed: &[&str], kind: &'static str) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values
        .into_iter()
        .map(Into::into)
        .map(|value| {
            if allowed.contains(&value.as_str()) {
                Ok(value)
            } else {
                Err(ScholarError::InvalidFilter { kind, value })
            }
        })
        .collect()
}
