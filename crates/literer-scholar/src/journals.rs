//! Curated venue lists per research field

use crate::{Result, ScholarError};

// The first five of each list are the field's "top five"
const ECONOMICS: &[&str] = &[
    "American Economic Review",
    "Econometrica",
    "Journal of Political Economy",
    "Quarterly Journal of Economics",
    "Review of Economic Studies",
    "Economic Journal",
    "European Economic Review",
    "Journal of the European Economic Association",
    "Review of Economics and Statistics",
    "Annual Review of Economics",
    "Journal of Economic Literature",
    "Journal of Economic Perspectives",
];

const FINANCE: &[&str] = &[
    "Journal of Finance",
    "Journal of Financial Economics",
    "Review of Financial Studies",
    "Journal of Financial and Quantitative Analysis",
    "Journal of Accounting and Economics",
    "Journal of Banking and Finance",
    "Quantitative Finance",
];

pub fn fields() -> &'static [&'static str] {
    &["Economics", "Finance"]
}

/// Venues for `field`; only the top five when `top5` is set
pub fn top_journals(field: &str, top5: bool) -> Result<Vec<String>> {
    let list = match field {
        "Economics" => ECONOMICS,
        "Finance" => FINANCE,
        _ => return Err(ScholarError::UnknownField(field.to_string())),
    };

    let take = if top5 { 5 } else { list.len() };
    Ok(list.iter().take(take).map(|s| s.to_string()).collect())
}
