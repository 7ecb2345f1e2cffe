//! BibTeX cleanup

use lazy_static::lazy_static;
use literer_core::Publication;
use regex::Regex;

lazy_static! {
    // Semantic Scholar emits headers like `@['JournalArticle', 'Review']{Key,`
    static ref LIST_TYPED_HEADER: Regex = Regex::new(r"@\[[^\]]*\]\s*\{").unwrap();
}

/// Rewrite list-typed entry headers into plain `@article{` headers
pub fn clean_bibtex(text: &str) -> String {
    LIST_TYPED_HEADER.replace_all(text, "@article{").into_owned()
}

/// Cleaned BibTeX entries of all publications that have one, one per line
pub fn create_bibliography(publications: &[Publication]) -> String {
    publications
        .iter()
        .filter_map(|p| p.bibtex.as_deref())
        .map(clean_bibtex)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publication(id: &str, bibtex: Option<&str>) -> Publication {
        Publication {
            paper_id: id.to_string(),
            title: id.to_string(),
            authors: Vec::new(),
            year: None,
            venue: None,
            abstract_text: None,
            bibtex: bibtex.map(String::from),
            url: None,
        }
    }

    #[test]
    fn test_clean_list_header() {
        let raw = "@['JournalArticle', 'Review']{Doe2020Deep,\n title={Deep {L}earning}\n}";
        assert_eq!(
            clean_bibtex(raw),
            "@article{Doe2020Deep,\n title={Deep {L}earning}\n}"
        );
    }

    #[test]
    fn test_plain_header_untouched() {
        let raw = "@inproceedings{Roe2019,\n title={X}\n}";
        assert_eq!(clean_bibtex(raw), raw);
    }

    #[test]
    fn test_bibliography_skips_missing_entries() {
        let pubs = vec![
            publication("a", Some("@['JournalArticle']{A1,\n title={A}\n}")),
            publication("b", None),
            publication("c", Some("@book{C1,\n title={C}\n}")),
        ];

        assert_eq!(
            create_bibliography(&pubs),
            "@article{A1,\n title={A}\n}\n@book{C1,\n title={C}\n}"
        );
    }
}
