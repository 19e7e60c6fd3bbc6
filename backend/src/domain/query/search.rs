//! Search query tokenisation.

use crate::domain::text::word_regex;

/// Lower-cased word terms extracted from a free-text query.
///
/// ## Invariants
/// - At least one term.
/// - Terms are unique and keep their first-seen order.
///
/// # Examples
/// ```
/// use docvault::domain::query::SearchTerms;
///
/// let terms = SearchTerms::parse("Andela, TIA andela!").unwrap();
/// assert_eq!(terms.as_slice(), ["andela", "tia"]);
/// assert!(SearchTerms::parse("  ?! ").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerms(Vec<String>);

impl SearchTerms {
    /// Extract terms from `query`; `None` when it holds no word characters.
    pub fn parse(query: &str) -> Option<Self> {
        let lowered = query.to_lowercase();
        let mut terms: Vec<String> = Vec::new();
        for found in word_regex().find_iter(&lowered) {
            let term = found.as_str();
            if !terms.iter().any(|existing| existing == term) {
                terms.push(term.to_owned());
            }
        }
        if terms.is_empty() {
            None
        } else {
            Some(Self(terms))
        }
    }

    /// Borrow the terms.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Copy the terms into an owned list.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("andela", &["andela"])]
    #[case("Andela TIA", &["andela", "tia"])]
    #[case("tia-tia; tia", &["tia"])]
    #[case("  snake_case  words ", &["snake_case", "words"])]
    fn splits_on_word_runs(#[case] query: &str, #[case] expected: &[&str]) {
        let terms = SearchTerms::parse(query).expect("query has terms");
        assert_eq!(terms.as_slice(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("%%")]
    fn empty_queries_have_no_terms(#[case] query: &str) {
        assert!(SearchTerms::parse(query).is_none());
    }
}
