//! Lexicon matcher: case-insensitive substring keyword counting.
//!
//! Matching is plain containment on the lower-cased text. There is no
//! tokenization and no word boundary handling, so `"take"` also matches
//! inside `"mistake"`.

/// Keyword lists grouped by category, in a fixed category order.
#[derive(Debug, Clone)]
pub struct Lexicon<K> {
    categories: Vec<(K, Vec<String>)>,
}

impl<K: Copy + PartialEq> Lexicon<K> {
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// Append a category. Keywords are stored lower-cased; empty ones are dropped.
    pub fn with_category<I, S>(mut self, key: K, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self.categories.push((key, keywords));
        self
    }

    /// Number of keywords of each category present in `text`, in category order.
    pub fn score(&self, text: &str) -> Vec<(K, usize)> {
        let lower = text.to_lowercase();
        self.categories
            .iter()
            .map(|(key, keywords)| (*key, count_in_lower(&lower, keywords)))
            .collect()
    }

    /// Keywords registered for `key`.
    pub fn keywords(&self, key: K) -> &[String] {
        self.categories
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, kws)| kws.as_slice())
            .unwrap_or_default()
    }

    pub fn categories(&self) -> impl Iterator<Item = K> + '_ {
        self.categories.iter().map(|(k, _)| *k)
    }
}

impl<K: Copy + PartialEq> Default for Lexicon<K> {
    fn default() -> Self {
        Self::new()
    }
}

fn count_in_lower(lower: &str, keywords: &[String]) -> usize {
    keywords.iter().filter(|k| lower.contains(k.as_str())).count()
}

/// Whether any keyword occurs in `text` (case-insensitive).
pub fn contains_any<S: AsRef<str>>(text: &str, keywords: &[S]) -> bool {
    first_match(text, keywords).is_some()
}

/// The first keyword, in list order, that occurs in `text` (case-insensitive).
pub fn first_match<'k, S: AsRef<str>>(text: &str, keywords: &'k [S]) -> Option<&'k str> {
    let lower = text.to_lowercase();
    keywords
        .iter()
        .map(AsRef::as_ref)
        .find(|k| !k.is_empty() && lower.contains(&k.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Cat {
        A,
        B,
    }

    fn lexicon() -> Lexicon<Cat> {
        Lexicon::new()
            .with_category(Cat::A, ["pain", "Ache"])
            .with_category(Cat::B, ["take", "dose", "dosage"])
    }

    #[test]
    fn counts_distinct_keywords_case_insensitively() {
        let scores = lexicon().score("PAIN and an ACHE, what DOSAGE should I take?");
        assert_eq!(scores, vec![(Cat::A, 2), (Cat::B, 2)]);
    }

    #[test]
    fn repeated_keyword_counts_once() {
        let scores = lexicon().score("pain pain pain");
        assert_eq!(scores[0], (Cat::A, 1));
    }

    #[test]
    fn substring_containment_without_word_boundaries() {
        let scores = lexicon().score("that was a mistake");
        assert_eq!(scores[1], (Cat::B, 1));
    }

    #[test]
    fn empty_text_scores_zero() {
        assert!(lexicon().score("").iter().all(|(_, n)| *n == 0));
    }

    #[test]
    fn keywords_are_lowercased() {
        assert_eq!(lexicon().keywords(Cat::A), ["pain", "ache"]);
    }

    #[test]
    fn first_match_respects_list_order() {
        let keywords = ["stroke", "chest pain"];
        assert_eq!(first_match("Chest pain after a STROKE", &keywords), Some("stroke"));
        assert_eq!(first_match("all fine", &keywords), None);
        assert!(contains_any("I have CHEST PAIN", &keywords));
    }
}
