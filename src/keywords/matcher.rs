use crate::url::CrawlUrl;
use crate::KeywordError;
use regex::{Regex, RegexBuilder};

/// A keyword found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordHit {
    /// The keyword as it appears in the keyword list
    pub keyword: String,

    /// The page it was found on
    pub url: CrawlUrl,
}

#[derive(Debug, Clone)]
struct KeywordPattern {
    keyword: String,
    regex: Regex,
}

/// Whole-word, case-insensitive keyword matcher
///
/// Patterns are compiled once per run. Matching is pure: the caller decides
/// what to do with the returned hits.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    patterns: Vec<KeywordPattern>,
}

impl KeywordMatcher {
    /// Compiles a matcher for the given keywords, preserving their order
    ///
    /// Blank keywords are ignored. With `match_plurals`, a keyword ending in a
    /// word character also matches when followed by `s` or `es`, so "widget"
    /// finds "Widgets" while "cat" still does not match "category".
    ///
    /// # Examples
    ///
    /// ```
    /// use keyword_scout::KeywordMatcher;
    ///
    /// let matcher = KeywordMatcher::new(["cat"], true).unwrap();
    /// assert_eq!(matcher.matches("the CAT sat"), vec!["cat"]);
    /// assert!(matcher.matches("the category is broad").is_empty());
    /// ```
    pub fn new<I, S>(keywords: I, match_plurals: bool) -> Result<Self, KeywordError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut patterns = Vec::new();

        for keyword in keywords {
            let keyword = keyword.as_ref().trim();
            if keyword.is_empty() {
                continue;
            }

            let regex = RegexBuilder::new(&build_pattern(keyword, match_plurals))
                .case_insensitive(true)
                .build()
                .map_err(|source| KeywordError::Pattern {
                    keyword: keyword.to_string(),
                    source,
                })?;

            patterns.push(KeywordPattern {
                keyword: keyword.to_string(),
                regex,
            });
        }

        Ok(Self { patterns })
    }

    /// Returns the keywords in matching order
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.keyword.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns every keyword that occurs in `text`, in keyword order
    pub fn matches(&self, text: &str) -> Vec<&str> {
        self.patterns
            .iter()
            .filter(|p| p.regex.is_match(text))
            .map(|p| p.keyword.as_str())
            .collect()
    }

    /// Produces one hit per keyword found in a page's text
    pub fn match_page(&self, url: &CrawlUrl, text: &str) -> Vec<KeywordHit> {
        self.matches(text)
            .into_iter()
            .map(|keyword| KeywordHit {
                keyword: keyword.to_string(),
                url: url.clone(),
            })
            .collect()
    }
}

fn build_pattern(keyword: &str, match_plurals: bool) -> String {
    let escaped = regex::escape(keyword);
    let ends_in_word_char = keyword
        .chars()
        .last()
        .is_some_and(|c| c.is_alphanumeric() || c == '_');

    if match_plurals && ends_in_word_char {
        format!(r"\b{}(?:e?s)?\b", escaped)
    } else {
        format!(r"\b{}\b", escaped)
    }
}
