//! Accent-folding sub-query patterns
//!
//! A sub-query compiles into a sequence of character classes. The base
//! letters in [`FOLDS`] expand to the letter plus its accented variants; every
//! other character is a literal. No regex engine or Unicode normalization is
//! involved, so matching is identical on every platform.

/// Base letter and the class it expands to.
pub const FOLDS: &[(char, &str)] = &[
    ('a', "aáàâä"),
    ('c', "cç"),
    ('e', "eéèêë"),
    ('i', "iíìîï"),
    ('o', "oóòôö"),
    ('u', "uúùûü"),
];

fn folded_class(c: char) -> Option<&'static str> {
    FOLDS
        .iter()
        .find(|(base, _)| *base == c)
        .map(|(_, class)| *class)
}

// Multi-char lowercase forms keep their base letter ("İ" becomes "i").
fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

#[derive(Debug, Clone, PartialEq)]
enum CharClass {
    Literal(char),
    Folded(&'static str),
}

/// Half-open char range `[start, end)` of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One whitespace-separated piece of a search query, compiled.
#[derive(Debug, Clone)]
pub struct SubQueryPattern {
    source: String,
    classes: Vec<CharClass>,
    case_insensitive: bool,
}

impl SubQueryPattern {
    /// Compile a single sub-query.
    ///
    /// Matching is case-insensitive unless the sub-query contains an
    /// upper-case character.
    pub fn compile(sub_query: &str) -> Self {
        let case_insensitive = !sub_query.chars().any(char::is_uppercase);
        let classes = sub_query
            .chars()
            .map(|c| match folded_class(c) {
                Some(class) => CharClass::Folded(class),
                None => CharClass::Literal(c),
            })
            .collect();

        Self {
            source: sub_query.to_string(),
            classes,
            case_insensitive,
        }
    }

    /// Split a query on whitespace runs and compile each non-empty piece.
    pub fn parse_query(query: &str) -> Vec<Self> {
        query.split_whitespace().map(Self::compile).collect()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Leftmost match of this pattern in `text`.
    pub fn find(&self, text: &[char]) -> Option<Span> {
        let width = self.classes.len();
        if width == 0 || width > text.len() {
            return None;
        }

        (0..=text.len() - width)
            .find(|&start| {
                self.classes
                    .iter()
                    .zip(&text[start..start + width])
                    .all(|(class, &c)| self.class_matches(class, c))
            })
            .map(|start| Span {
                start,
                end: start + width,
            })
    }

    fn class_matches(&self, class: &CharClass, c: char) -> bool {
        let c = if self.case_insensitive { fold_case(c) } else { c };
        match class {
            CharClass::Literal(l) if self.case_insensitive => fold_case(*l) == c,
            CharClass::Literal(l) => *l == c,
            CharClass::Folded(set) => set.contains(c),
        }
    }
}

/// Positional score of a match inside `text`.
///
/// Base score is the matched share of the string as an integer percentage.
/// A match starting at a word boundary is worth ×4, one ending at a word
/// boundary ×2.
pub fn score_span(span: Span, text: &[char]) -> u64 {
    if text.is_empty() {
        return 0;
    }

    let mut score = 100 * span.len() as u64 / text.len() as u64;

    if span.start == 0 || !text[span.start - 1].is_alphabetic() {
        score *= 4;
    }
    if span.end == text.len() || !text[span.end].is_alphabetic() {
        score *= 2;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn find(pattern: &str, text: &str) -> Option<Span> {
        SubQueryPattern::compile(pattern).find(&chars(text))
    }

    #[test]
    fn test_accent_insensitive() {
        assert!(find("zoe", "Zoë").is_some());
        assert!(find("francois", "François").is_some());
        assert!(find("jose", "José").is_some());
        assert!(find("munoz", "Muñoz").is_none()); // n is not folded
    }

    #[test]
    fn test_lowercase_query_ignores_case() {
        assert_eq!(find("ann", "ANNA"), Some(Span { start: 0, end: 3 }));
        assert!(find("elodie", "ÉLODIE").is_some());
    }

    #[test]
    fn test_dotted_capital_i_folds_to_i() {
        assert_eq!(fold_case('İ'), 'i');
        assert_eq!(find("ilker", "İlker"), Some(Span { start: 0, end: 5 }));
        assert!(find("ilker", "İLKER").is_some());
    }

    #[test]
    fn test_uppercase_query_is_case_sensitive() {
        assert!(SubQueryPattern::compile("Ann").find(&chars("ann")).is_none());
        assert!(find("Ann", "Ann").is_some());
        assert!(!SubQueryPattern::compile("Ann").is_case_insensitive());
    }

    #[test]
    fn test_leftmost_match() {
        assert_eq!(find("an", "banana"), Some(Span { start: 1, end: 3 }));
    }

    #[test]
    fn test_other_characters_are_literal() {
        assert!(find("a.b", "axb").is_none());
        assert!(find("a.b", "a.b").is_some());
        assert!(find("[a]", "[á]").is_some());
    }

    #[test]
    fn test_parse_query_splits_on_whitespace_runs() {
        let patterns = SubQueryPattern::parse_query("  ann \t lee  ");
        let sources: Vec<&str> = patterns.iter().map(|p| p.source()).collect();
        assert_eq!(sources, vec!["ann", "lee"]);
        assert!(SubQueryPattern::parse_query("   ").is_empty());
    }

    #[test]
    fn test_whole_word_beats_prefix() {
        let ann = chars("Ann");
        let annabelle = chars("Annabelle");
        let full = score_span(Span { start: 0, end: 3 }, &ann);
        let prefix = score_span(Span { start: 0, end: 3 }, &annabelle);
        assert_eq!(full, 800);
        assert_eq!(prefix, 33 * 4);
        assert!(full > prefix);
    }

    #[test]
    fn test_boundary_bonus_composes_to_eight() {
        // Same match length (3) and same string length (9)
        let bounded = chars("xx ann xx");
        let middle = chars("xxxannxxx");
        let a = score_span(Span { start: 3, end: 6 }, &bounded);
        let b = score_span(Span { start: 3, end: 6 }, &middle);
        assert_eq!(b, 33);
        assert_eq!(a, 8 * b);
    }

    #[test]
    fn test_boundary_uses_letters_only() {
        let text = chars("1ann2");
        assert_eq!(score_span(Span { start: 1, end: 4 }, &text), 60 * 8);
        let text = chars("éann");
        assert_eq!(score_span(Span { start: 1, end: 4 }, &text), 75 * 2);
    }
}
