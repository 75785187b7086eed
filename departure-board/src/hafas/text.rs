//! Display text cleanup for line names, directions and stop names.
//!
//! HAFAS decorates names heavily: "S+U Alexanderplatz Bhf (Berlin)",
//! "RE1 (Magdeburg Hbf)". The board has little room, so the normalizer
//! strips the decoration. Cleanup is cosmetic only: it never decides
//! whether a journey is kept.

/// Boilerplate words stripped from Berlin stop and direction names.
pub const BERLIN_BOILERPLATE: &[&str] = &["S+U", "S", "U", "Bhf", "Bahnhof", "Berlin"];

/// Cut a line name at its first `(` and trim it.
///
/// If nothing is left, the whitespace-collapsed original is returned.
pub fn clean_line_name(name: &str) -> String {
    let cut = name.split('(').next().unwrap_or_default().trim();
    if cut.is_empty() {
        collapse(name)
    } else {
        cut.to_string()
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes boilerplate words from free text.
///
/// Matching is case-insensitive and on whole words; parentheses around a
/// word are ignored when matching, and a parenthesised group emptied by
/// removal disappears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextCleaner {
    tokens: Vec<String>,
}

impl TextCleaner {
    /// A cleaner removing the given words.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// A cleaner that only collapses whitespace.
    pub fn passthrough() -> Self {
        Self { tokens: Vec::new() }
    }

    fn is_boilerplate(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        let word = word.to_lowercase();
        self.tokens.iter().any(|t| *t == word)
    }

    /// Clean a piece of text.
    ///
    /// Returns the collapsed original if every word was boilerplate.
    pub fn clean(&self, text: &str) -> String {
        let mut kept: Vec<String> = Vec::new();
        // Opening parens of removed words, waiting for the next kept word
        let mut pending_open = 0usize;

        for word in text.split_whitespace() {
            let without_open = word.trim_start_matches('(');
            let core = without_open.trim_end_matches(')');
            let opens = word.len() - without_open.len();
            let closes = without_open.len() - core.len();

            if self.is_boilerplate(core) {
                pending_open += opens;
                let matched = closes.min(pending_open);
                pending_open -= matched;
                let unmatched = closes - matched;
                if unmatched > 0 {
                    if let Some(last) = kept.last_mut() {
                        last.push_str(&")".repeat(unmatched));
                    }
                }
            } else {
                let mut out = "(".repeat(pending_open);
                out.push_str(word);
                kept.push(out);
                pending_open = 0;
            }
        }

        if kept.is_empty() {
            collapse(text)
        } else {
            kept.join(" ")
        }
    }
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new(BERLIN_BOILERPLATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn line_name_cut_at_paren() {
        assert_eq!(clean_line_name("RE1 (Magdeburg Hbf)"), "RE1");
        assert_eq!(clean_line_name("  S5 "), "S5");
        assert_eq!(clean_line_name("U2"), "U2");
    }

    #[test]
    fn line_name_never_emptied() {
        assert_eq!(clean_line_name("(Sonderzug)"), "(Sonderzug)");
    }

    #[test]
    fn strips_berlin_boilerplate() {
        let cleaner = TextCleaner::default();
        assert_eq!(
            cleaner.clean("S+U Alexanderplatz Bhf (Berlin)"),
            "Alexanderplatz"
        );
        assert_eq!(cleaner.clean("S Westkreuz (Berlin)"), "Westkreuz");
        assert_eq!(cleaner.clean("U Pankow"), "Pankow");
    }

    #[test]
    fn matching_is_case_insensitive_whole_word() {
        let cleaner = TextCleaner::default();
        assert_eq!(cleaner.clean("s+u WARSCHAUER straße"), "WARSCHAUER straße");
        // "Su" and "Bhfs" are not boilerplate words
        assert_eq!(cleaner.clean("Su Bhfs"), "Su Bhfs");
    }

    #[test]
    fn partially_emptied_group_keeps_parens_balanced() {
        let cleaner = TextCleaner::default();
        assert_eq!(cleaner.clean("Flughafen (Berlin Brandenburg)"), "Flughafen (Brandenburg)");
    }

    #[test]
    fn all_boilerplate_keeps_original() {
        let cleaner = TextCleaner::default();
        assert_eq!(cleaner.clean("  S+U   Berlin "), "S+U Berlin");
    }

    #[test]
    fn whitespace_collapsed() {
        let cleaner = TextCleaner::passthrough();
        assert_eq!(cleaner.clean("  Ostkreuz \t  Ring "), "Ostkreuz Ring");
    }

    #[test]
    fn custom_tokens() {
        let cleaner = TextCleaner::new(["Hbf"]);
        assert_eq!(cleaner.clean("Potsdam Hbf"), "Potsdam");
        assert_eq!(cleaner.clean("S Potsdam"), "S Potsdam");
    }

    proptest! {
        #[test]
        fn clean_is_idempotent(text in "[A-Za-z+() ]{0,40}") {
            let cleaner = TextCleaner::default();
            let once = cleaner.clean(&text);
            prop_assert_eq!(cleaner.clean(&once), once);
        }

        #[test]
        fn clean_line_name_is_idempotent(name in "[A-Za-z0-9() ]{0,20}") {
            let once = clean_line_name(&name);
            prop_assert_eq!(clean_line_name(&once), once);
        }
    }
}
