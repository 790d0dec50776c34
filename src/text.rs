use unicode_normalization::UnicodeNormalization;

/// Canonicalizes free text for case/accent/whitespace-insensitive comparison.
///
/// The pipeline is: lowercase, NFD decomposition, drop combining marks
/// (U+0300..=U+036F), optionally replace punctuation with spaces, collapse
/// whitespace runs and trim. The output is stable under re-normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextNormalizer {
    /// Replace every character that is neither alphanumeric nor whitespace
    /// with a space before collapsing whitespace
    pub strip_punctuation: bool,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self {
            strip_punctuation: true,
        }
    }
}

impl TextNormalizer {
    /// Normalizer that keeps punctuation (lowercase/accents/whitespace only)
    pub fn lenient() -> Self {
        Self {
            strip_punctuation: false,
        }
    }

    pub fn normalize(&self, input: &str) -> String {
        let folded: String = input
            .to_lowercase()
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .map(|c| {
                if self.strip_punctuation && !c.is_alphanumeric() && !c.is_whitespace() {
                    ' '
                } else {
                    c
                }
            })
            .collect();

        folded.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Absent input normalizes to the empty string.
    pub fn normalize_opt(&self, input: Option<&str>) -> String {
        input.map(|s| self.normalize(s)).unwrap_or_default()
    }

    /// Whether `haystack`, once normalized, contains `needle`.
    ///
    /// `needle` must already be normalized with this normalizer; an absent
    /// haystack only contains the empty needle.
    pub fn contains(&self, haystack: Option<&str>, needle: &str) -> bool {
        self.normalize_opt(haystack).contains(needle)
    }
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Normalize with the default (punctuation-stripping) settings.
pub fn normalize(input: &str) -> String {
    TextNormalizer::default().normalize(input)
}
