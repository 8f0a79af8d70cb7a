//! Lightweight suffix-stripping stemmer.
//!
//! This is deliberately not a full Snowball stemmer: it reduces common
//! English inflections so that "planning", "planned", and "plans" all
//! index under the same term, without any linguistic machinery.

/// Ordered suffix rules: `(suffix, replacement)`.
///
/// The first rule whose suffix matches and whose application leaves at
/// least [`MIN_STEM_LEN`] characters is applied; later rules are not
/// tried. Order matters: "ies" must precede "es" and "s".
const SUFFIX_RULES: [(&str, &str); 6] = [
    ("ing", ""),
    ("ed", ""),
    ("ly", ""),
    ("ies", "y"),
    ("es", ""),
    ("s", ""),
];

/// Minimum length of a stemmed token.
const MIN_STEM_LEN: usize = 2;

/// Stems a single lowercase token.
///
/// Returns the token unchanged when no rule applies or every applicable
/// rule would leave fewer than two characters.
pub fn stem(token: &str) -> String {
    for (suffix, replacement) in SUFFIX_RULES {
        if let Some(base) = token.strip_suffix(suffix) {
            let stemmed_len = base.chars().count() + replacement.chars().count();
            if stemmed_len >= MIN_STEM_LEN {
                let mut stemmed = String::with_capacity(base.len() + replacement.len());
                stemmed.push_str(base);
                stemmed.push_str(replacement);
                return stemmed;
            }
            // A matching rule that strips too much ends the scan: "ring"
            // should stay "ring", not fall through to the "g"-less rules.
            return token.to_string();
        }
    }
    token.to_string()
}
